//! Cached catalog lookups
//!
//! Picker option lists and per-movie details change rarely, so every call
//! goes through the shared [`TtlCache`].

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::api::ContentApi;
use crate::cache::TtlCache;
use crate::error::ApiError;
use crate::models::{Category, FilterOption, MovieDetails, RawRecord};

const LANGUAGES: [(&str, &str); 4] = [
    ("az", "Azərbaycanca"),
    ("ru", "Русский"),
    ("en", "English"),
    ("tr", "Türkçe"),
];

/// Cached access to option lists and movie details
#[derive(Clone)]
pub struct CatalogLookups {
    api: Arc<dyn ContentApi>,
    cache: Arc<TtlCache>,
    ttl: Duration,
}

impl CatalogLookups {
    pub fn new(api: Arc<dyn ContentApi>, cache: Arc<TtlCache>, ttl: Duration) -> Self {
        Self { api, cache, ttl }
    }

    /// Filter categories for `category`; empty when it has no category filter
    pub async fn category_options(&self, category: Category) -> Result<Vec<FilterOption>, ApiError> {
        if !category.supports_category_filter() {
            return Ok(Vec::new());
        }
        self.cache
            .get_or_compute("get_category", &(category,), self.ttl, || {
                self.api.category_list(category)
            })
            .await
    }

    /// Genres for `category`; empty unless it supports a genre filter
    pub async fn genre_options(&self, category: Category) -> Result<Vec<FilterOption>, ApiError> {
        if !category.supports_genre_filter() {
            return Ok(Vec::new());
        }
        self.cache
            .get_or_compute("get_genre", &(category,), self.ttl, || self.api.genre_list())
            .await
    }

    /// Audio languages the catalog can filter on
    pub async fn language_options(&self) -> Vec<FilterOption> {
        let result = self
            .cache
            .get_or_compute("get_lang", &(), self.ttl, || async {
                Ok::<_, Infallible>(
                    LANGUAGES
                        .iter()
                        .map(|(id, title)| FilterOption::new(*id, *title))
                        .collect::<Vec<_>>(),
                )
            })
            .await;
        match result {
            Ok(options) => options,
            Err(never) => match never {},
        }
    }

    pub async fn movie_details(&self, id: &str) -> Result<MovieDetails, ApiError> {
        self.cache
            .get_or_compute("get_movie_details", &(id,), self.ttl, || {
                self.api.movie_detail(id)
            })
            .await
    }

    /// Details for every movie record on a page, keyed by id. Records whose
    /// lookup fails are left out and listed without enrichment.
    pub async fn movie_details_for(&self, records: &[RawRecord]) -> HashMap<String, MovieDetails> {
        let mut details = HashMap::new();
        for record in records.iter().filter(|r| r.video_info.kind == "movie") {
            let id = &record.video_info.id;
            if details.contains_key(id) {
                continue;
            }
            match self.movie_details(id).await {
                Ok(found) => {
                    details.insert(id.clone(), found);
                }
                Err(e) => warn!(movie = %id, error = %e, "movie details unavailable"),
            }
        }
        details
    }
}
