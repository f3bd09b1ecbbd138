//! Category dispatcher
//!
//! Maps one category plus its navigation state to exactly one Content API
//! call. Failures are classified and returned, never retried.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::api::ContentApi;
use crate::codec::{self, ApiQuery};
use crate::error::{NavError, Result};
use crate::models::{CatalogPage, Category, NavigationState};

/// Result of a dispatch
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// A normal page to compose
    Page(CatalogPage),
    /// The series has exactly one season; list its episodes directly
    SingleSeasonShortcut {
        tvserie_id: String,
        season: Option<String>,
    },
}

/// Category → Content API dispatch table
#[derive(Clone)]
pub struct CategoryDispatcher {
    api: Arc<dyn ContentApi>,
}

impl CategoryDispatcher {
    pub fn new(api: Arc<dyn ContentApi>) -> Self {
        Self { api }
    }

    /// Fetch the page for `state.category`
    pub async fn fetch(&self, state: &NavigationState) -> Result<DispatchOutcome> {
        let query = codec::api_query(state);
        require_inputs(state.category, &query)?;
        debug!(category = %state.category, ?query, "dispatch");

        let page = self.call(state.category, &query).await?;

        if state.category == Category::Seasons && page.total_count == 1 {
            let (tvserie_id, season) = single_season(state, &page);
            info!(%tvserie_id, ?season, "single season, redirecting to episodes");
            return Ok(DispatchOutcome::SingleSeasonShortcut { tvserie_id, season });
        }
        Ok(DispatchOutcome::Page(page))
    }

    /// Keyword search within one searchable category
    pub async fn search(&self, category: Category, keyword: &str) -> Result<CatalogPage> {
        if !category.supports_search() {
            return Err(NavError::InvalidCategory(category.to_string()));
        }
        let mut query = ApiQuery::new();
        query.insert("keyword".into(), keyword.to_string());
        debug!(%category, keyword, "search dispatch");
        self.call(category, &query).await
    }

    async fn call(&self, category: Category, query: &ApiQuery) -> Result<CatalogPage> {
        let result = match category {
            Category::Movies => self.api.browse_movies(query).await,
            Category::TvSeries => self.api.browse_tv_series(query).await,
            Category::Seasons => self.api.browse_seasons(query).await,
            Category::Episodes => self.api.browse_episodes(query).await,
            Category::Videos => self.api.browse_videos(query).await,
            Category::MovieRelated => self.api.browse_related(query).await,
        };
        result.map_err(|e| {
            warn!(%category, kind = ?e.kind, error = %e, "catalog request failed");
            NavError::Api(e)
        })
    }
}

/// Inputs each category cannot be dispatched without
fn require_inputs(category: Category, query: &ApiQuery) -> Result<()> {
    let required: &[&'static str] = match category {
        Category::Seasons => &["tvserie_id"],
        Category::Episodes => &["tvserie_id", "season"],
        Category::MovieRelated => &["id"],
        Category::Movies | Category::TvSeries | Category::Videos => &[],
    };
    match required.iter().find(|key| !query.contains_key(**key)) {
        Some(missing) => Err(NavError::MissingParameter(*missing)),
        None => Ok(()),
    }
}

/// Identify the lone season: prefer the record's own fields, fall back to
/// the state that asked for it.
fn single_season(state: &NavigationState, page: &CatalogPage) -> (String, Option<String>) {
    let record = page.records.first().map(|r| &r.video_info);
    let tvserie_id = record
        .and_then(|v| v.tvserie_id.clone())
        .or_else(|| state.series_id.clone())
        .unwrap_or_default();
    let season = record
        .and_then(|v| v.season.map(|s| s.to_string()))
        .or_else(|| state.season.clone());
    (tvserie_id, season)
}
