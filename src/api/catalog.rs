//! HTTP client for the video catalog
//!
//! Every endpoint answers JSON over GET:
//! - `/browse/<category>?<query>` → a catalog page
//! - `/categories/<movies|videos>`, `/genres` → picker options
//! - `/movies/<id>` → movie details
//! - `/play?type=..&id=..` → `{"url": ...}`

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::ContentApi;
use crate::codec::ApiQuery;
use crate::error::ApiError;
use crate::models::{CatalogPage, Category, FilterOption, MovieDetails, PlayTarget};

/// Catalog API client
pub struct CatalogClient {
    base_url: String,
    client: reqwest::Client,
}

impl CatalogClient {
    /// Create a client for the catalog rooted at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET an endpoint and decode its JSON body
    async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        query: &ApiQuery,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!(%url, ?query, "catalog request");

        let response = self
            .client
            .get(&url)
            .query(query)
            .header("Accept", "application/json")
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                let body = response.text().await?;
                serde_json::from_str(&body)
                    .map_err(|e| ApiError::other(format!("JSON parse error: {}", e)))
            }
            StatusCode::NOT_FOUND => Err(ApiError::other("Resource not found (404)")),
            status => Err(ApiError::other(format!("Server error: {}", status.as_u16()))),
        }
    }

    async fn browse(&self, category: Category, query: &ApiQuery) -> Result<CatalogPage, ApiError> {
        let endpoint = format!("/browse/{}", category.as_str());
        self.get(&endpoint, query).await
    }
}

#[async_trait]
impl ContentApi for CatalogClient {
    async fn browse_movies(&self, query: &ApiQuery) -> Result<CatalogPage, ApiError> {
        self.browse(Category::Movies, query).await
    }

    async fn browse_tv_series(&self, query: &ApiQuery) -> Result<CatalogPage, ApiError> {
        self.browse(Category::TvSeries, query).await
    }

    async fn browse_seasons(&self, query: &ApiQuery) -> Result<CatalogPage, ApiError> {
        self.browse(Category::Seasons, query).await
    }

    async fn browse_episodes(&self, query: &ApiQuery) -> Result<CatalogPage, ApiError> {
        self.browse(Category::Episodes, query).await
    }

    async fn browse_videos(&self, query: &ApiQuery) -> Result<CatalogPage, ApiError> {
        self.browse(Category::Videos, query).await
    }

    async fn browse_related(&self, query: &ApiQuery) -> Result<CatalogPage, ApiError> {
        self.browse(Category::MovieRelated, query).await
    }

    async fn category_list(&self, category: Category) -> Result<Vec<FilterOption>, ApiError> {
        let endpoint = format!("/categories/{}", category.as_str());
        self.get(&endpoint, &ApiQuery::new()).await
    }

    async fn genre_list(&self) -> Result<Vec<FilterOption>, ApiError> {
        self.get("/genres", &ApiQuery::new()).await
    }

    async fn movie_detail(&self, id: &str) -> Result<MovieDetails, ApiError> {
        let endpoint = format!("/movies/{}", urlencoding::encode(id));
        self.get(&endpoint, &ApiQuery::new()).await
    }

    async fn stream_url(&self, target: &PlayTarget) -> Result<String, ApiError> {
        let mut query = ApiQuery::new();
        query.insert("type".into(), target.kind.clone());
        query.insert("id".into(), target.id.clone());
        if let Some(series) = &target.tvserie_id {
            query.insert("tvserie_id".into(), series.clone());
        }
        if let Some(season) = &target.season {
            query.insert("season".into(), season.clone());
        }

        let response: StreamResponse = self.get("/play", &query).await?;
        response
            .url
            .filter(|u| !u.is_empty())
            .ok_or_else(|| ApiError::other("No stream available"))
    }
}

// =============================================================================
// Response Structures (internal deserialization)
// =============================================================================

#[derive(Debug, Deserialize)]
struct StreamResponse {
    url: Option<String>,
}
