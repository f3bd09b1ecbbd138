//! Content API collaborator
//!
//! - `ContentApi`: the operations the navigator needs from the remote catalog
//! - `CatalogClient`: HTTP/JSON implementation

pub mod catalog;

pub use catalog::CatalogClient;

use async_trait::async_trait;

use crate::codec::ApiQuery;
use crate::error::ApiError;
use crate::models::{CatalogPage, Category, FilterOption, MovieDetails, PlayTarget};

/// Remote catalog operations. Implementations must not retry; every
/// failure is classified and handed straight back.
#[async_trait]
pub trait ContentApi: Send + Sync {
    async fn browse_movies(&self, query: &ApiQuery) -> Result<CatalogPage, ApiError>;

    async fn browse_tv_series(&self, query: &ApiQuery) -> Result<CatalogPage, ApiError>;

    async fn browse_seasons(&self, query: &ApiQuery) -> Result<CatalogPage, ApiError>;

    async fn browse_episodes(&self, query: &ApiQuery) -> Result<CatalogPage, ApiError>;

    async fn browse_videos(&self, query: &ApiQuery) -> Result<CatalogPage, ApiError>;

    async fn browse_related(&self, query: &ApiQuery) -> Result<CatalogPage, ApiError>;

    /// Filter categories for movies or videos
    async fn category_list(&self, category: Category) -> Result<Vec<FilterOption>, ApiError>;

    /// Movie genres
    async fn genre_list(&self) -> Result<Vec<FilterOption>, ApiError>;

    /// Quality and plot details for one movie
    async fn movie_detail(&self, id: &str) -> Result<MovieDetails, ApiError>;

    /// Stream URL for a playable item
    async fn stream_url(&self, target: &PlayTarget) -> Result<String, ApiError>;
}
