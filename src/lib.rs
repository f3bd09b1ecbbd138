//! catalognav - navigation and caching engine for a remote video catalog
//!
//! Turns a paginated catalog (movies, TV series → seasons → episodes,
//! standalone videos) into a tree of listing screens made of uniform,
//! deep-linkable display items, with keyword search, filters, search
//! history and a TTL cache in front of the expensive lookups.
//!
//! # Modules
//!
//! - `models` - Navigation state, catalog pages, display items
//! - `codec` - Link encoding of actions and navigation state
//! - `api` - Content API trait and its HTTP client
//! - `dispatch` - Category → API call dispatch
//! - `cache` - TTL memoization
//! - `lookups` - Cached option lists and movie details
//! - `transform` - Raw record → display item
//! - `compose` - Listing screens
//! - `navigator` - Action registry
//! - `history` - Search history storage
//! - `config` - Configuration and display strings

pub mod api;
pub mod cache;
pub mod codec;
pub mod compose;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod history;
pub mod lookups;
pub mod models;
pub mod navigator;
pub mod transform;

// Re-export commonly used types
pub use models::{
    CatalogPage, Category, ContentKind, DisplayItem, FilterOption, MovieDetails, NavigationState,
    Notice, RawRecord, RenderHint, SearchMode,
};

pub use api::{CatalogClient, ContentApi};
pub use cache::TtlCache;
pub use codec::{Action, Link};
pub use compose::{Listing, ListingComposer, ListingMode};
pub use config::Config;
pub use dispatch::{CategoryDispatcher, DispatchOutcome};
pub use error::{ApiError, ApiErrorKind, NavError};
pub use navigator::{Navigator, Outcome, Shell};
pub use transform::ItemTransformer;
