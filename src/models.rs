//! Data structures for the catalog navigator
//!
//! Contains all shared models organized by concern:
//! - **Navigation**: categories, search modes and the decoded per-screen state
//! - **Catalog**: pages and raw records as delivered by the Content API
//! - **Display**: uniform items and render hints handed to the host shell

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::NavError;

/// Number of records a full page holds. A page this size is taken as the
/// signal that another page exists, since the API never says so directly.
pub const PAGE_SIZE: usize = 20;

// =============================================================================
// Navigation Models
// =============================================================================

/// Logical catalog category, one per dispatch table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "movies")]
    Movies,
    #[serde(rename = "tvseries", alias = "tv_series")]
    TvSeries,
    #[serde(rename = "seasons")]
    Seasons,
    #[serde(rename = "episodes")]
    Episodes,
    #[serde(rename = "videos")]
    Videos,
    #[serde(rename = "movie_related")]
    MovieRelated,
}

impl Category {
    /// Every category in dispatch table order
    pub const ALL: [Category; 6] = [
        Category::Movies,
        Category::TvSeries,
        Category::Seasons,
        Category::Episodes,
        Category::Videos,
        Category::MovieRelated,
    ];

    /// Wire name used in links and API paths
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Movies => "movies",
            Category::TvSeries => "tvseries",
            Category::Seasons => "seasons",
            Category::Episodes => "episodes",
            Category::Videos => "videos",
            Category::MovieRelated => "movie_related",
        }
    }

    /// Browsable top-level categories: paged, searchable
    pub fn is_paged(&self) -> bool {
        matches!(
            self,
            Category::Movies | Category::TvSeries | Category::Videos
        )
    }

    pub fn supports_search(&self) -> bool {
        self.is_paged()
    }

    pub fn supports_category_filter(&self) -> bool {
        matches!(self, Category::Movies | Category::Videos)
    }

    pub fn supports_genre_filter(&self) -> bool {
        *self == Category::Movies
    }

    pub fn supports_lang_filter(&self) -> bool {
        *self == Category::Movies
    }

    /// Content kind reported to the shell when listing this category
    pub fn content_kind(&self) -> ContentKind {
        match self {
            Category::TvSeries | Category::Seasons => ContentKind::TvShows,
            Category::Videos | Category::Episodes => ContentKind::Episodes,
            Category::Movies | Category::MovieRelated => ContentKind::Movies,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = NavError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movies" => Ok(Category::Movies),
            "tvseries" | "tv_series" => Ok(Category::TvSeries),
            "seasons" => Ok(Category::Seasons),
            "episodes" => Ok(Category::Episodes),
            "videos" => Ok(Category::Videos),
            "movie_related" => Ok(Category::MovieRelated),
            other => Err(NavError::InvalidCategory(other.to_string())),
        }
    }
}

/// Search flavour a screen was reached through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Interactive search started by the user
    #[default]
    Normal,
    /// Universal search triggered from outside the add-on (no prompts, no
    /// "nothing found" notice)
    Alternate,
}

/// Decoded filter and pagination state for one listing screen.
///
/// Never mutated after construction; derived screens are new values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationState {
    pub category: Category,
    pub page: u32,
    pub keyword: Option<String>,
    pub category_filter: Option<String>,
    pub genre_filter: Option<String>,
    pub lang_filter: Option<String>,
    /// Series the screen belongs to (seasons, episodes)
    pub series_id: Option<String>,
    /// Season number, or the first-available season hint for a series
    pub season: Option<String>,
    /// Movie id for related listings
    pub item_id: Option<String>,
    pub search_mode: SearchMode,
}

impl NavigationState {
    /// First page of a category with no filters
    pub fn new(category: Category) -> Self {
        Self {
            category,
            page: 1,
            keyword: None,
            category_filter: None,
            genre_filter: None,
            lang_filter: None,
            series_id: None,
            season: None,
            item_id: None,
            search_mode: SearchMode::Normal,
        }
    }

    /// Same screen on another page
    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page: page.max(1),
            ..self.clone()
        }
    }

    /// Non-empty keyword, if the screen is a keyword search
    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref().filter(|k| !k.is_empty())
    }

    pub fn is_keyword_search(&self) -> bool {
        self.keyword().is_some()
    }
}

/// Content kind hint for the rendering shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Files,
    Movies,
    TvShows,
    Episodes,
}

// =============================================================================
// Catalog Models (Content API)
// =============================================================================

/// One page of results from a browse or search query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogPage {
    /// Total matches on the remote side; may exceed `records.len()`
    #[serde(rename = "count", default)]
    pub total_count: u64,
    /// Screen title for non-paged categories (series name, season name)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "list", default)]
    pub records: Vec<RawRecord>,
}

/// One catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub video_info: VideoInfo,
    #[serde(default)]
    pub item_info: ItemInfo,
}

/// Identifying fields of a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoInfo {
    /// Record kind as sent by the API; validated by the transformer
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, deserialize_with = "deserialize_opt_id", skip_serializing_if = "Option::is_none")]
    pub tvserie_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_number", skip_serializing_if = "Option::is_none")]
    pub season: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_opt_number", skip_serializing_if = "Option::is_none")]
    pub episode: Option<u32>,
}

/// Display-side bag of a record: label, artwork and video tags
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub art: BTreeMap<String, String>,
    #[serde(default)]
    pub info: VideoMeta,
}

/// Video tags passed through to the shell
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub originaltitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tvshowtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plot: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_number", skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_opt_number", skip_serializing_if = "Option::is_none")]
    pub season: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_opt_number", skip_serializing_if = "Option::is_none")]
    pub episode: Option<u32>,
    /// Any other tags (genre, rating, duration, ...)
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Per-movie enrichment returned by the detail endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_quality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_quality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plot: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Entry of a category, genre or language picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub title: String,
}

impl FilterOption {
    /// Id of the synthetic "All" option
    pub const ALL_ID: &'static str = "0";

    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }

    /// Synthetic option that clears a filter
    pub fn all(title: impl Into<String>) -> Self {
        Self::new(Self::ALL_ID, title)
    }

    pub fn is_all(&self) -> bool {
        self.id == Self::ALL_ID
    }
}

/// Title of the option with `id`, or `fallback` when absent
pub fn option_title(options: &[FilterOption], id: Option<&str>, fallback: &str) -> String {
    id.and_then(|id| options.iter().find(|o| o.id == id))
        .map(|o| o.title.clone())
        .unwrap_or_else(|| fallback.to_string())
}

/// Identifiers needed to resolve a playable item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayTarget {
    pub kind: String,
    pub id: String,
    pub tvserie_id: Option<String>,
    pub season: Option<String>,
}

// =============================================================================
// Display Models
// =============================================================================

/// Secondary action attached to an item (context menu)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextAction {
    pub label: String,
    pub target: String,
}

/// Uniform unit handed to the rendering shell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayItem {
    /// Formatted label, markup included
    pub label: String,
    /// Encoded navigation link
    pub target: String,
    /// Leads to another listing
    pub is_container: bool,
    /// Resolves to a stream
    pub is_playable: bool,
    #[serde(default)]
    pub metadata: VideoMeta,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub art: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub context_actions: Vec<ContextAction>,
}

impl DisplayItem {
    /// Item that opens another listing
    pub fn folder(label: impl Into<String>, target: impl Into<String>) -> Self {
        Self::bare(label, target, true)
    }

    /// Item that triggers an action (dialog, prompt) without navigating
    pub fn action(label: impl Into<String>, target: impl Into<String>) -> Self {
        Self::bare(label, target, false)
    }

    fn bare(label: impl Into<String>, target: impl Into<String>, is_container: bool) -> Self {
        Self {
            label: label.into(),
            target: target.into(),
            is_container,
            is_playable: false,
            metadata: VideoMeta::default(),
            art: BTreeMap::new(),
            context_actions: Vec::new(),
        }
    }
}

impl fmt::Display for DisplayItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.is_container {
            "/"
        } else if self.is_playable {
            ">"
        } else {
            "*"
        };
        write!(f, "{} {}", marker, self.label)
    }
}

/// Shell sort hint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortHint {
    /// Keep API order
    #[default]
    Unsorted,
    Label,
}

/// How the shell should present a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderHint {
    pub content: ContentKind,
    pub succeeded: bool,
    /// Replace the current screen instead of pushing a new one
    pub replace: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub sort: SortHint,
}

impl RenderHint {
    pub fn new(content: ContentKind) -> Self {
        Self {
            content,
            succeeded: true,
            replace: false,
            title: None,
            sort: SortHint::Unsorted,
        }
    }
}

/// Severity of a user notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Notification the shell should pop up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

// =============================================================================
// Lenient ID Deserialization
// =============================================================================

// The API is inconsistent about quoting ids and numbers.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Int(i64),
    Float(f64),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Scalar::Text(s) => s,
            Scalar::Int(n) => n.to_string(),
            Scalar::Float(n) => n.to_string(),
        }
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Scalar::deserialize(deserializer)?.into_text())
}

fn deserialize_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?
        .map(Scalar::into_text)
        .filter(|s| !s.is_empty()))
}

fn deserialize_opt_number<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Scalar>::deserialize(deserializer)? {
        Some(Scalar::Int(n)) => u32::try_from(n).ok(),
        Some(Scalar::Float(n)) if n >= 0.0 => Some(n as u32),
        Some(Scalar::Text(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trip_names() {
        for cat in Category::ALL {
            assert_eq!(cat.as_str().parse::<Category>().unwrap(), cat);
        }
        assert_eq!("tv_series".parse::<Category>().unwrap(), Category::TvSeries);
    }

    #[test]
    fn test_category_unknown() {
        let err = "cartoons".parse::<Category>().unwrap_err();
        assert!(matches!(err, NavError::InvalidCategory(c) if c == "cartoons"));
    }

    #[test]
    fn test_capability_table() {
        assert!(Category::Movies.supports_genre_filter());
        assert!(Category::Movies.supports_lang_filter());
        assert!(Category::Videos.supports_category_filter());
        assert!(!Category::Videos.supports_genre_filter());
        assert!(!Category::TvSeries.supports_category_filter());
        assert!(Category::TvSeries.is_paged());
        assert!(!Category::Seasons.is_paged());
        assert!(!Category::MovieRelated.supports_search());
    }

    #[test]
    fn test_content_kind() {
        assert_eq!(Category::Seasons.content_kind(), ContentKind::TvShows);
        assert_eq!(Category::Videos.content_kind(), ContentKind::Episodes);
        assert_eq!(Category::MovieRelated.content_kind(), ContentKind::Movies);
    }

    #[test]
    fn test_with_page_clamps_to_one() {
        let state = NavigationState::new(Category::Movies).with_page(0);
        assert_eq!(state.page, 1);
    }

    #[test]
    fn test_empty_keyword_is_not_a_search() {
        let mut state = NavigationState::new(Category::Videos);
        state.keyword = Some(String::new());
        assert!(!state.is_keyword_search());
        state.keyword = Some("cat".into());
        assert_eq!(state.keyword(), Some("cat"));
    }

    #[test]
    fn test_page_parses_numeric_and_string_ids() {
        let json = r#"{
            "count": 2,
            "list": [
                {"video_info": {"type": "movie", "id": 17},
                 "item_info": {"label": "A", "info": {"title": "A", "year": "2019", "genre": "Drama"}}},
                {"video_info": {"type": "episodes", "id": "5", "tvserie_id": 7, "season": "2", "episode": 3}}
            ]
        }"#;
        let page: CatalogPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.total_count, 2);
        assert_eq!(page.records[0].video_info.id, "17");
        assert_eq!(page.records[0].item_info.info.year, Some(2019));
        assert_eq!(
            page.records[0].item_info.info.extra.get("genre"),
            Some(&serde_json::json!("Drama"))
        );
        let ep = &page.records[1].video_info;
        assert_eq!(ep.tvserie_id.as_deref(), Some("7"));
        assert_eq!(ep.season, Some(2));
        assert_eq!(ep.episode, Some(3));
    }

    #[test]
    fn test_option_title_fallback() {
        let options = vec![FilterOption::new("3", "Comedy")];
        assert_eq!(option_title(&options, Some("3"), "All"), "Comedy");
        assert_eq!(option_title(&options, Some("9"), "All"), "All");
        assert_eq!(option_title(&options, None, "All"), "All");
    }

    #[test]
    fn test_display_item_marker() {
        assert_eq!(DisplayItem::folder("Next", "x").to_string(), "/ Next");
        assert_eq!(DisplayItem::action("Search", "x").to_string(), "* Search");
    }
}
