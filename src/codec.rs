//! Link codec
//!
//! A navigation link is `<plugin_url>?action=<name>&<key>=<value>...`.
//! The action travels beside the parameters, never inside the state. State
//! fields that are forwarded to the Content API carry a `_` prefix so they
//! cannot collide with parameters the host shell reserves for itself
//! (`action`, `update_listing`).
//!
//! `decode(&encode(&state, &Overrides::new()))` always yields `state` again.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{NavError, Result};
use crate::models::{Category, NavigationState, PlayTarget, SearchMode};

/// Serialized link parameters (sorted, so encoding is stable)
pub type LinkParams = BTreeMap<String, String>;

/// Arguments forwarded to a Content API call (prefix stripped)
pub type ApiQuery = BTreeMap<String, String>;

const INTERNAL_PREFIX: char = '_';
const ACTION_KEY: &str = "action";
const TRUE: &str = "True";

/// Host parameter asking the shell to replace the current screen
pub const UPDATE_LISTING_KEY: &str = "update_listing";

// =============================================================================
// Actions
// =============================================================================

/// Named entry points a link can activate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Root,
    ListVideos,
    Search,
    SearchCategory,
    SearchHistory,
    SelectCategory,
    SelectGenre,
    SelectLang,
    Play,
}

impl Action {
    pub const ALL: [Action; 9] = [
        Action::Root,
        Action::ListVideos,
        Action::Search,
        Action::SearchCategory,
        Action::SearchHistory,
        Action::SelectCategory,
        Action::SelectGenre,
        Action::SelectLang,
        Action::Play,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Root => "root",
            Action::ListVideos => "list_videos",
            Action::Search => "search",
            Action::SearchCategory => "search_category",
            Action::SearchHistory => "search_history",
            Action::SelectCategory => "select_category",
            Action::SelectGenre => "select_genre",
            Action::SelectLang => "select_lang",
            Action::Play => "play",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = NavError;

    fn from_str(s: &str) -> Result<Self> {
        Action::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| NavError::UnknownAction(s.to_string()))
    }
}

// =============================================================================
// Links
// =============================================================================

/// Action plus its parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub action: Action,
    pub params: LinkParams,
}

impl Link {
    pub fn new(action: Action, params: LinkParams) -> Self {
        Self { action, params }
    }

    /// Link without parameters
    pub fn bare(action: Action) -> Self {
        Self::new(action, LinkParams::new())
    }

    /// Listing link for a navigation state
    pub fn listing(state: &NavigationState) -> Self {
        Self::new(Action::ListVideos, encode(state, &Overrides::new()))
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Mark the link as replacing the current screen
    pub fn replacing(self) -> Self {
        self.with_param(UPDATE_LISTING_KEY, TRUE)
    }

    /// Whether a boolean host parameter is set (`True`)
    pub fn flag(&self, key: &str) -> bool {
        self.params.get(key).is_some_and(|v| v == TRUE)
    }

    /// Render as an opaque URL under `base`
    pub fn to_url(&self, base: &str) -> String {
        let mut url = format!("{}?{}={}", base, ACTION_KEY, self.action);
        for (key, value) in &self.params {
            url.push('&');
            url.push_str(&urlencoding::encode(key));
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }

    /// Parse a URL produced by [`Link::to_url`]. A bare query string is
    /// accepted too; a missing action means the root screen.
    pub fn parse(url: &str) -> Result<Self> {
        let query = match url.split_once('?') {
            Some((_, query)) => query,
            None if url.contains('=') => url,
            None => "",
        };

        let mut action = Action::Root;
        let mut params = LinkParams::new();
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let key = decode_component(key);
            let value = decode_component(value);
            if key == ACTION_KEY {
                action = value.parse()?;
            } else {
                params.insert(key, value);
            }
        }
        Ok(Self { action, params })
    }
}

fn decode_component(raw: &str) -> String {
    let raw = raw.replace('+', " ");
    urlencoding::decode(&raw)
        .map(|s| s.into_owned())
        .unwrap_or(raw)
}

// =============================================================================
// State Fields
// =============================================================================

/// Serializable field of a [`NavigationState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Category,
    Page,
    Keyword,
    CategoryFilter,
    GenreFilter,
    LangFilter,
    SeriesId,
    Season,
    ItemId,
    SearchMode,
}

impl Field {
    pub fn key(&self) -> &'static str {
        match self {
            Field::Category => "cat",
            Field::Page => "_page",
            Field::Keyword => "_keyword",
            Field::CategoryFilter => "_category",
            Field::GenreFilter => "_genre",
            Field::LangFilter => "_lang",
            Field::SeriesId => "_tvserie_id",
            Field::Season => "_season",
            Field::ItemId => "_id",
            Field::SearchMode => "usearch",
        }
    }
}

/// Partial replacement applied while encoding.
///
/// `set` replaces a field, `remove` deletes it from the output entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides(Vec<(Field, Option<String>)>);

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, field: Field, value: impl Into<String>) -> Self {
        self.0.push((field, Some(value.into())));
        self
    }

    pub fn remove(mut self, field: Field) -> Self {
        self.0.push((field, None));
        self
    }

    /// `set` for `Some`, `remove` for `None`
    pub fn apply(self, field: Field, value: Option<String>) -> Self {
        match value {
            Some(value) => self.set(field, value),
            None => self.remove(field),
        }
    }
}

/// Serialize a state, then apply overrides in order
pub fn encode(state: &NavigationState, overrides: &Overrides) -> LinkParams {
    let mut params = LinkParams::new();
    params.insert(Field::Category.key().into(), state.category.as_str().into());
    if state.page != 1 {
        params.insert(Field::Page.key().into(), state.page.to_string());
    }

    let optional = [
        (Field::Keyword, &state.keyword),
        (Field::CategoryFilter, &state.category_filter),
        (Field::GenreFilter, &state.genre_filter),
        (Field::LangFilter, &state.lang_filter),
        (Field::SeriesId, &state.series_id),
        (Field::Season, &state.season),
        (Field::ItemId, &state.item_id),
    ];
    for (field, value) in optional {
        if let Some(value) = value {
            params.insert(field.key().into(), value.clone());
        }
    }

    if state.search_mode == SearchMode::Alternate {
        params.insert(Field::SearchMode.key().into(), TRUE.into());
    }

    for (field, value) in &overrides.0 {
        match value {
            Some(value) => params.insert(field.key().into(), value.clone()),
            None => params.remove(field.key()),
        };
    }
    params
}

/// Rebuild a state from link parameters. Unknown keys are ignored; a
/// missing or unparsable page means page 1.
pub fn decode(params: &LinkParams) -> Result<NavigationState> {
    let category: Category = params
        .get(Field::Category.key())
        .ok_or(NavError::MissingParameter("cat"))?
        .parse()?;

    let page = params
        .get(Field::Page.key())
        .and_then(|p| p.parse::<u32>().ok())
        .filter(|p| *p > 0)
        .unwrap_or(1);

    let text = |field: Field| params.get(field.key()).cloned();

    let search_mode = if params.get(Field::SearchMode.key()).is_some_and(|v| v == TRUE) {
        SearchMode::Alternate
    } else {
        SearchMode::Normal
    };

    Ok(NavigationState {
        category,
        page,
        keyword: text(Field::Keyword),
        category_filter: text(Field::CategoryFilter),
        genre_filter: text(Field::GenreFilter),
        lang_filter: text(Field::LangFilter),
        series_id: text(Field::SeriesId),
        season: text(Field::Season),
        item_id: text(Field::ItemId),
        search_mode,
    })
}

/// The Content API arguments for a state: its `_` fields, prefix stripped
pub fn api_query(state: &NavigationState) -> ApiQuery {
    encode(state, &Overrides::new())
        .into_iter()
        .filter_map(|(key, value)| {
            key.strip_prefix(INTERNAL_PREFIX)
                .map(|stripped| (stripped.to_string(), value))
        })
        .collect()
}

// =============================================================================
// Search and Play Parameters
// =============================================================================

const SEARCH_KEYWORD_KEY: &str = "keyword";

/// Parameters of the global `search` action
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub keyword: Option<String>,
    pub mode: SearchMode,
}

impl SearchQuery {
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: Some(keyword.into()),
            mode: SearchMode::Normal,
        }
    }

    pub fn decode(params: &LinkParams) -> Self {
        let mode = if params.get(Field::SearchMode.key()).is_some_and(|v| v == TRUE) {
            SearchMode::Alternate
        } else {
            SearchMode::Normal
        };
        Self {
            keyword: params
                .get(SEARCH_KEYWORD_KEY)
                .filter(|k| !k.is_empty())
                .cloned(),
            mode,
        }
    }

    pub fn encode(&self) -> LinkParams {
        let mut params = LinkParams::new();
        if let Some(keyword) = &self.keyword {
            params.insert(SEARCH_KEYWORD_KEY.into(), keyword.clone());
        }
        if self.mode == SearchMode::Alternate {
            params.insert(Field::SearchMode.key().into(), TRUE.into());
        }
        params
    }

    pub fn link(&self) -> Link {
        Link::new(Action::Search, self.encode())
    }
}

const PLAY_TYPE_KEY: &str = "_type";

/// Encode the parameters of a `play` link
pub fn encode_play(target: &PlayTarget) -> LinkParams {
    let mut params = LinkParams::new();
    params.insert(PLAY_TYPE_KEY.into(), target.kind.clone());
    params.insert(Field::ItemId.key().into(), target.id.clone());
    if let Some(series) = &target.tvserie_id {
        params.insert(Field::SeriesId.key().into(), series.clone());
    }
    if let Some(season) = &target.season {
        params.insert(Field::Season.key().into(), season.clone());
    }
    params
}

/// Decode the parameters of a `play` link
pub fn decode_play(params: &LinkParams) -> Result<PlayTarget> {
    Ok(PlayTarget {
        kind: params
            .get(PLAY_TYPE_KEY)
            .cloned()
            .ok_or(NavError::MissingParameter("_type"))?,
        id: params
            .get(Field::ItemId.key())
            .cloned()
            .ok_or(NavError::MissingParameter("_id"))?,
        tvserie_id: params.get(Field::SeriesId.key()).cloned(),
        season: params.get(Field::Season.key()).cloned(),
    })
}

// =============================================================================
// Tests
// =============================================================================
