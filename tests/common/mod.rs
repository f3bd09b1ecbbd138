//! Shared fixtures: an in-memory Content API with call counters, a scripted
//! shell, and record builders.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use catalognav::cache::TtlCache;
use catalognav::codec::ApiQuery;
use catalognav::config::Config;
use catalognav::history::MemoryHistory;
use catalognav::models::{ItemInfo, PlayTarget, VideoInfo, VideoMeta};
use catalognav::{
    ApiError, CatalogPage, Category, ContentApi, FilterOption, MovieDetails, Navigator, RawRecord,
    Shell,
};

// =============================================================================
// Fake Content API
// =============================================================================

/// Canned Content API. Every call is recorded with its query.
#[derive(Default)]
pub struct FakeApi {
    pages: HashMap<Category, Result<CatalogPage, ApiError>>,
    categories: Vec<FilterOption>,
    genres: Vec<FilterOption>,
    details: HashMap<String, MovieDetails>,
    stream: Option<String>,
    calls: Mutex<Vec<(String, ApiQuery)>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, category: Category, page: CatalogPage) -> Self {
        self.pages.insert(category, Ok(page));
        self
    }

    pub fn with_failure(mut self, category: Category, error: ApiError) -> Self {
        self.pages.insert(category, Err(error));
        self
    }

    pub fn with_categories(mut self, options: Vec<FilterOption>) -> Self {
        self.categories = options;
        self
    }

    pub fn with_genres(mut self, options: Vec<FilterOption>) -> Self {
        self.genres = options;
        self
    }

    pub fn with_details(mut self, id: &str, details: MovieDetails) -> Self {
        self.details.insert(id.to_string(), details);
        self
    }

    pub fn with_stream(mut self, url: &str) -> Self {
        self.stream = Some(url.to_string());
        self
    }

    /// Number of calls made to `operation`
    pub fn calls(&self, operation: &str) -> usize {
        self.lock().iter().filter(|(op, _)| op == operation).count()
    }

    /// Query of the most recent call to `operation`
    pub fn last_query(&self, operation: &str) -> Option<ApiQuery> {
        self.lock()
            .iter()
            .rev()
            .find(|(op, _)| op == operation)
            .map(|(_, query)| query.clone())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(String, ApiQuery)>> {
        self.calls.lock().unwrap()
    }

    fn record(&self, operation: &str, query: ApiQuery) {
        self.lock().push((operation.to_string(), query));
    }

    fn browse(&self, operation: &str, category: Category, query: &ApiQuery) -> Result<CatalogPage, ApiError> {
        self.record(operation, query.clone());
        self.pages
            .get(&category)
            .cloned()
            .unwrap_or_else(|| Ok(CatalogPage::default()))
    }
}

#[async_trait]
impl ContentApi for FakeApi {
    async fn browse_movies(&self, query: &ApiQuery) -> Result<CatalogPage, ApiError> {
        self.browse("browse_movies", Category::Movies, query)
    }

    async fn browse_tv_series(&self, query: &ApiQuery) -> Result<CatalogPage, ApiError> {
        self.browse("browse_tv_series", Category::TvSeries, query)
    }

    async fn browse_seasons(&self, query: &ApiQuery) -> Result<CatalogPage, ApiError> {
        self.browse("browse_seasons", Category::Seasons, query)
    }

    async fn browse_episodes(&self, query: &ApiQuery) -> Result<CatalogPage, ApiError> {
        self.browse("browse_episodes", Category::Episodes, query)
    }

    async fn browse_videos(&self, query: &ApiQuery) -> Result<CatalogPage, ApiError> {
        self.browse("browse_videos", Category::Videos, query)
    }

    async fn browse_related(&self, query: &ApiQuery) -> Result<CatalogPage, ApiError> {
        self.browse("browse_related", Category::MovieRelated, query)
    }

    async fn category_list(&self, category: Category) -> Result<Vec<FilterOption>, ApiError> {
        let mut query = ApiQuery::new();
        query.insert("category".into(), category.to_string());
        self.record("category_list", query);
        Ok(self.categories.clone())
    }

    async fn genre_list(&self) -> Result<Vec<FilterOption>, ApiError> {
        self.record("genre_list", ApiQuery::new());
        Ok(self.genres.clone())
    }

    async fn movie_detail(&self, id: &str) -> Result<MovieDetails, ApiError> {
        let mut query = ApiQuery::new();
        query.insert("id".into(), id.to_string());
        self.record("movie_detail", query);
        self.details
            .get(id)
            .cloned()
            .ok_or_else(|| ApiError::other("Resource not found (404)"))
    }

    async fn stream_url(&self, target: &PlayTarget) -> Result<String, ApiError> {
        let mut query = ApiQuery::new();
        query.insert("type".into(), target.kind.clone());
        query.insert("id".into(), target.id.clone());
        self.record("stream_url", query);
        self.stream
            .clone()
            .ok_or_else(|| ApiError::other("No stream available"))
    }
}

// =============================================================================
// Scripted Shell
// =============================================================================

/// Shell that answers from queued replies; an empty queue means "dismissed"
#[derive(Default)]
pub struct ScriptedShell {
    choices: Mutex<VecDeque<usize>>,
    inputs: Mutex<VecDeque<String>>,
    /// (heading, options) of every select dialog shown
    pub selects: Mutex<Vec<(String, Vec<String>)>>,
    /// (heading, default) of every input dialog shown
    pub prompts: Mutex<Vec<(String, String)>>,
}

impl ScriptedShell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn choosing(self, index: usize) -> Self {
        self.choices.lock().unwrap().push_back(index);
        self
    }

    pub fn typing(self, text: &str) -> Self {
        self.inputs.lock().unwrap().push_back(text.to_string());
        self
    }
}

impl Shell for ScriptedShell {
    fn select(&self, heading: &str, options: &[String]) -> Option<usize> {
        self.selects
            .lock()
            .unwrap()
            .push((heading.to_string(), options.to_vec()));
        self.choices.lock().unwrap().pop_front()
    }

    fn input(&self, heading: &str, default: &str) -> Option<String> {
        self.prompts
            .lock()
            .unwrap()
            .push((heading.to_string(), default.to_string()));
        self.inputs.lock().unwrap().pop_front()
    }
}

// =============================================================================
// Wiring
// =============================================================================

pub const PLUGIN_URL: &str = "plugin://plugin.video.test/";

pub fn test_config() -> Config {
    Config {
        plugin_url: PLUGIN_URL.to_string(),
        ..Config::default()
    }
}

pub struct Harness {
    pub api: Arc<FakeApi>,
    pub shell: Arc<ScriptedShell>,
    pub history: Arc<MemoryHistory>,
    pub nav: Navigator,
}

pub fn harness(api: FakeApi, shell: ScriptedShell, config: Config) -> Harness {
    harness_with_history(api, shell, MemoryHistory::new(), config)
}

pub fn harness_with_history(
    api: FakeApi,
    shell: ScriptedShell,
    history: MemoryHistory,
    config: Config,
) -> Harness {
    let api = Arc::new(api);
    let shell = Arc::new(shell);
    let history = Arc::new(history);
    let nav = Navigator::new(
        config,
        api.clone(),
        Arc::new(TtlCache::new()),
        history.clone(),
        shell.clone(),
    );
    Harness {
        api,
        shell,
        history,
        nav,
    }
}

// =============================================================================
// Record Builders
// =============================================================================

pub fn page(records: Vec<RawRecord>, total_count: u64) -> CatalogPage {
    CatalogPage {
        total_count,
        title: None,
        records,
    }
}

fn record(kind: &str, id: &str, label: &str, info: VideoMeta) -> RawRecord {
    RawRecord {
        video_info: VideoInfo {
            kind: kind.to_string(),
            id: id.to_string(),
            tvserie_id: None,
            season: None,
            episode: None,
        },
        item_info: ItemInfo {
            label: Some(label.to_string()),
            art: Default::default(),
            info,
        },
    }
}

pub fn movie(id: u32, title: &str) -> RawRecord {
    record(
        "movie",
        &id.to_string(),
        title,
        VideoMeta {
            title: Some(title.to_string()),
            originaltitle: Some(format!("{} (original)", title)),
            ..VideoMeta::default()
        },
    )
}

pub fn movies(count: u32) -> Vec<RawRecord> {
    (1..=count).map(|i| movie(i, &format!("Movie {}", i))).collect()
}

pub fn tv_series(id: &str, title: &str) -> RawRecord {
    let mut raw = record(
        "tvseries",
        id,
        title,
        VideoMeta {
            title: Some(title.to_string()),
            ..VideoMeta::default()
        },
    );
    raw.video_info.season = Some(1);
    raw
}

pub fn season(series: &str, number: u32) -> RawRecord {
    let mut raw = record(
        "seasons",
        &format!("{}{}", series, number),
        &format!("Season {}", number),
        VideoMeta::default(),
    );
    raw.video_info.tvserie_id = Some(series.to_string());
    raw.video_info.season = Some(number);
    raw
}

pub fn episode(series: &str, show: &str, season: u32, number: u32) -> RawRecord {
    let mut raw = record(
        "episodes",
        &format!("{}-{}-{}", series, season, number),
        &format!("Episode {}", number),
        VideoMeta {
            title: Some(format!("Episode {}", number)),
            tvshowtitle: Some(show.to_string()),
            season: Some(season),
            episode: Some(number),
            ..VideoMeta::default()
        },
    );
    raw.video_info.tvserie_id = Some(series.to_string());
    raw.video_info.season = Some(season);
    raw.video_info.episode = Some(number);
    raw
}

pub fn video(id: &str, label: &str) -> RawRecord {
    record("video", id, label, VideoMeta::default())
}
