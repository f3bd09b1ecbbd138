//! Navigator: the action registry
//!
//! Every link names an action; the navigator looks the action up in a table
//! built at construction and runs its handler against the link parameters.
//! Handlers never touch the terminal or the network directly: prompts go
//! through [`Shell`], catalog calls through the dispatcher and lookups.

use futures::future::BoxFuture;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::api::ContentApi;
use crate::cache::TtlCache;
use crate::codec::{self, Action, Field, Link, Overrides, SearchQuery, UPDATE_LISTING_KEY};
use crate::compose::{search_results_state, Listing, ListingComposer, ListingMode};
use crate::config::Config;
use crate::dispatch::{CategoryDispatcher, DispatchOutcome};
use crate::error::{ApiError, NavError, Result};
use crate::history::HistoryStore;
use crate::lookups::CatalogLookups;
use crate::models::{
    CatalogPage, Category, ContentKind, DisplayItem, FilterOption, NavigationState, Notice,
    RenderHint, SearchMode, SortHint,
};
use crate::transform::ItemTransformer;

/// Modal primitives of the host shell
pub trait Shell: Send + Sync {
    /// Single choice; `None` when dismissed
    fn select(&self, heading: &str, options: &[String]) -> Option<usize>;

    /// Text entry prefilled with `default`; `None` when dismissed
    fn input(&self, heading: &str, default: &str) -> Option<String>;
}

/// Result of activating a link
#[derive(Debug)]
pub enum Outcome {
    /// Render a listing
    Listing {
        listing: Listing,
        hint: RenderHint,
        notice: Option<Notice>,
    },
    /// Open another link in place of this one
    Redirect(Link),
    /// Start playback
    Play { url: String },
    /// Playback could not be resolved
    PlayFailed(Notice),
    /// The user dismissed a dialog; nothing changes
    Cancelled,
}

type Handler = for<'a> fn(&'a Navigator, &'a Link) -> BoxFuture<'a, Result<Outcome>>;

macro_rules! handler {
    ($method:ident) => {{
        fn call<'a>(nav: &'a Navigator, link: &'a Link) -> BoxFuture<'a, Result<Outcome>> {
            Box::pin(nav.$method(link))
        }
        call as Handler
    }};
}

/// Action registry plus everything the handlers need
pub struct Navigator {
    config: Config,
    api: Arc<dyn ContentApi>,
    dispatcher: CategoryDispatcher,
    lookups: CatalogLookups,
    composer: ListingComposer,
    history: Arc<dyn HistoryStore>,
    shell: Arc<dyn Shell>,
    handlers: HashMap<Action, Handler>,
}

impl Navigator {
    pub fn new(
        config: Config,
        api: Arc<dyn ContentApi>,
        cache: Arc<TtlCache>,
        history: Arc<dyn HistoryStore>,
        shell: Arc<dyn Shell>,
    ) -> Self {
        let dispatcher = CategoryDispatcher::new(Arc::clone(&api));
        let lookups = CatalogLookups::new(Arc::clone(&api), cache, config.cache_ttl());
        let composer = ListingComposer::new(
            lookups.clone(),
            ItemTransformer::from_config(&config),
            config.labels.clone(),
            config.plugin_url.clone(),
        );

        let handlers = HashMap::from([
            (Action::Root, handler!(root)),
            (Action::ListVideos, handler!(list_videos)),
            (Action::Search, handler!(search)),
            (Action::SearchCategory, handler!(search_category)),
            (Action::SearchHistory, handler!(search_history)),
            (Action::SelectCategory, handler!(select_category)),
            (Action::SelectGenre, handler!(select_genre)),
            (Action::SelectLang, handler!(select_lang)),
            (Action::Play, handler!(play)),
        ]);

        Self {
            config,
            api,
            dispatcher,
            lookups,
            composer,
            history,
            shell,
            handlers,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Parse and activate a link URL
    pub async fn open(&self, url: &str) -> Result<Outcome> {
        let link = Link::parse(url)?;
        self.activate(&link).await
    }

    /// Run the handler registered for `link.action`
    pub async fn activate(&self, link: &Link) -> Result<Outcome> {
        let handler = self
            .handlers
            .get(&link.action)
            .ok_or_else(|| NavError::UnknownAction(link.action.to_string()))?;
        debug!(action = %link.action, params = ?link.params, "activate");
        handler(self, link).await
    }

    /// Render `link` under the configured plugin URL
    pub fn url(&self, link: &Link) -> String {
        link.to_url(&self.config.plugin_url)
    }

    // =========================================================================
    // Handlers
    // =========================================================================

    async fn root(&self, _link: &Link) -> Result<Outcome> {
        let labels = &self.config.labels;
        let mut items: Vec<DisplayItem> = [
            (&labels.videos, Category::Videos),
            (&labels.movies, Category::Movies),
            (&labels.tv_series, Category::TvSeries),
        ]
        .into_iter()
        .map(|(label, category)| {
            DisplayItem::folder(label.clone(), self.url(&Link::listing(&NavigationState::new(category))))
        })
        .collect();
        items.push(DisplayItem::folder(
            labels.search.clone(),
            self.url(&Link::bare(Action::SearchHistory)),
        ));

        Ok(listing(Listing::from_items(items), RenderHint::new(ContentKind::Files), None))
    }

    async fn list_videos(&self, link: &Link) -> Result<Outcome> {
        let state = codec::decode(&link.params)?;

        let mut hint = RenderHint::new(state.category.content_kind());
        hint.replace = link.flag(UPDATE_LISTING_KEY) || state.page > 1;
        if state.category.is_paged() {
            hint.title = Some(format!("{} {}", self.config.labels.page, state.page));
        }

        match self.dispatcher.fetch(&state).await {
            Ok(DispatchOutcome::SingleSeasonShortcut { tvserie_id, season }) => {
                let mut episodes = NavigationState::new(Category::Episodes);
                episodes.series_id = Some(tvserie_id);
                episodes.season = season;
                Ok(Outcome::Redirect(Link::listing(&episodes).replacing()))
            }
            Ok(DispatchOutcome::Page(page)) => {
                if !state.category.is_paged() {
                    hint.title = page.title.clone();
                }
                let items = self.composer.compose(&state, page, ListingMode::Browse).await;
                Ok(listing(items, hint, None))
            }
            Err(NavError::Api(e)) => {
                hint.succeeded = false;
                Ok(listing(Listing::empty(), hint, Some(self.api_notice(&e))))
            }
            Err(e) => Err(e),
        }
    }

    async fn search(&self, link: &Link) -> Result<Outcome> {
        let query = SearchQuery::decode(&link.params);
        let labels = &self.config.labels;

        let Some(keyword) = query.keyword else {
            if query.mode == SearchMode::Alternate {
                let mut hint = RenderHint::new(ContentKind::Movies);
                hint.succeeded = false;
                return Ok(listing(Listing::empty(), hint, None));
            }
            let Some(keyword) = self.shell.input(&labels.search, "").filter(|k| !k.is_empty()) else {
                return Ok(Outcome::Cancelled);
            };
            if let Err(e) = self.history.push(&keyword, self.config.history_length) {
                warn!(error = %e, "could not record search");
            }
            info!(%keyword, "search submitted");
            return Ok(Outcome::Redirect(SearchQuery::new(keyword).link()));
        };

        let scope = match query.mode {
            SearchMode::Normal => self.config.search,
            SearchMode::Alternate => self.config.universal_search,
        };

        let mut records = Vec::new();
        let mut notice = None;
        let mut succeeded = true;
        for category in scope.categories() {
            match self.dispatcher.search(category, &keyword).await {
                Ok(page) => records.extend(page.records),
                Err(NavError::Api(e)) => {
                    succeeded = false;
                    notice = Some(self.api_notice(&e));
                }
                Err(e) => return Err(e),
            }
        }

        if succeeded && records.is_empty() {
            succeeded = false;
            if query.mode == SearchMode::Normal {
                notice = Some(Notice::info(labels.nothing_found.clone()));
            }
        }
        debug!(%keyword, found = records.len(), succeeded, "search finished");

        let mut hint = RenderHint::new(ContentKind::Movies);
        hint.succeeded = succeeded;
        hint.title = Some(keyword.clone());
        hint.sort = SortHint::Label;

        let page = CatalogPage {
            total_count: records.len() as u64,
            title: None,
            records,
        };
        let items = self
            .composer
            .compose(&search_results_state(&keyword), page, ListingMode::SearchResults)
            .await;
        Ok(listing(items, hint, notice))
    }

    async fn search_category(&self, link: &Link) -> Result<Outcome> {
        let state = codec::decode(&link.params)?;
        let current = state.keyword().unwrap_or_default();

        let Some(text) = self.shell.input(&self.config.labels.search, current) else {
            return Ok(Outcome::Cancelled);
        };
        let keyword = Some(text).filter(|k| !k.is_empty());
        let params = codec::encode(
            &state,
            &Overrides::new()
                .remove(Field::Page)
                .apply(Field::Keyword, keyword),
        );
        Ok(Outcome::Redirect(Link::new(Action::ListVideos, params).replacing()))
    }

    async fn search_history(&self, _link: &Link) -> Result<Outcome> {
        let labels = &self.config.labels;
        let entries = self
            .history
            .trimmed(self.config.history_length)
            .unwrap_or_else(|e| {
                warn!(error = %e, "search history unavailable");
                Vec::new()
            });

        let mut items = vec![DisplayItem::folder(
            labels.new_search.clone(),
            self.url(&Link::bare(Action::Search)),
        )];
        items.extend(entries.into_iter().map(|entry| {
            let url = self.url(&SearchQuery::new(entry.keyword.clone()).link());
            DisplayItem::folder(entry.keyword, url)
        }));

        Ok(listing(Listing::from_items(items), RenderHint::new(ContentKind::Movies), None))
    }

    async fn select_category(&self, link: &Link) -> Result<Outcome> {
        let state = codec::decode(&link.params)?;
        let options = self.lookups.category_options(state.category).await?;
        Ok(self.choose_filter(&state, Field::CategoryFilter, &self.config.labels.categories, options))
    }

    async fn select_genre(&self, link: &Link) -> Result<Outcome> {
        let state = codec::decode(&link.params)?;
        let options = self.lookups.genre_options(state.category).await?;
        Ok(self.choose_filter(&state, Field::GenreFilter, &self.config.labels.genres, options))
    }

    async fn select_lang(&self, link: &Link) -> Result<Outcome> {
        let state = codec::decode(&link.params)?;
        let options = self.lookups.language_options().await;
        Ok(self.choose_filter(&state, Field::LangFilter, &self.config.labels.language, options))
    }

    async fn play(&self, link: &Link) -> Result<Outcome> {
        let target = codec::decode_play(&link.params)?;
        match self.api.stream_url(&target).await {
            Ok(url) => {
                info!(kind = %target.kind, id = %target.id, "resolved stream");
                Ok(Outcome::Play { url })
            }
            Err(e) => {
                warn!(kind = %target.kind, id = %target.id, error = %e, "stream unavailable");
                Ok(Outcome::PlayFailed(self.api_notice(&e)))
            }
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Ask for a filter value and redirect to the filtered listing.
    /// Choosing "All" removes the filter.
    fn choose_filter(
        &self,
        state: &NavigationState,
        field: Field,
        heading: &str,
        mut options: Vec<FilterOption>,
    ) -> Outcome {
        options.insert(0, FilterOption::all(self.config.labels.all.clone()));
        let titles: Vec<String> = options.iter().map(|o| o.title.clone()).collect();

        let Some(choice) = self.shell.select(heading, &titles).and_then(|i| options.get(i)) else {
            return Outcome::Cancelled;
        };
        let value = (!choice.is_all()).then(|| choice.id.clone());
        debug!(filter = field.key(), value = ?value, "filter selected");

        let params = codec::encode(
            state,
            &Overrides::new().remove(Field::Page).apply(field, value),
        );
        Outcome::Redirect(Link::new(Action::ListVideos, params).replacing())
    }

    fn api_notice(&self, error: &ApiError) -> Notice {
        if error.is_connection() {
            Notice::error(self.config.labels.connection_error.clone())
        } else {
            Notice::error(error.to_string())
        }
    }
}

fn listing(listing: Listing, hint: RenderHint, notice: Option<Notice>) -> Outcome {
    Outcome::Listing {
        listing,
        hint,
        notice,
    }
}
