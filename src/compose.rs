//! Listing composer
//!
//! Builds the item sequence of one listing screen in a fixed order:
//! search affordance, filter affordances, content rows, pagination.
//!
//! Everything that needs the network (filter titles, movie details) is
//! resolved up front by [`ListingComposer::compose`]; the returned
//! [`Listing`] then transforms records one at a time as it is iterated.

use std::collections::HashMap;
use std::fmt;
use tracing::warn;

use crate::codec::{self, Action, Field, Link, Overrides};
use crate::config::Labels;
use crate::lookups::CatalogLookups;
use crate::models::{
    option_title, CatalogPage, Category, DisplayItem, FilterOption, MovieDetails, NavigationState,
    RawRecord, PAGE_SIZE,
};
use crate::transform::ItemTransformer;

/// Whether a page is a browse screen or a merged search result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListingMode {
    #[default]
    Browse,
    /// No affordances, no pagination, kind tags in labels
    SearchResults,
}

impl ListingMode {
    fn is_search(&self) -> bool {
        *self == ListingMode::SearchResults
    }
}

/// Composes listing screens
#[derive(Clone)]
pub struct ListingComposer {
    lookups: CatalogLookups,
    transformer: ItemTransformer,
    labels: Labels,
    plugin_url: String,
}

impl ListingComposer {
    pub fn new(
        lookups: CatalogLookups,
        transformer: ItemTransformer,
        labels: Labels,
        plugin_url: impl Into<String>,
    ) -> Self {
        Self {
            lookups,
            transformer,
            labels,
            plugin_url: plugin_url.into(),
        }
    }

    /// Compose the screen for `state` from a freshly fetched page.
    ///
    /// The listing consumes `page`; composing the same screen again needs a
    /// new page.
    pub async fn compose(&self, state: &NavigationState, page: CatalogPage, mode: ListingMode) -> Listing {
        let head = if mode.is_search() {
            Vec::new()
        } else {
            self.affordances(state).await
        };

        let details = if self.transformer.options().movie_details {
            self.lookups.movie_details_for(&page.records).await
        } else {
            HashMap::new()
        };

        let tail = if show_pagination(state, mode) {
            self.pagination(state, page.records.len())
        } else {
            Vec::new()
        };

        Listing {
            head: head.into_iter(),
            rows: Some(Rows {
                records: page.records.into_iter(),
                transformer: self.transformer.clone(),
                details,
                search: mode.is_search(),
            }),
            tail: tail.into_iter(),
            skipped: 0,
        }
    }

    async fn affordances(&self, state: &NavigationState) -> Vec<DisplayItem> {
        let category = state.category;
        // Affordance links always lead back to the first page.
        let params = codec::encode(state, &Overrides::new().remove(Field::Page));
        let link = |action: Action| self.url(Link::new(action, params.clone()));
        let mut items = Vec::new();

        if category.supports_search() {
            let label = self.labels.affordance(
                &self.labels.search_color,
                &self.labels.search,
                state.keyword().unwrap_or_default(),
            );
            items.push(DisplayItem::action(label, link(Action::SearchCategory)));
        }

        if category.supports_category_filter() {
            let options = self
                .options("category", self.lookups.category_options(category).await);
            let title = option_title(&options, state.category_filter.as_deref(), &self.labels.all);
            items.push(DisplayItem::action(
                self.filter_label(&self.labels.categories, &title),
                link(Action::SelectCategory),
            ));
        }

        if category.supports_genre_filter() {
            let options = self.options("genre", self.lookups.genre_options(category).await);
            let title = option_title(&options, state.genre_filter.as_deref(), &self.labels.all);
            items.push(DisplayItem::action(
                self.filter_label(&self.labels.genres, &title),
                link(Action::SelectGenre),
            ));
        }

        if category.supports_lang_filter() {
            let options = self.lookups.language_options().await;
            let title = option_title(&options, state.lang_filter.as_deref(), &self.labels.all);
            items.push(DisplayItem::action(
                self.filter_label(&self.labels.language, &title),
                link(Action::SelectLang),
            ));
        }

        items
    }

    fn options<E: fmt::Display>(&self, filter: &str, result: Result<Vec<FilterOption>, E>) -> Vec<FilterOption> {
        result.unwrap_or_else(|e| {
            warn!(filter, error = %e, "filter options unavailable, showing default title");
            Vec::new()
        })
    }

    fn filter_label(&self, title: &str, value: &str) -> String {
        self.labels.affordance(&self.labels.filter_color, title, value)
    }

    fn pagination(&self, state: &NavigationState, record_count: usize) -> Vec<DisplayItem> {
        let mut items = Vec::new();
        if state.page > 1 {
            items.push(DisplayItem::folder(
                self.labels.previous_page.clone(),
                self.url(Link::listing(&state.with_page(state.page - 1))),
            ));
        }
        // A full page is the only hint the API gives that more exist.
        // The last representable page has no successor.
        if let Some(next) = state.page.checked_add(1).filter(|_| record_count >= PAGE_SIZE) {
            items.push(DisplayItem::folder(
                self.labels.next_page.clone(),
                self.url(Link::listing(&state.with_page(next))),
            ));
        }
        items
    }

    fn url(&self, link: Link) -> String {
        link.to_url(&self.plugin_url)
    }
}

fn show_pagination(state: &NavigationState, mode: ListingMode) -> bool {
    state.category.is_paged() && !state.is_keyword_search() && !mode.is_search()
}

/// Search-result screens are composed against a synthetic movies state
pub fn search_results_state(keyword: &str) -> NavigationState {
    let mut state = NavigationState::new(Category::Movies);
    state.keyword = Some(keyword.to_string());
    state
}

// =============================================================================
// Listing
// =============================================================================

/// Finite, single-pass sequence of display items for one screen.
///
/// Records whose kind cannot be displayed are skipped and counted; see
/// [`Listing::skipped`].
pub struct Listing {
    head: std::vec::IntoIter<DisplayItem>,
    /// Content rows; absent for static menus
    rows: Option<Rows>,
    tail: std::vec::IntoIter<DisplayItem>,
    skipped: usize,
}

/// Raw records still waiting to be transformed
struct Rows {
    records: std::vec::IntoIter<RawRecord>,
    transformer: ItemTransformer,
    details: HashMap<String, MovieDetails>,
    search: bool,
}

impl Listing {
    /// Listing of ready-made items (static menus)
    pub fn from_items(items: Vec<DisplayItem>) -> Self {
        Self {
            head: items.into_iter(),
            rows: None,
            tail: Vec::new().into_iter(),
            skipped: 0,
        }
    }

    /// Empty listing (failed screens)
    pub fn empty() -> Self {
        Self::from_items(Vec::new())
    }

    /// Records skipped so far
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Drain the listing, returning the items and the skipped count
    pub fn collect_all(mut self) -> (Vec<DisplayItem>, usize) {
        let items: Vec<_> = self.by_ref().collect();
        (items, self.skipped)
    }

    fn next_record(&mut self) -> Option<DisplayItem> {
        let rows = self.rows.as_mut()?;
        for raw in rows.records.by_ref() {
            let details = rows.details.get(&raw.video_info.id);
            match rows.transformer.transform(&raw, rows.search, details) {
                Ok(item) => return Some(item),
                Err(e) => {
                    self.skipped += 1;
                    warn!(id = %raw.video_info.id, error = %e, "skipping record");
                }
            }
        }
        None
    }
}

impl Iterator for Listing {
    type Item = DisplayItem;

    fn next(&mut self) -> Option<DisplayItem> {
        self.head
            .next()
            .or_else(|| self.next_record())
            .or_else(|| self.tail.next())
    }
}

impl fmt::Debug for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listing")
            .field("pending_head", &self.head.len())
            .field("pending_records", &self.rows.as_ref().map_or(0, |r| r.records.len()))
            .field("pending_tail", &self.tail.len())
            .field("skipped", &self.skipped)
            .finish()
    }
}
