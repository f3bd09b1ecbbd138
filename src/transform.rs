//! Item transformer
//!
//! Turns one raw catalog record into a [`DisplayItem`]. The output is a new
//! value built from the record; the record itself is never touched, so the
//! same input always yields the same item.

use std::collections::BTreeMap;

use crate::codec::{self, Action, Link};
use crate::config::{Config, Labels};
use crate::error::{NavError, Result};
use crate::models::{
    Category, ContextAction, DisplayItem, MovieDetails, NavigationState, PlayTarget, RawRecord,
    VideoMeta,
};

/// Record kinds the transformer understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Movie,
    TvSeries,
    Season,
    Episode,
    Video,
}

impl RecordKind {
    /// Parse the API's `type` field (singular and plural spellings occur)
    pub fn parse(kind: &str) -> Result<Self> {
        match kind {
            "movie" => Ok(RecordKind::Movie),
            "tvseries" | "tv_series" => Ok(RecordKind::TvSeries),
            "season" | "seasons" => Ok(RecordKind::Season),
            "episode" | "episodes" => Ok(RecordKind::Episode),
            "video" => Ok(RecordKind::Video),
            other => Err(NavError::UnsupportedKind(other.to_string())),
        }
    }

    /// Value of `_type` in play links
    fn play_type(&self) -> &'static str {
        match self {
            RecordKind::Movie => "movie",
            RecordKind::Episode => "episodes",
            _ => "video",
        }
    }
}

/// User preferences that shape items
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformOptions {
    /// Original titles for movies, `<show>.sXXeYY` for episodes
    pub use_alt_names: bool,
    /// Merge quality and plot details into movie rows
    pub movie_details: bool,
}

/// Keys of [`VideoMeta`] that are typed fields; detail extras must not
/// shadow them.
const TYPED_META_KEYS: [&str; 7] = [
    "title",
    "originaltitle",
    "tvshowtitle",
    "plot",
    "year",
    "season",
    "episode",
];

/// Raw record → display item
#[derive(Debug, Clone)]
pub struct ItemTransformer {
    options: TransformOptions,
    labels: Labels,
    plugin_url: String,
}

impl ItemTransformer {
    pub fn new(options: TransformOptions, labels: Labels, plugin_url: impl Into<String>) -> Self {
        Self {
            options,
            labels,
            plugin_url: plugin_url.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            TransformOptions {
                use_alt_names: config.use_alt_names,
                movie_details: config.movie_details,
            },
            config.labels.clone(),
            config.plugin_url.clone(),
        )
    }

    pub fn options(&self) -> TransformOptions {
        self.options
    }

    /// Build the display item for `raw`.
    ///
    /// `search` marks search-result rows (kind tag in the label). `details`
    /// is the cached enrichment for a movie; it is ignored unless detail
    /// enrichment is enabled.
    pub fn transform(
        &self,
        raw: &RawRecord,
        search: bool,
        details: Option<&MovieDetails>,
    ) -> Result<DisplayItem> {
        let kind = RecordKind::parse(&raw.video_info.kind)?;
        let item = match kind {
            RecordKind::Movie => self.movie(raw, search, details),
            RecordKind::TvSeries => self.tv_series(raw, search),
            RecordKind::Season => self.season(raw),
            RecordKind::Episode => self.episode(raw),
            RecordKind::Video => self.video(raw, search),
        };
        Ok(item)
    }

    fn movie(&self, raw: &RawRecord, search: bool, details: Option<&MovieDetails>) -> DisplayItem {
        let info = &raw.item_info.info;
        let id = &raw.video_info.id;

        let title = if self.options.use_alt_names {
            info.originaltitle.clone().or_else(|| info.title.clone())
        } else {
            info.title.clone()
        }
        .or_else(|| raw.item_info.label.clone())
        .unwrap_or_default();

        let mut metadata = info.clone();
        if self.options.movie_details {
            if let Some(details) = details {
                self.merge_details(&mut metadata, details);
            }
        }
        metadata.title = None;

        let mut related = NavigationState::new(Category::MovieRelated);
        related.item_id = Some(id.clone());

        DisplayItem {
            label: self.tagged(search, &self.labels.movies, &title),
            target: self.play_url(RecordKind::Movie, raw),
            is_container: false,
            is_playable: true,
            metadata,
            art: raw.item_info.art.clone(),
            context_actions: vec![ContextAction {
                label: self.labels.related.clone(),
                target: self.url(Link::listing(&related)),
            }],
        }
    }

    fn tv_series(&self, raw: &RawRecord, search: bool) -> DisplayItem {
        let mut state = NavigationState::new(Category::Seasons);
        state.series_id = Some(raw.video_info.id.clone());
        state.season = raw.video_info.season.map(|s| s.to_string());

        let mut metadata = raw.item_info.info.clone();
        let label = if search {
            let title = metadata.title.take().unwrap_or_default();
            self.tagged(true, &self.labels.tv_series, &title)
        } else {
            default_label(raw)
        };

        self.container(raw, label, metadata, Link::listing(&state))
    }

    fn season(&self, raw: &RawRecord) -> DisplayItem {
        let mut state = NavigationState::new(Category::Episodes);
        state.series_id = raw.video_info.tvserie_id.clone();
        state.season = raw.video_info.season.map(|s| s.to_string());

        let metadata = raw.item_info.info.clone();
        self.container(raw, default_label(raw), metadata, Link::listing(&state))
    }

    fn episode(&self, raw: &RawRecord) -> DisplayItem {
        let mut metadata = raw.item_info.info.clone();
        let label = if self.options.use_alt_names {
            metadata.title = None;
            let season = raw.video_info.season.or(metadata.season).unwrap_or(0);
            let episode = raw.video_info.episode.or(metadata.episode).unwrap_or(0);
            format!(
                "{}.s{:02}e{:02}",
                metadata.tvshowtitle.as_deref().unwrap_or_default(),
                season,
                episode
            )
        } else {
            default_label(raw)
        };

        self.playable(raw, RecordKind::Episode, label, metadata)
    }

    fn video(&self, raw: &RawRecord, search: bool) -> DisplayItem {
        let label = if search {
            let title = raw.item_info.label.clone().unwrap_or_default();
            self.tagged(true, &self.labels.videos, &title)
        } else {
            default_label(raw)
        };
        self.playable(raw, RecordKind::Video, label, raw.item_info.info.clone())
    }

    fn container(&self, raw: &RawRecord, label: String, metadata: VideoMeta, link: Link) -> DisplayItem {
        DisplayItem {
            label,
            target: self.url(link),
            is_container: true,
            is_playable: false,
            metadata,
            art: raw.item_info.art.clone(),
            context_actions: Vec::new(),
        }
    }

    fn playable(&self, raw: &RawRecord, kind: RecordKind, label: String, metadata: VideoMeta) -> DisplayItem {
        DisplayItem {
            label,
            target: self.play_url(kind, raw),
            is_container: false,
            is_playable: true,
            metadata,
            art: raw.item_info.art.clone(),
            context_actions: Vec::new(),
        }
    }

    /// Compose `[B]Video quality:[/B] ..\n[B]Audio quality:[/B] ..\n\n<plot>`
    /// and fold the remaining detail tags into `metadata`.
    fn merge_details(&self, metadata: &mut VideoMeta, details: &MovieDetails) {
        let mut quality = Vec::new();
        if let Some(video) = details.video_quality.as_deref().filter(|q| !q.is_empty()) {
            quality.push(format!("[B]{}:[/B] {}", self.labels.video_quality, video));
        }
        if let Some(audio) = details.audio_quality.as_deref().filter(|q| !q.is_empty()) {
            quality.push(format!("[B]{}:[/B] {}", self.labels.audio_quality, audio));
        }

        let mut plot = quality.join("\n");
        if let Some(detail_plot) = details.plot.as_deref().filter(|p| !p.is_empty()) {
            if !plot.is_empty() {
                plot.push_str("\n\n");
            }
            plot.push_str(detail_plot);
        }
        if !plot.is_empty() {
            metadata.plot = Some(plot);
        }

        let extras: BTreeMap<_, _> = details
            .extra
            .iter()
            .filter(|(key, _)| !TYPED_META_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        metadata.extra.extend(extras);
    }

    fn tagged(&self, search: bool, tag: &str, title: &str) -> String {
        if search {
            format!("[{}]{}", tag, title)
        } else {
            title.to_string()
        }
    }

    fn play_url(&self, kind: RecordKind, raw: &RawRecord) -> String {
        let (tvserie_id, season) = match kind {
            RecordKind::Episode => (
                raw.video_info.tvserie_id.clone(),
                raw.video_info.season.map(|s| s.to_string()),
            ),
            _ => (None, None),
        };
        let target = PlayTarget {
            kind: kind.play_type().to_string(),
            id: raw.video_info.id.clone(),
            tvserie_id,
            season,
        };
        self.url(Link::new(Action::Play, codec::encode_play(&target)))
    }

    fn url(&self, link: Link) -> String {
        link.to_url(&self.plugin_url)
    }
}

fn default_label(raw: &RawRecord) -> String {
    raw.item_info
        .label
        .clone()
        .or_else(|| raw.item_info.info.title.clone())
        .unwrap_or_default()
}

// =============================================================================
// Tests
// =============================================================================
