//! Configuration management for catalognav
//!
//! Handles config file loading/saving and the display strings used in labels.
//! Config is stored at ~/.config/catalognav/config.toml

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

use crate::models::Category;

/// Catalog API used when neither the environment nor the config names one
pub const DEFAULT_BASE_URL: &str = "https://api.video.az/v1";

/// Environment variable overriding `base_url`
pub const BASE_URL_ENV: &str = "CATALOGNAV_BASE_URL";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Content API root
    pub base_url: Option<String>,
    /// Prefix of every navigation link
    pub plugin_url: String,
    /// Label movies by original title, episodes as `<show>.sXXeYY`
    pub use_alt_names: bool,
    /// Enrich movie rows with quality and plot details
    pub movie_details: bool,
    /// Maximum stored search keywords
    pub history_length: usize,
    /// Lifetime of cached lookups
    pub cache_ttl_minutes: u64,
    /// Categories covered by an interactive search
    pub search: SearchScope,
    /// Categories covered by a universal search
    pub universal_search: SearchScope,
    pub labels: Labels,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: None,
            plugin_url: "plugin://plugin.video.videoaz/".to_string(),
            use_alt_names: false,
            movie_details: false,
            history_length: 10,
            cache_ttl_minutes: 180,
            search: SearchScope::default(),
            universal_search: SearchScope {
                movies: true,
                tvseries: true,
                videos: false,
            },
            labels: Labels::default(),
        }
    }
}

impl Config {
    /// Get config file path (~/.config/catalognav/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("catalognav").join("config.toml"))
    }

    /// Load config from the default path, or return defaults if not found
    pub fn load() -> Self {
        Self::path()
            .map(|p| Self::load_from(&p))
            .unwrap_or_default()
    }

    /// Load config from a specific file, falling back to defaults.
    /// An unreadable or malformed file is logged, a missing one is not.
    pub fn load_from(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "config unreadable, using defaults");
                return Self::default();
            }
        };
        toml::from_str(&contents).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "config malformed, using defaults");
            Self::default()
        })
    }

    /// Save config to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml = toml::to_string_pretty(self)?;
        std::fs::write(path, toml)?;
        Ok(())
    }

    /// Content API root with fallback chain:
    /// 1. Environment variable CATALOGNAV_BASE_URL
    /// 2. `base_url` from the config file
    /// 3. Built-in default
    pub fn base_url(&self) -> String {
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.is_empty() {
                return url;
            }
        }
        self.base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_minutes * 60)
    }
}

/// Per-category search switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchScope {
    pub movies: bool,
    pub tvseries: bool,
    pub videos: bool,
}

impl Default for SearchScope {
    fn default() -> Self {
        Self {
            movies: true,
            tvseries: true,
            videos: true,
        }
    }
}

impl SearchScope {
    /// Enabled categories in search order
    pub fn categories(&self) -> Vec<Category> {
        [
            (self.movies, Category::Movies),
            (self.tvseries, Category::TvSeries),
            (self.videos, Category::Videos),
        ]
        .into_iter()
        .filter_map(|(enabled, cat)| enabled.then_some(cat))
        .collect()
    }
}

/// Display strings. English by default; translations are supplied by
/// overriding them in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
    pub videos: String,
    pub movies: String,
    pub tv_series: String,
    pub search: String,
    pub new_search: String,
    pub categories: String,
    pub genres: String,
    pub language: String,
    pub all: String,
    pub page: String,
    pub previous_page: String,
    pub next_page: String,
    pub related: String,
    pub video_quality: String,
    pub audio_quality: String,
    pub connection_error: String,
    pub nothing_found: String,
    pub search_color: String,
    pub filter_color: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            videos: "Videos".into(),
            movies: "Movies".into(),
            tv_series: "TV Series".into(),
            search: "Search".into(),
            new_search: "New Search...".into(),
            categories: "Categories".into(),
            genres: "Genres".into(),
            language: "Language".into(),
            all: "All".into(),
            page: "Page".into(),
            previous_page: "Previous page...".into(),
            next_page: "Next page...".into(),
            related: "Related".into(),
            video_quality: "Video quality".into(),
            audio_quality: "Audio quality".into(),
            connection_error: "Connection error".into(),
            nothing_found: "Nothing found!".into(),
            search_color: "yellowgreen".into(),
            filter_color: "blue".into(),
        }
    }
}

impl Labels {
    /// `[COLOR=c][B]Title:[/B] value[/COLOR]` markup used by affordances
    pub fn affordance(&self, color: &str, title: &str, value: &str) -> String {
        format!("[COLOR={}][B]{}:[/B] {}[/COLOR]", color, title, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.base_url.is_none());
        assert_eq!(config.history_length, 10);
        assert_eq!(config.cache_ttl(), Duration::from_secs(180 * 60));
        assert!(!config.use_alt_names);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            use_alt_names = true
            [search]
            videos = false
            [labels]
            all = "Hamısı"
            "#,
        )
        .unwrap();
        assert!(config.use_alt_names);
        assert_eq!(config.labels.all, "Hamısı");
        assert_eq!(config.labels.next_page, "Next page...");
        assert_eq!(
            config.search.categories(),
            vec![Category::Movies, Category::TvSeries]
        );
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config {
            base_url: Some("http://localhost:9000".into()),
            movie_details: true,
            ..Config::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path), config);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::load_from(&dir.path().join("absent.toml")), Config::default());
    }

    #[test]
    fn test_malformed_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "use_alt_names = yes\n[labels\n").unwrap();
        assert_eq!(Config::load_from(&path), Config::default());
    }

    #[test]
    fn test_universal_scope_default() {
        assert_eq!(
            Config::default().universal_search.categories(),
            vec![Category::Movies, Category::TvSeries]
        );
    }

    #[test]
    fn test_affordance_markup() {
        let labels = Labels::default();
        assert_eq!(
            labels.affordance("blue", "Genres", "Drama"),
            "[COLOR=blue][B]Genres:[/B] Drama[/COLOR]"
        );
    }
}
