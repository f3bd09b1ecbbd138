//! Search history storage
//!
//! Past keywords, most recent first, capped at a configured length.
//! Stored as JSON in ~/.local/share/catalognav/history.json

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{NavError, Result};

/// One stored search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub keyword: String,
}

/// Key-value persistence for the search history
pub trait HistoryStore: Send + Sync {
    fn load(&self) -> Result<Vec<HistoryEntry>>;
    fn store(&self, entries: &[HistoryEntry]) -> Result<()>;

    /// Put `keyword` in front, dropping an older copy and anything over `cap`
    fn push(&self, keyword: &str, cap: usize) -> Result<()> {
        let mut entries = self.load()?;
        entries.retain(|e| e.keyword != keyword);
        entries.insert(
            0,
            HistoryEntry {
                keyword: keyword.to_string(),
            },
        );
        entries.truncate(cap);
        self.store(&entries)
    }

    /// Current entries, persisting a trim when the cap shrank
    fn trimmed(&self, cap: usize) -> Result<Vec<HistoryEntry>> {
        let mut entries = self.load()?;
        if entries.len() > cap {
            entries.truncate(cap);
            self.store(&entries)?;
        }
        Ok(entries)
    }
}

// =============================================================================
// File Store
// =============================================================================

/// History persisted as a JSON file
#[derive(Debug, Clone)]
pub struct FileHistory {
    path: PathBuf,
}

impl FileHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default location under the user's data directory
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join("catalognav")
            .join("history.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileHistory {
    fn default() -> Self {
        Self::new(Self::default_path())
    }
}

impl HistoryStore for FileHistory {
    fn load(&self) -> Result<Vec<HistoryEntry>> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(history_error(&self.path, e)),
        };
        serde_json::from_str(&text).map_err(|e| history_error(&self.path, e))
    }

    fn store(&self, entries: &[HistoryEntry]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| history_error(&self.path, e))?;
        }
        let json = serde_json::to_string_pretty(entries).map_err(|e| history_error(&self.path, e))?;
        std::fs::write(&self.path, json).map_err(|e| history_error(&self.path, e))
    }
}

fn history_error(path: &Path, e: impl std::fmt::Display) -> NavError {
    NavError::History(format!("{}: {}", path.display(), e))
}

// =============================================================================
// Memory Store
// =============================================================================

/// In-process history, for tests and one-shot runs
#[derive(Debug, Default)]
pub struct MemoryHistory {
    entries: Mutex<Vec<HistoryEntry>>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keywords<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = keywords
            .into_iter()
            .map(|k| HistoryEntry { keyword: k.into() })
            .collect();
        Self {
            entries: Mutex::new(entries),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<HistoryEntry>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl HistoryStore for MemoryHistory {
    fn load(&self) -> Result<Vec<HistoryEntry>> {
        Ok(self.lock().clone())
    }

    fn store(&self, entries: &[HistoryEntry]) -> Result<()> {
        *self.lock() = entries.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords(store: &dyn HistoryStore) -> Vec<String> {
        store.load().unwrap().into_iter().map(|e| e.keyword).collect()
    }

    #[test]
    fn test_push_is_most_recent_first_and_capped() {
        let store = MemoryHistory::new();
        for keyword in ["a", "b", "c", "d"] {
            store.push(keyword, 3).unwrap();
        }
        assert_eq!(keywords(&store), vec!["d", "c", "b"]);
    }

    #[test]
    fn test_push_moves_repeat_to_front() {
        let store = MemoryHistory::with_keywords(["dune", "alien", "heat"]);
        store.push("heat", 10).unwrap();
        assert_eq!(keywords(&store), vec!["heat", "dune", "alien"]);
    }

    #[test]
    fn test_trimmed_persists() {
        let store = MemoryHistory::with_keywords(["1", "2", "3", "4"]);
        assert_eq!(store.trimmed(2).unwrap().len(), 2);
        assert_eq!(keywords(&store), vec!["1", "2"]);
    }

    #[test]
    fn test_file_history_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileHistory::new(dir.path().join("sub").join("history.json"));
        assert!(store.load().unwrap().is_empty());

        store.push("kitab", 10).unwrap();
        store.push("nasimi", 10).unwrap();

        let reopened = FileHistory::new(store.path());
        assert_eq!(keywords(&reopened), vec!["nasimi", "kitab"]);
    }

    #[test]
    fn test_file_history_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(&path, "not json").unwrap();
        let err = FileHistory::new(&path).load().unwrap_err();
        assert!(matches!(err, NavError::History(_)));
    }
}
