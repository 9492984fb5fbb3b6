//! File-backed history
//!
//! The whole history is stored as one pretty-printed JSON array, newest first. Every
//! mutation rewrites the file through a temporary sibling and a rename so a crash never
//! leaves a half-written document behind. Writers are serialized so concurrent records
//! never share the temporary file.

use crate::history::{HistoryEntry, HistoryStore, InMemoryHistory, DEFAULT_CAPACITY};
use parking_lot::Mutex;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tonecheck_core::Result;
use tracing::{debug, info, warn};

/// History persisted to a JSON file
#[derive(Debug)]
pub struct JsonFileHistory {
    path: PathBuf,
    cache: InMemoryHistory,
    write_lock: Mutex<()>,
}

impl JsonFileHistory {
    /// Open (or lazily create) the history file at `path` with the default capacity
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Self::open_with_capacity(path, DEFAULT_CAPACITY)
    }

    /// Open the history file, keeping at most `capacity` entries.
    ///
    /// A missing file starts an empty history. A file that cannot be parsed is logged and
    /// also treated as empty; it is overwritten on the next write.
    pub fn open_with_capacity(path: impl Into<PathBuf>, capacity: usize) -> Result<Self> {
        let path = path.into();
        let entries = load_entries(&path)?;
        debug!(path = %path.display(), entries = entries.len(), "history loaded");

        Ok(Self {
            cache: InMemoryHistory::from_entries(capacity, entries),
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rewrite the file from the cache; callers hold `write_lock`
    fn save(&self) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }

        let json = serde_json::to_vec_pretty(&self.cache.entries())?;
        let tmp = self.path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(&json)?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

fn load_entries(path: &Path) -> Result<Vec<HistoryEntry>> {
    let content = match fs::read(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    match serde_json::from_slice(&content) {
        Ok(entries) => Ok(entries),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "history file unreadable, starting empty");
            Ok(Vec::new())
        }
    }
}

impl HistoryStore for JsonFileHistory {
    fn record(&self, entry: HistoryEntry) -> Result<()> {
        let _guard = self.write_lock.lock();
        self.cache.push(entry);
        self.save()
    }

    fn entries(&self) -> Vec<HistoryEntry> {
        self.cache.entries()
    }

    fn clear(&self) -> Result<()> {
        let _guard = self.write_lock.lock();
        self.cache.reset();
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "history cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn len(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use tonecheck_core::{AnalysisResult, Sentiment};

    fn entry(text: &str) -> HistoryEntry {
        HistoryEntry::single(
            text,
            AnalysisResult {
                sentiment: Sentiment::Positive,
                ..AnalysisResult::empty()
            },
        )
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let history = JsonFileHistory::open(dir.path().join("history.json")).unwrap();
        assert!(history.is_empty());
    }

    #[test]
    fn test_entries_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("history.json");

        let history = JsonFileHistory::open(&path).unwrap();
        history.record(entry("first")).unwrap();
        history.record(entry("second")).unwrap();
        drop(history);

        let reopened = JsonFileHistory::open(&path).unwrap();
        let texts: Vec<_> = reopened.entries().into_iter().map(|e| e.text).collect();
        assert_eq!(texts, vec!["second", "first"]);
    }

    #[test]
    fn test_reopen_with_smaller_capacity_truncates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.json");

        let history = JsonFileHistory::open(&path).unwrap();
        for i in 0..5 {
            history.record(entry(&i.to_string())).unwrap();
        }

        let smaller = JsonFileHistory::open_with_capacity(&path, 2).unwrap();
        let texts: Vec<_> = smaller.entries().into_iter().map(|e| e.text).collect();
        assert_eq!(texts, vec!["4", "3"]);
    }

    #[test]
    fn test_corrupt_file_is_treated_as_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.json");
        fs::write(&path, b"{ not json").unwrap();

        let history = JsonFileHistory::open(&path).unwrap();
        assert!(history.is_empty());

        history.record(entry("fresh")).unwrap();
        let reopened = JsonFileHistory::open(&path).unwrap();
        assert_eq!(reopened.len(), 1);
    }

    #[test]
    fn test_clear_removes_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.json");

        let history = JsonFileHistory::open(&path).unwrap();
        history.record(entry("x")).unwrap();
        assert!(path.exists());

        history.clear().unwrap();
        assert!(!path.exists());
        assert!(history.is_empty());

        // Clearing twice is fine
        history.clear().unwrap();
    }
}
