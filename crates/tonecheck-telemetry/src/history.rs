//! Bounded analysis history
//!
//! Entries are kept newest first. When the store is full, recording a new entry evicts
//! the oldest one.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tonecheck_core::{AnalysisResult, BatchSummary, Result, Sentiment};

/// Default number of retained entries
pub const DEFAULT_CAPACITY: usize = 50;

/// What produced a history entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryKind {
    Single,
    Batch,
}

/// Stored outcome of an analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum HistoryPayload {
    Single(AnalysisResult),
    Batch(BatchSummary),
}

/// One recorded analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub kind: HistoryKind,

    /// Analyzed text, or the input file name for a batch
    pub text: String,
    pub payload: HistoryPayload,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    /// Entry for a single-text analysis
    pub fn single(text: impl Into<String>, result: AnalysisResult) -> Self {
        Self::new(HistoryKind::Single, text.into(), HistoryPayload::Single(result))
    }

    /// Entry for a batch run over `source`
    pub fn batch(source: impl Into<String>, summary: BatchSummary) -> Self {
        Self::new(HistoryKind::Batch, source.into(), HistoryPayload::Batch(summary))
    }

    fn new(kind: HistoryKind, text: String, payload: HistoryPayload) -> Self {
        Self {
            id: generate_entry_id(),
            kind,
            text,
            payload,
            timestamp: Utc::now(),
        }
    }

    /// Headline label: the analysis label, or the dominant label of a non-empty batch
    pub fn sentiment(&self) -> Option<Sentiment> {
        match &self.payload {
            HistoryPayload::Single(result) => Some(result.sentiment),
            HistoryPayload::Batch(summary) => summary.dominant(),
        }
    }
}

fn generate_entry_id() -> String {
    format!("hist_{}", uuid::Uuid::new_v4())
}

/// Storage for recent analyses
pub trait HistoryStore: Send + Sync {
    /// Add an entry at the front, evicting the oldest beyond capacity
    fn record(&self, entry: HistoryEntry) -> Result<()>;

    /// All entries, newest first
    fn entries(&self) -> Vec<HistoryEntry>;

    fn clear(&self) -> Result<()>;

    fn len(&self) -> usize {
        self.entries().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-local history
#[derive(Debug)]
pub struct InMemoryHistory {
    capacity: usize,
    entries: RwLock<VecDeque<HistoryEntry>>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// A capacity of zero is raised to one
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: RwLock::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Seed from entries already ordered newest first, keeping at most `capacity`
    pub fn from_entries(capacity: usize, entries: Vec<HistoryEntry>) -> Self {
        let history = Self::with_capacity(capacity);
        {
            let mut stored = history.entries.write();
            stored.extend(entries.into_iter().take(history.capacity));
        }
        history
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn push(&self, entry: HistoryEntry) {
        let mut entries = self.entries.write();
        entries.push_front(entry);
        entries.truncate(self.capacity);
    }

    pub(crate) fn reset(&self) {
        self.entries.write().clear();
    }
}

impl Default for InMemoryHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStore for InMemoryHistory {
    fn record(&self, entry: HistoryEntry) -> Result<()> {
        self.push(entry);
        Ok(())
    }

    fn entries(&self) -> Vec<HistoryEntry> {
        self.entries.read().iter().cloned().collect()
    }

    fn clear(&self) -> Result<()> {
        self.reset();
        Ok(())
    }

    fn len(&self) -> usize {
        self.entries.read().len()
    }
}
