//! tonecheck Telemetry
//!
//! Analysis history and in-process counters for tonecheck.
//!
//! Provides:
//! - A bounded, newest-first history of analyses behind the [`HistoryStore`] trait
//! - An in-memory store and a JSON-file store
//! - Counters for analyses, labels and batch runs

pub mod history;
pub mod metrics;
pub mod persistence;

pub use history::{
    HistoryEntry, HistoryKind, HistoryPayload, HistoryStore, InMemoryHistory, DEFAULT_CAPACITY,
};
pub use metrics::{MetricsCollector, MetricsSnapshot};
pub use persistence::JsonFileHistory;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::history::{HistoryEntry, HistoryStore, InMemoryHistory};
    pub use crate::metrics::MetricsCollector;
    pub use crate::persistence::JsonFileHistory;
}
