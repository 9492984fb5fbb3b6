//! tonecheck Core
//!
//! Types and error handling shared across tonecheck components.
//!
//! This crate provides:
//! - The analysis result model (labels, confidences, strength, text statistics)
//! - Batch summary counts
//! - Error types and result handling, including the `InputError` kind for bad tabular input

pub mod error;
pub mod types;

pub use error::{Error, InputError, Result};
pub use types::{
    AnalysisResult, BatchSummary, Confidences, Sentiment, SentimentStrength, TextStats,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, InputError, Result};
    pub use crate::types::{AnalysisResult, BatchSummary, Confidences, Sentiment, SentimentStrength};
}
