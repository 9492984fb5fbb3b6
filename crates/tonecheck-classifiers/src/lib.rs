//! tonecheck Classifiers
//!
//! Deterministic rule-based sentiment scoring over a static lexicon.
//!
//! The single-text pipeline runs in three stages:
//! - Tokenizer: lower-case, strip punctuation, split on whitespace
//! - Scorer: one fold over the tokens applying intensifiers and negators to the next
//!   sentiment word
//! - Aggregator: average the scores and normalize into percentages summing to 100
//!
//! The batch pipeline applies a [`Classifier`] to every row of a table.

pub mod aggregate;
pub mod batch;
pub mod classifier;
pub mod config;
pub mod lexicon;
pub mod scorer;
pub mod sentiment;
pub mod tokenizer;

pub use batch::{
    is_numeric_column, output_columns, AnnotatedRow, BatchPipeline, BatchProgress, BatchReport,
    BatchRow, CancelFlag, ProgressFn, ANALYSIS_COLUMNS, ROW_KEY,
};
pub use classifier::Classifier;
pub use config::BatchConfig;
pub use lexicon::{Lexicon, LexiconEntry, WordClass};
pub use sentiment::{analyze, Explanation, LexiconClassifier};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::batch::{BatchPipeline, BatchRow, CancelFlag};
    pub use crate::classifier::Classifier;
    pub use crate::sentiment::{analyze, LexiconClassifier};
}
