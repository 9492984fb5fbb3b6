//! Classifier trait

use tonecheck_core::AnalysisResult;

/// Trait for all sentiment classifiers.
///
/// Classification is total: every string, including the empty one, yields a result.
pub trait Classifier: Send + Sync {
    /// Classify the given text
    fn classify(&self, text: &str) -> AnalysisResult;

    /// Get the classifier name
    fn name(&self) -> &str;
}
