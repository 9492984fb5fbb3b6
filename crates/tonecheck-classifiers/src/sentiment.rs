//! Lexicon-based sentiment classifier
//!
//! Runs the full single-text pipeline: tokenize, score, aggregate.

use crate::aggregate::aggregate;
use crate::classifier::Classifier;
use crate::lexicon::{Lexicon, LexiconEntry};
use crate::scorer::score_with;
use crate::tokenizer::tokenize;
use serde::Serialize;
use tonecheck_core::AnalysisResult;
use tracing::debug;

/// Intermediate stages of one analysis, for inspection
#[derive(Debug, Clone, Serialize)]
pub struct Explanation {
    pub tokens: Vec<String>,
    /// Lexicon hits in token order
    pub matches: Vec<LexiconEntry>,
    pub scores: Vec<f64>,
    pub result: AnalysisResult,
}

/// Deterministic rule-based classifier over a static lexicon
pub struct LexiconClassifier {
    name: String,
    lexicon: &'static Lexicon,
}

impl LexiconClassifier {
    pub fn new() -> Self {
        Self::with_name("lexicon")
    }

    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lexicon: Lexicon::global(),
        }
    }

    /// Classify and keep the tokens and scores that led to the result
    pub fn explain(&self, text: &str) -> Explanation {
        let tokens = tokenize(text);
        let matches = tokens
            .iter()
            .filter_map(|token| self.lexicon.entry(token))
            .collect();
        let scores = score_with(self.lexicon, &tokens);
        let result = aggregate(&scores, text);
        if !text.trim().is_empty() {
            self.observe(&result, tokens.len());
        }

        Explanation {
            tokens,
            matches,
            scores,
            result,
        }
    }

    fn observe(&self, result: &AnalysisResult, tokens: usize) {
        debug!(
            classifier = %self.name,
            sentiment = %result.sentiment,
            average_score = result.average_score,
            tokens,
            "classified text"
        );
        metrics::counter!("tonecheck_analyses_total", "sentiment" => result.sentiment.as_str())
            .increment(1);
    }
}

impl Default for LexiconClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier for LexiconClassifier {
    fn classify(&self, text: &str) -> AnalysisResult {
        if text.trim().is_empty() {
            return AnalysisResult::empty();
        }

        let tokens = tokenize(text);
        let scores = score_with(self.lexicon, &tokens);
        let result = aggregate(&scores, text);
        self.observe(&result, tokens.len());
        result
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Analyze `text` with the reference lexicon
pub fn analyze(text: &str) -> AnalysisResult {
    LexiconClassifier::new().classify(text)
}
