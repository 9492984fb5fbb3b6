//! Mock classifiers for testing
//!
//! Configurable implementations of the Classifier trait for exercising the batch
//! pipeline without depending on lexicon contents.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tonecheck_classifiers::{BatchRow, Classifier};
use tonecheck_core::{AnalysisResult, Confidences, Sentiment, SentimentStrength, TextStats};

/// Build a result with the given label at 80% confidence
pub fn fixed_result(sentiment: Sentiment) -> AnalysisResult {
    let confidences = match sentiment {
        Sentiment::Positive => Confidences::new(80, 0, 20),
        Sentiment::Negative => Confidences::new(0, 80, 20),
        Sentiment::Neutral => Confidences::new(10, 10, 80),
    };
    AnalysisResult {
        sentiment,
        confidences,
        overall_confidence: 80,
        average_score: 0.0,
        strength: Some(SentimentStrength::Mild),
        text_stats: TextStats::default(),
    }
}

/// A configurable mock classifier for testing
pub struct MockClassifier {
    name: String,
    default: Sentiment,
    simulated_latency: Option<Duration>,
    call_count: AtomicU32,
}

impl MockClassifier {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            default: Sentiment::Neutral,
            simulated_latency: None,
            call_count: AtomicU32::new(0),
        }
    }

    /// Label returned when the text carries no marker
    pub fn with_default(mut self, sentiment: Sentiment) -> Self {
        self.default = sentiment;
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.simulated_latency = Some(latency);
        self
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }
}

impl Classifier for MockClassifier {
    fn classify(&self, text: &str) -> AnalysisResult {
        self.call_count.fetch_add(1, Ordering::Relaxed);

        if let Some(latency) = self.simulated_latency {
            std::thread::sleep(latency);
        }

        // Markers in the text pick the label
        let sentiment = if text.contains("POS") {
            Sentiment::Positive
        } else if text.contains("NEG") {
            Sentiment::Negative
        } else {
            self.default
        };
        fixed_result(sentiment)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Sleeps longer for earlier rows so workers finish out of order
pub struct ReverseLatencyClassifier {
    base: Duration,
}

impl ReverseLatencyClassifier {
    pub fn new(base: Duration) -> Self {
        Self { base }
    }
}

impl Classifier for ReverseLatencyClassifier {
    fn classify(&self, text: &str) -> AnalysisResult {
        // Texts are "row-<n>"; smaller n waits longer
        let n: u32 = text
            .trim_start_matches("row-")
            .parse()
            .unwrap_or_default();
        std::thread::sleep(self.base.saturating_sub(self.base / 20 * n.min(19)));

        let sentiment = match n % 3 {
            0 => Sentiment::Positive,
            1 => Sentiment::Negative,
            _ => Sentiment::Neutral,
        };
        fixed_result(sentiment)
    }

    fn name(&self) -> &str {
        "reverse-latency"
    }
}

/// Rows with a single `text` column
pub fn text_rows<S: AsRef<str>>(texts: &[S]) -> Vec<BatchRow> {
    texts
        .iter()
        .enumerate()
        .map(|(i, text)| BatchRow::from_record(i + 1, &["text"], &[text.as_ref()]))
        .collect()
}
