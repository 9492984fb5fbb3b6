//! Score aggregation and confidence normalization
//!
//! Turns a score sequence into three integer percentages that always sum to 100, a
//! discrete label and a strength bucket.

use crate::tokenizer::text_stats;
use tonecheck_core::{AnalysisResult, Confidences, Sentiment, SentimentStrength};

/// Added to the normalization denominator so Neutral keeps some mass at any score
pub const SMOOTHING: f64 = 0.1;

/// A polar label needs strictly more than this percentage
pub const LABEL_THRESHOLD: u32 = 40;

/// |average| above this is Strong
pub const STRONG_THRESHOLD: f64 = 2.0;

/// |average| above this is Moderate
pub const MODERATE_THRESHOLD: f64 = 1.0;

/// Reduce `scores` for `original_text` into an [`AnalysisResult`].
///
/// Empty or whitespace-only text short-circuits to [`AnalysisResult::empty`].
pub fn aggregate(scores: &[f64], original_text: &str) -> AnalysisResult {
    if original_text.trim().is_empty() {
        return AnalysisResult::empty();
    }

    let average_score = mean(scores);
    let confidences = confidences(average_score);
    let sentiment = label(&confidences);

    AnalysisResult {
        sentiment,
        overall_confidence: confidences.max(),
        confidences,
        average_score,
        strength: Some(strength(average_score)),
        text_stats: text_stats(original_text),
    }
}

fn mean(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    }
}

/// Normalized percentages for an average score
pub fn confidences(average_score: f64) -> Confidences {
    let pos = average_score.max(0.0);
    let neg = (-average_score).max(0.0);
    let neut = 1.0 / (1.0 + average_score.abs());
    let total = pos + neg + neut + SMOOTHING;

    let percent = |mass: f64| (100.0 * mass / total).round() as i64;
    reconcile([percent(pos), percent(neg), percent(neut)])
}

/// Push the rounding remainder onto the largest category so the sum is exactly 100.
///
/// Input order is Positive, Negative, Neutral; on a tie the earliest category wins.
pub fn reconcile(mut percentages: [i64; 3]) -> Confidences {
    let diff = 100 - percentages.iter().sum::<i64>();

    let mut largest = 0;
    for (i, value) in percentages.iter().enumerate().skip(1) {
        if *value > percentages[largest] {
            largest = i;
        }
    }
    percentages[largest] += diff;

    let [positive, negative, neutral] = percentages.map(|p| p.clamp(0, 100) as u32);
    Confidences::new(positive, negative, neutral)
}

/// Polar labels need to hold the maximum and exceed [`LABEL_THRESHOLD`]
pub fn label(confidences: &Confidences) -> Sentiment {
    let max = confidences.max();
    if max <= LABEL_THRESHOLD {
        return Sentiment::Neutral;
    }

    if confidences.positive == max {
        Sentiment::Positive
    } else if confidences.negative == max {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

pub fn strength(average_score: f64) -> SentimentStrength {
    let magnitude = average_score.abs();
    if magnitude > STRONG_THRESHOLD {
        SentimentStrength::Strong
    } else if magnitude > MODERATE_THRESHOLD {
        SentimentStrength::Moderate
    } else {
        SentimentStrength::Mild
    }
}
