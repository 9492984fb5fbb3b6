//! Core types for tonecheck

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Discrete polarity label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    /// All labels in fixed priority order (also the tie-break order)
    pub const ALL: [Sentiment; 3] = [Self::Positive, Self::Negative, Self::Neutral];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Negative => "Negative",
            Self::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "positive" => Ok(Self::Positive),
            "negative" => Ok(Self::Negative),
            "neutral" => Ok(Self::Neutral),
            other => Err(format!("unknown sentiment label: {other}")),
        }
    }
}

/// Qualitative bucket for the magnitude of the average token score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentStrength {
    Mild,
    Moderate,
    Strong,
}

impl SentimentStrength {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mild => "Mild",
            Self::Moderate => "Moderate",
            Self::Strong => "Strong",
        }
    }
}

impl fmt::Display for SentimentStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Percentage confidences for the three labels.
///
/// Values produced by the aggregator always sum to exactly 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confidences {
    pub positive: u32,
    pub negative: u32,
    pub neutral: u32,
}

impl Confidences {
    pub fn new(positive: u32, negative: u32, neutral: u32) -> Self {
        Self {
            positive,
            negative,
            neutral,
        }
    }

    /// Confidence for a single label
    pub fn get(&self, sentiment: Sentiment) -> u32 {
        match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Negative => self.negative,
            Sentiment::Neutral => self.neutral,
        }
    }

    pub fn sum(&self) -> u32 {
        self.positive + self.negative + self.neutral
    }

    /// Largest of the three percentages
    pub fn max(&self) -> u32 {
        self.positive.max(self.negative).max(self.neutral)
    }
}

/// Surface statistics of the original, unnormalized text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStats {
    pub word_count: usize,
    pub sentence_count: usize,
}

/// Outcome of analyzing one piece of text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Discrete label
    pub sentiment: Sentiment,

    /// Per-label percentages
    pub confidences: Confidences,

    /// Maximum of the three percentages (0 for empty input)
    pub overall_confidence: u32,

    /// Mean of the per-token score sequence
    pub average_score: f64,

    /// Absent for empty input
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strength: Option<SentimentStrength>,

    pub text_stats: TextStats,
}

impl AnalysisResult {
    /// Fixed result for empty or whitespace-only text
    pub fn empty() -> Self {
        Self {
            sentiment: Sentiment::Neutral,
            confidences: Confidences::new(33, 33, 34),
            overall_confidence: 0,
            average_score: 0.0,
            strength: None,
            text_stats: TextStats::default(),
        }
    }
}

/// Label counts over a finished batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub positive_count: usize,
    pub negative_count: usize,
    pub neutral_count: usize,
}

impl BatchSummary {
    /// Count labels from an iterator of per-row sentiments
    pub fn from_labels(labels: impl IntoIterator<Item = Sentiment>) -> Self {
        labels.into_iter().fold(Self::default(), |mut summary, label| {
            summary.total += 1;
            match label {
                Sentiment::Positive => summary.positive_count += 1,
                Sentiment::Negative => summary.negative_count += 1,
                Sentiment::Neutral => summary.neutral_count += 1,
            }
            summary
        })
    }

    pub fn count(&self, sentiment: Sentiment) -> usize {
        match sentiment {
            Sentiment::Positive => self.positive_count,
            Sentiment::Negative => self.negative_count,
            Sentiment::Neutral => self.neutral_count,
        }
    }

    /// Most frequent label, ties resolved in `Sentiment::ALL` order
    pub fn dominant(&self) -> Option<Sentiment> {
        if self.total == 0 {
            return None;
        }
        Sentiment::ALL
            .into_iter()
            .fold(None, |best: Option<Sentiment>, label| match best {
                Some(b) if self.count(b) >= self.count(label) => Some(b),
                _ => Some(label),
            })
    }
}
