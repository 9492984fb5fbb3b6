//! Rendering results for stdout

use crate::config::OutputFormat;
use serde::Serialize;
use std::fmt::Write as _;
use tonecheck_classifiers::{BatchReport, Explanation};
use tonecheck_core::{AnalysisResult, BatchSummary, Sentiment};
use tonecheck_telemetry::{HistoryEntry, HistoryPayload};

const BAR_WIDTH: usize = 30;

/// Single analysis as printed by `analyze` and `samples`
#[derive(Debug, Serialize)]
pub struct AnalysisView<'a> {
    pub text: &'a str,
    #[serde(flatten)]
    pub result: &'a AnalysisResult,
}

/// Batch outcome without the per-row details
#[derive(Debug, Serialize)]
pub struct BatchView<'a> {
    pub source: &'a str,
    pub text_column: &'a str,
    pub summary: &'a BatchSummary,
    pub dominant: Option<Sentiment>,
    pub elapsed_us: u64,
    pub output: Option<String>,
}

pub fn to_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

fn bar(percent: u32) -> String {
    let filled = (percent as usize * BAR_WIDTH + 50) / 100;
    format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled.min(BAR_WIDTH)))
}

pub fn render_analysis(text: &str, result: &AnalysisResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Text:       {text}");
    match result.strength {
        Some(strength) => {
            let _ = writeln!(out, "Sentiment:  {} ({strength})", result.sentiment);
        }
        None => {
            let _ = writeln!(out, "Sentiment:  {}", result.sentiment);
        }
    }
    let _ = writeln!(out, "Confidence: {}%", result.overall_confidence);
    for sentiment in Sentiment::ALL {
        let percent = result.confidences.get(sentiment);
        let _ = writeln!(out, "  {:<9} {:>3}%  {}", sentiment.as_str(), percent, bar(percent));
    }
    let _ = writeln!(out, "Score:      {:.2}", result.average_score);
    let _ = writeln!(
        out,
        "Words:      {}  Sentences: {}",
        result.text_stats.word_count, result.text_stats.sentence_count
    );
    out
}

pub fn render_explanation(text: &str, explanation: &Explanation) -> String {
    let mut out = render_analysis(text, &explanation.result);
    let _ = writeln!(out, "Tokens:     {}", explanation.tokens.join(" "));
    if explanation.matches.is_empty() {
        let _ = writeln!(out, "Matches:    none");
    } else {
        let _ = writeln!(out, "Matches:");
        for entry in &explanation.matches {
            let class = format!("{:?}", entry.class).to_lowercase();
            let _ = writeln!(out, "  {:<14} {:<12} {:+}", entry.word, class, entry.weight);
        }
    }
    let scores: Vec<String> = explanation.scores.iter().map(|s| format!("{s:+.2}")).collect();
    let _ = writeln!(out, "Scores:     [{}]", scores.join(", "));
    out
}

pub fn render_batch(report: &BatchReport, view: &BatchView<'_>) -> String {
    let summary = view.summary;
    let mut out = String::new();
    let _ = writeln!(out, "Source:     {}", view.source);
    let _ = writeln!(out, "Column:     {}", view.text_column);
    let _ = writeln!(out, "Rows:       {}", summary.total);
    for sentiment in Sentiment::ALL {
        let count = summary.count(sentiment);
        let percent = if summary.total == 0 {
            0
        } else {
            (count * 100 + summary.total / 2) / summary.total
        };
        let _ = writeln!(out, "  {:<9} {:>5}  {:>3}%", sentiment.as_str(), count, percent);
    }
    if let Some(dominant) = view.dominant {
        let _ = writeln!(out, "Dominant:   {dominant}");
    }
    let _ = writeln!(out, "Elapsed:    {:.1} ms", view.elapsed_us as f64 / 1000.0);
    if let Some(output) = &view.output {
        let _ = writeln!(out, "Written to: {output} ({} columns)", report.header().len());
    }
    out
}

pub fn render_history(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "No history yet\n".to_string();
    }

    let mut out = String::new();
    for entry in entries {
        let when = entry.timestamp.format("%Y-%m-%d %H:%M:%S");
        let headline = match &entry.payload {
            HistoryPayload::Single(result) => {
                format!("{} {}%", result.sentiment, result.overall_confidence)
            }
            HistoryPayload::Batch(summary) => format!(
                "{} batch of {} ({}/{}/{})",
                entry
                    .sentiment()
                    .map_or("Empty", |label| label.as_str()),
                summary.total,
                summary.positive_count,
                summary.negative_count,
                summary.neutral_count
            ),
        };
        let _ = writeln!(out, "{when}  {:<22} {}", headline, preview(&entry.text, 60));
    }
    out
}

/// First `max` characters of `text` on one line
fn preview(text: &str, max: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max {
        flat
    } else {
        let cut: String = flat.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}

/// Pick text or JSON rendering
pub fn render<T: Serialize>(
    format: OutputFormat,
    value: &T,
    text: impl FnOnce() -> String,
) -> serde_json::Result<String> {
    match format {
        OutputFormat::Text => Ok(text()),
        OutputFormat::Json => to_json(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonecheck_classifiers::analyze;

    #[test]
    fn test_bar_width() {
        assert_eq!(bar(0), ".".repeat(BAR_WIDTH));
        assert_eq!(bar(100), "#".repeat(BAR_WIDTH));
        assert_eq!(bar(50).len(), BAR_WIDTH);
    }

    #[test]
    fn test_render_analysis_text() {
        let text = "I love this product! It's amazing and works perfectly.";
        let out = render_analysis(text, &analyze(text));
        assert!(out.contains("Sentiment:  Positive (Strong)"));
        assert!(out.contains("Confidence: 96%"));
    }

    #[test]
    fn test_analysis_json_is_flat() {
        let result = analyze("okay");
        let view = AnalysisView {
            text: "okay",
            result: &result,
        };
        let json: serde_json::Value = serde_json::from_str(&to_json(&view).unwrap()).unwrap();
        assert_eq!(json["text"], "okay");
        assert_eq!(json["sentiment"], "Positive");
    }

    #[test]
    fn test_preview_truncates() {
        assert_eq!(preview("short\ntext", 60), "short text");
        let long = "word ".repeat(40);
        let cut = preview(&long, 20);
        assert_eq!(cut.chars().count(), 20);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn test_empty_history() {
        assert_eq!(render_history(&[]), "No history yet\n");
    }

    #[test]
    fn test_batch_history_headline() {
        let summary = BatchSummary::from_labels([
            Sentiment::Negative,
            Sentiment::Negative,
            Sentiment::Positive,
        ]);
        let out = render_history(&[HistoryEntry::batch("reviews.csv", summary)]);
        assert!(out.contains("Negative batch of 3 (1/2/0)"));
        assert!(out.trim_end().ends_with("reviews.csv"));
    }
}
