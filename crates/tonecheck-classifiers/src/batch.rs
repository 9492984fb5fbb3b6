//! Batch pipeline
//!
//! Applies a classifier to every row of a table and folds the results into a summary.
//! Rows are independent, so the concurrent runner splits them into contiguous chunks
//! and re-assembles the output in input order.

use crate::classifier::Classifier;
use crate::config::BatchConfig;
use futures::future::join_all;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tonecheck_core::{AnalysisResult, BatchSummary, Error, InputError, Result, Sentiment};
use tracing::{info, warn};

/// Identifier column skipped by the text-column fallback
pub const ROW_ID_COLUMN: &str = "id";

/// Substrings that mark a column as the text source
pub const TEXT_COLUMN_HINTS: [&str; 5] = ["text", "comment", "review", "message", "content"];

/// Columns appended to every analyzed row, in output order
pub const ANALYSIS_COLUMNS: [&str; 7] = [
    "sentiment",
    "sentiment_strength",
    "positive_confidence",
    "negative_confidence",
    "neutral_confidence",
    "overall_confidence",
    "word_count",
];

/// JSON key holding the row id of an annotated row
pub const ROW_KEY: &str = "row";

/// One input row: ordered column values plus a 1-based row id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRow {
    pub id: usize,
    fields: Vec<(String, String)>,
}

impl BatchRow {
    pub fn new(id: usize, fields: Vec<(String, String)>) -> Self {
        Self { id, fields }
    }

    /// Build a row by zipping a header with values; missing trailing values become ""
    pub fn from_record<H, V>(id: usize, headers: &[H], values: &[V]) -> Self
    where
        H: AsRef<str>,
        V: AsRef<str>,
    {
        let fields = headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                let value = values.get(i).map(|v| v.as_ref()).unwrap_or_default();
                (header.as_ref().to_string(), value.to_string())
            })
            .collect();
        Self { id, fields }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// Column names in input order
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }
}

/// Pick the text-bearing column from a header.
///
/// The first column whose lower-cased name contains any of [`TEXT_COLUMN_HINTS`] wins;
/// otherwise the first column that is not [`ROW_ID_COLUMN`]; otherwise the first column.
pub fn select_text_column<'a>(columns: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    let columns: Vec<&str> = columns.into_iter().collect();

    columns
        .iter()
        .find(|name| {
            let lowered = name.to_lowercase();
            TEXT_COLUMN_HINTS.iter().any(|hint| lowered.contains(hint))
        })
        .or_else(|| columns.iter().find(|name| !name.eq_ignore_ascii_case(ROW_ID_COLUMN)))
        .or_else(|| columns.first())
        .copied()
}

/// A row with its analysis attached
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedRow {
    pub row: BatchRow,
    pub result: AnalysisResult,
}

impl AnnotatedRow {
    pub fn sentiment(&self) -> Sentiment {
        self.result.sentiment
    }

    /// Rendered value of one of [`ANALYSIS_COLUMNS`]
    pub fn analysis_value(&self, column: &str) -> Option<String> {
        let r = &self.result;
        let value = match column {
            "sentiment" => r.sentiment.to_string(),
            "sentiment_strength" => r.strength.map(|s| s.to_string()).unwrap_or_default(),
            "positive_confidence" => r.confidences.positive.to_string(),
            "negative_confidence" => r.confidences.negative.to_string(),
            "neutral_confidence" => r.confidences.neutral.to_string(),
            "overall_confidence" => r.overall_confidence.to_string(),
            "word_count" => r.text_stats.word_count.to_string(),
            _ => return None,
        };
        Some(value)
    }

    /// Values aligned with [`output_columns`] over the original `columns`.
    ///
    /// An original column sharing a name with an analysis column carries the analysis
    /// value.
    pub fn values(&self, columns: &[&str]) -> Vec<String> {
        output_columns(columns.iter().copied())
            .into_iter()
            .map(|column| {
                self.analysis_value(column)
                    .unwrap_or_else(|| self.row.get(column).unwrap_or_default().to_string())
            })
            .collect()
    }

    fn serialize_analysis<M: SerializeMap>(
        &self,
        map: &mut M,
        column: &str,
    ) -> std::result::Result<bool, M::Error> {
        let r = &self.result;
        match column {
            "sentiment" => map.serialize_entry(column, &r.sentiment)?,
            "sentiment_strength" => map.serialize_entry(column, &r.strength)?,
            "positive_confidence" => map.serialize_entry(column, &r.confidences.positive)?,
            "negative_confidence" => map.serialize_entry(column, &r.confidences.negative)?,
            "neutral_confidence" => map.serialize_entry(column, &r.confidences.neutral)?,
            "overall_confidence" => map.serialize_entry(column, &r.overall_confidence)?,
            "word_count" => map.serialize_entry(column, &r.text_stats.word_count)?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

/// Original columns followed by the analysis columns they do not already name
pub fn output_columns<'a>(columns: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    let mut out: Vec<&str> = columns.into_iter().collect();
    for column in ANALYSIS_COLUMNS {
        if !out.contains(&column) {
            out.push(column);
        }
    }
    out
}

/// Whether `column` holds a bare integer in the annotated output
pub fn is_numeric_column(column: &str) -> bool {
    ANALYSIS_COLUMNS[2..].iter().any(|c| *c == column)
}

impl Serialize for AnnotatedRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let fields = self.row.fields();
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(ROW_KEY, &self.row.id)?;
        for (name, value) in fields {
            // The row id owns its key
            if name == ROW_KEY {
                continue;
            }
            if !self.serialize_analysis(&mut map, name)? {
                map.serialize_entry(name, value)?;
            }
        }
        for column in ANALYSIS_COLUMNS {
            if !fields.iter().any(|(name, _)| name == column) {
                self.serialize_analysis(&mut map, column)?;
            }
        }
        map.end()
    }
}

/// Output of a completed batch
#[derive(Debug, Clone, serde::Serialize)]
pub struct BatchReport {
    pub text_column: String,
    pub rows: Vec<AnnotatedRow>,
    pub summary: BatchSummary,
    pub elapsed_us: u64,
}

impl BatchReport {
    /// Original columns (taken from the first row) then the analysis columns
    pub fn header(&self) -> Vec<String> {
        output_columns(self.columns())
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Original column names, taken from the first row
    pub fn columns(&self) -> Vec<&str> {
        self.rows
            .first()
            .map(|first| first.row.columns().collect())
            .unwrap_or_default()
    }

    /// Serialization-ready records aligned with [`BatchReport::header`]
    pub fn records(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        let columns = self.columns();
        self.rows.iter().map(move |row| row.values(&columns))
    }
}

/// Progress after a row has been analyzed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    pub processed: usize,
    pub total: usize,
}

impl BatchProgress {
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.processed as f64 / self.total as f64
        }
    }
}

/// Shared progress callback for the concurrent runner
pub type ProgressFn = Arc<dyn Fn(BatchProgress) + Send + Sync>;

/// Cooperative cancellation, checked before each row
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Runs a classifier over tabular rows
#[derive(Clone)]
pub struct BatchPipeline {
    classifier: Arc<dyn Classifier>,
    config: BatchConfig,
    text_column: Option<String>,
}

impl BatchPipeline {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self {
            classifier,
            config: BatchConfig::default(),
            text_column: None,
        }
    }

    pub fn with_config(mut self, config: BatchConfig) -> Self {
        self.config = config;
        self
    }

    /// Use `column` instead of the name heuristic
    pub fn with_text_column(mut self, column: impl Into<String>) -> Self {
        self.text_column = Some(column.into());
        self
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Check the table shape and resolve the text column
    pub fn validate(&self, rows: &[BatchRow]) -> Result<String> {
        let first = rows.first().ok_or(InputError::NoRows)?;

        if let Some(limit) = self.config.row_limit() {
            if rows.len() > limit {
                return Err(InputError::TooManyRows {
                    rows: rows.len(),
                    limit,
                }
                .into());
            }
        }

        let column = match &self.text_column {
            Some(wanted) => first
                .columns()
                .find(|name| *name == wanted.as_str())
                .ok_or_else(|| InputError::NoTextColumn {
                    candidates: wanted.clone(),
                })?,
            None => select_text_column(first.columns()).ok_or_else(|| {
                InputError::NoTextColumn {
                    candidates: TEXT_COLUMN_HINTS.join(", "),
                }
            })?,
        };

        Ok(column.to_string())
    }

    fn annotate(&self, row: BatchRow, column: &str) -> AnnotatedRow {
        let result = self.classifier.classify(row.get(column).unwrap_or_default());
        AnnotatedRow { row, result }
    }

    /// Analyze every row in order on the calling thread
    pub fn run<F>(
        &self,
        rows: Vec<BatchRow>,
        cancel: &CancelFlag,
        mut on_progress: F,
    ) -> Result<BatchReport>
    where
        F: FnMut(BatchProgress),
    {
        let start = Instant::now();
        let text_column = self.validate(&rows)?;
        let total = rows.len();
        info!(rows = total, column = %text_column, classifier = self.classifier.name(), "starting batch");

        let mut annotated = Vec::with_capacity(total);
        for row in rows {
            if cancel.is_cancelled() {
                warn!(processed = annotated.len(), total, "batch cancelled");
                return Err(Error::Cancelled {
                    processed: annotated.len(),
                });
            }
            annotated.push(self.annotate(row, &text_column));
            on_progress(BatchProgress {
                processed: annotated.len(),
                total,
            });
        }

        Ok(self.finish(text_column, annotated, start))
    }

    /// Analyze rows across `workers` blocking tasks, preserving input order
    pub async fn run_concurrent(
        &self,
        rows: Vec<BatchRow>,
        cancel: CancelFlag,
        on_progress: Option<ProgressFn>,
    ) -> Result<BatchReport> {
        let start = Instant::now();
        let text_column = self.validate(&rows)?;
        let total = rows.len();
        let workers = self.config.workers.max(1);
        let chunk_size = total.div_ceil(workers).max(1);
        info!(rows = total, workers, column = %text_column, "starting concurrent batch");

        let processed = Arc::new(AtomicUsize::new(0));
        let mut chunks = Vec::with_capacity(workers);
        let mut rows = rows.into_iter().peekable();
        while rows.peek().is_some() {
            chunks.push(rows.by_ref().take(chunk_size).collect::<Vec<_>>());
        }

        let tasks = chunks.into_iter().map(|chunk| {
            let pipeline = self.clone();
            let column = text_column.clone();
            let cancel = cancel.clone();
            let processed = processed.clone();
            let on_progress = on_progress.clone();

            tokio::task::spawn_blocking(move || {
                let mut out = Vec::with_capacity(chunk.len());
                for row in chunk {
                    if cancel.is_cancelled() {
                        return None;
                    }
                    out.push(pipeline.annotate(row, &column));
                    let done = processed.fetch_add(1, Ordering::SeqCst) + 1;
                    if let Some(report) = &on_progress {
                        report(BatchProgress { processed: done, total });
                    }
                }
                Some(out)
            })
        });

        let mut annotated = Vec::with_capacity(total);
        for joined in join_all(tasks).await {
            let chunk = joined.map_err(|e| Error::internal(format!("batch worker failed: {e}")))?;
            match chunk {
                Some(rows) => annotated.extend(rows),
                None => {
                    let processed = processed.load(Ordering::SeqCst);
                    warn!(processed, total, "batch cancelled");
                    return Err(Error::Cancelled { processed });
                }
            }
        }

        Ok(self.finish(text_column, annotated, start))
    }

    fn finish(&self, text_column: String, rows: Vec<AnnotatedRow>, start: Instant) -> BatchReport {
        let summary = BatchSummary::from_labels(rows.iter().map(AnnotatedRow::sentiment));
        let elapsed_us = start.elapsed().as_micros() as u64;

        metrics::counter!("tonecheck_batch_rows_total").increment(summary.total as u64);
        metrics::histogram!("tonecheck_batch_latency_us").record(elapsed_us as f64);
        info!(
            total = summary.total,
            positive = summary.positive_count,
            negative = summary.negative_count,
            neutral = summary.neutral_count,
            elapsed_us,
            "batch complete"
        );

        BatchReport {
            text_column,
            rows,
            summary,
            elapsed_us,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentiment::LexiconClassifier;

    fn row(id: usize, fields: &[(&str, &str)]) -> BatchRow {
        BatchRow::new(
            id,
            fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    fn pipeline() -> BatchPipeline {
        BatchPipeline::new(Arc::new(LexiconClassifier::new()))
    }

    #[test]
    fn test_select_text_column_by_hint() {
        assert_eq!(select_text_column(["id", "author", "Review_Body"]), Some("Review_Body"));
        assert_eq!(select_text_column(["message", "text"]), Some("message"));
        assert_eq!(select_text_column(["user_comment", "content"]), Some("user_comment"));
    }

    #[test]
    fn test_select_text_column_fallbacks() {
        assert_eq!(select_text_column(["id", "body", "author"]), Some("body"));
        assert_eq!(select_text_column(["id"]), Some("id"));
        assert_eq!(select_text_column(Vec::<&str>::new()), None);
    }

    #[test]
    fn test_from_record_pads_missing_values() {
        let row = BatchRow::from_record(3, &["a", "b"], &["1"]);
        assert_eq!(row.get("a"), Some("1"));
        assert_eq!(row.get("b"), Some(""));
        assert_eq!(row.get("c"), None);
    }

    #[test]
    fn test_run_annotates_in_order() {
        let rows = vec![
            row(1, &[("id", "1"), ("text", "I love it")]),
            row(2, &[("id", "2"), ("text", "I hate it")]),
            row(3, &[("id", "3")]),
        ];
        let mut seen = Vec::new();
        let report = pipeline()
            .run(rows, &CancelFlag::new(), |p| seen.push(p.processed))
            .unwrap();

        assert_eq!(report.text_column, "text");
        assert_eq!(seen, vec![1, 2, 3]);
        let labels: Vec<_> = report.rows.iter().map(AnnotatedRow::sentiment).collect();
        assert_eq!(labels, vec![Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral]);
        // Missing column is analyzed as empty text
        assert_eq!(report.rows[2].result, AnalysisResult::empty());
    }

    #[test]
    fn test_empty_input_is_an_input_error() {
        let err = pipeline().run(Vec::new(), &CancelFlag::new(), |_| {}).unwrap_err();
        assert!(matches!(err, Error::Input(InputError::NoRows)));
    }

    #[test]
    fn test_headerless_row_has_no_text_column() {
        let err = pipeline().validate(&[row(1, &[])]).unwrap_err();
        assert!(matches!(err, Error::Input(InputError::NoTextColumn { .. })));
    }

    #[test]
    fn test_row_cap() {
        let rows: Vec<_> = (1..=3).map(|i| row(i, &[("text", "fine")])).collect();
        let capped = pipeline().with_config(BatchConfig {
            max_rows: 2,
            workers: 1,
        });
        let err = capped.validate(&rows).unwrap_err();
        assert!(matches!(
            err,
            Error::Input(InputError::TooManyRows { rows: 3, limit: 2 })
        ));
    }

    #[test]
    fn test_explicit_column_override() {
        let rows = vec![row(1, &[("text", "terrible"), ("notes", "great")])];
        let report = pipeline()
            .with_text_column("notes")
            .run(rows.clone(), &CancelFlag::new(), |_| {})
            .unwrap();
        assert_eq!(report.rows[0].sentiment(), Sentiment::Positive);

        let err = pipeline().with_text_column("missing").validate(&rows).unwrap_err();
        assert!(matches!(err, Error::Input(InputError::NoTextColumn { .. })));
    }

    #[test]
    fn test_cancel_before_first_row() {
        let cancel = CancelFlag::new();
        cancel.cancel();
        let rows = vec![row(1, &[("text", "good")])];
        let err = pipeline().run(rows, &cancel, |_| {}).unwrap_err();
        assert!(matches!(err, Error::Cancelled { processed: 0 }));
    }

    #[test]
    fn test_cancel_from_progress_callback() {
        let cancel = CancelFlag::new();
        let rows: Vec<_> = (1..=5).map(|i| row(i, &[("text", "good")])).collect();
        let err = pipeline()
            .run(rows, &cancel, |p| {
                if p.processed == 2 {
                    cancel.cancel();
                }
            })
            .unwrap_err();
        assert!(matches!(err, Error::Cancelled { processed: 2 }));
    }

    #[test]
    fn test_report_header_and_records() {
        let rows = vec![row(1, &[("id", "7"), ("comment", "Not good")])];
        let report = pipeline().run(rows, &CancelFlag::new(), |_| {}).unwrap();

        assert_eq!(
            report.header(),
            vec![
                "id",
                "comment",
                "sentiment",
                "sentiment_strength",
                "positive_confidence",
                "negative_confidence",
                "neutral_confidence",
                "overall_confidence",
                "word_count",
            ]
        );
        let records: Vec<_> = report.records().collect();
        assert_eq!(records[0][..3], ["7", "Not good", "Negative"]);
        assert_eq!(records[0][8], "2");
    }

    #[test]
    fn test_annotated_row_serializes_flat() {
        let rows = vec![row(1, &[("text", "okay")])];
        let report = pipeline().run(rows, &CancelFlag::new(), |_| {}).unwrap();
        let json = serde_json::to_value(&report.rows[0]).unwrap();

        assert_eq!(json["row"], 1);
        assert_eq!(json["text"], "okay");
        assert_eq!(json["sentiment"], "Positive");
        assert_eq!(json["sentiment_strength"], "Mild");
        assert_eq!(json["positive_confidence"], 69);
    }

    #[test]
    fn test_analysis_replaces_same_named_columns() {
        let rows = vec![row(
            1,
            &[("row", "r-9"), ("text", "I hate it"), ("sentiment", "Positive")],
        )];
        let report = pipeline().run(rows, &CancelFlag::new(), |_| {}).unwrap();

        let header = report.header();
        assert_eq!(header[..3], ["row", "text", "sentiment"]);
        assert_eq!(header.len(), 3 + ANALYSIS_COLUMNS.len() - 1);
        let records: Vec<_> = report.records().collect();
        assert_eq!(records[0][..3], ["r-9", "I hate it", "Negative"]);

        let json = serde_json::to_string(&report.rows[0]).unwrap();
        assert_eq!(json.matches("\"sentiment\":").count(), 1);
        assert_eq!(json.matches("\"row\":").count(), 1);
        assert!(json.starts_with("{\"row\":1,\"text\":\"I hate it\",\"sentiment\":\"Negative\""));
    }

    #[test]
    fn test_numeric_columns() {
        assert!(is_numeric_column("word_count"));
        assert!(is_numeric_column("positive_confidence"));
        assert!(!is_numeric_column("sentiment_strength"));
        assert!(!is_numeric_column("rating"));
    }

    #[test]
    fn test_progress_fraction() {
        assert_eq!(BatchProgress { processed: 1, total: 4 }.fraction(), 0.25);
        assert_eq!(BatchProgress { processed: 0, total: 0 }.fraction(), 1.0);
    }
}
