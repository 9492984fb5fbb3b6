//! Subcommand execution

use crate::cli::Commands;
use crate::config::{AppConfig, OutputFormat};
use crate::csv_io;
use crate::output::{self, AnalysisView, BatchView};
use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tonecheck_classifiers::{
    BatchPipeline, BatchProgress, CancelFlag, Classifier, LexiconClassifier, ProgressFn,
};
use tonecheck_telemetry::{
    HistoryEntry, HistoryStore, InMemoryHistory, JsonFileHistory, MetricsCollector,
};
use tonecheck_core::Sentiment;
use tracing::{debug, info, warn};

/// Texts shown by `tonecheck samples`
pub const SAMPLE_TEXTS: [&str; 5] = [
    "I love this product! It's amazing and works perfectly.",
    "I hate waiting in long lines. It's so frustrating.",
    "The weather is okay today, nothing special.",
    "This movie made me cry tears of joy!",
    "I'm disappointed with the service quality.",
];

/// Everything a command needs, built once per invocation
pub struct App {
    config: AppConfig,
    classifier: Arc<LexiconClassifier>,
    history: Box<dyn HistoryStore>,
    metrics: MetricsCollector,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let history = open_history(&config);
        Self::with_history(config, history)
    }

    pub fn with_history(config: AppConfig, history: Box<dyn HistoryStore>) -> Self {
        Self {
            config,
            classifier: Arc::new(LexiconClassifier::new()),
            history,
            metrics: MetricsCollector::new(),
        }
    }

    fn format(&self) -> OutputFormat {
        self.config.output.format
    }

    pub fn history(&self) -> &dyn HistoryStore {
        self.history.as_ref()
    }

    pub fn metrics(&self) -> &MetricsCollector {
        &self.metrics
    }

    /// Run `command`, returning what should be printed on stdout
    pub async fn run(&self, command: Commands) -> Result<String> {
        let out = match command {
            Commands::Analyze {
                text,
                stdin,
                explain,
            } => {
                let text = match text {
                    Some(text) if !stdin => text,
                    _ => read_stdin()?,
                };
                self.analyze(&text, explain)?
            }
            Commands::Batch {
                input,
                output,
                column,
                ..
            } => {
                let cancel = CancelFlag::new();
                spawn_interrupt_handler(cancel.clone());
                self.batch(&input, output.as_deref(), column, cancel).await?
            }
            Commands::History {
                clear,
                limit,
                sentiment,
            } => self.show_history(clear, limit, sentiment)?,
            Commands::Samples => self.samples()?,
        };

        let snapshot = self.metrics.snapshot();
        debug!(
            metrics = ?snapshot,
            positive_rate = snapshot.rate(Sentiment::Positive),
            negative_rate = snapshot.rate(Sentiment::Negative),
            "command finished"
        );
        Ok(out)
    }

    pub fn analyze(&self, text: &str, explain: bool) -> Result<String> {
        let start = Instant::now();
        let rendered = if explain {
            let explanation = self.classifier.explain(text);
            self.remember(text, &explanation.result, start);
            output::render(self.format(), &explanation, || {
                output::render_explanation(text, &explanation)
            })?
        } else {
            let result = self.classifier.classify(text);
            self.remember(text, &result, start);
            let view = AnalysisView {
                text,
                result: &result,
            };
            output::render(self.format(), &view, || output::render_analysis(text, &result))?
        };
        Ok(rendered)
    }

    fn remember(&self, text: &str, result: &tonecheck_core::AnalysisResult, start: Instant) {
        self.metrics
            .record_analysis(result, start.elapsed().as_micros() as u64);
        self.record(HistoryEntry::single(text, result.clone()));
    }

    fn record(&self, entry: HistoryEntry) {
        if let Err(e) = self.history.record(entry) {
            warn!(error = %e, "failed to record history entry");
        }
    }

    pub async fn batch(
        &self,
        input: &Path,
        output_path: Option<&Path>,
        column: Option<String>,
        cancel: CancelFlag,
    ) -> Result<String> {
        let rows = csv_io::read_rows(input, self.config.batch.max_file_bytes)
            .with_context(|| format!("failed to read {}", input.display()))?;

        let mut pipeline = BatchPipeline::new(self.classifier.clone())
            .with_config(self.config.batch.pipeline.clone());
        if let Some(column) = column {
            pipeline = pipeline.with_text_column(column);
        }

        let report = pipeline
            .run_concurrent(rows, cancel, Some(progress_logger()))
            .await
            .with_context(|| format!("batch over {} failed", input.display()))?;

        if let Some(path) = output_path {
            csv_io::write_report_file(path, &report)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), rows = report.rows.len(), "annotated rows written");
        }

        let source = input.display().to_string();
        self.metrics.record_batch(&report.summary, report.elapsed_us);
        self.record(HistoryEntry::batch(source.clone(), report.summary));

        let view = BatchView {
            source: &source,
            text_column: &report.text_column,
            summary: &report.summary,
            dominant: report.summary.dominant(),
            elapsed_us: report.elapsed_us,
            output: output_path.map(|p| p.display().to_string()),
        };
        Ok(output::render(self.format(), &view, || {
            output::render_batch(&report, &view)
        })?)
    }

    pub fn show_history(
        &self,
        clear: bool,
        limit: Option<usize>,
        sentiment: Option<Sentiment>,
    ) -> Result<String> {
        if clear {
            let removed = self.history.len();
            self.history.clear().context("failed to clear history")?;
            return Ok(match self.format() {
                OutputFormat::Text => format!("Cleared {removed} history entries\n"),
                OutputFormat::Json => output::to_json(&serde_json::json!({ "cleared": removed }))?,
            });
        }

        let mut entries = self.history.entries();
        if let Some(wanted) = sentiment {
            entries.retain(|entry| entry.sentiment() == Some(wanted));
        }
        if let Some(limit) = limit {
            entries.truncate(limit);
        }
        Ok(output::render(self.format(), &entries, || {
            output::render_history(&entries)
        })?)
    }

    pub fn samples(&self) -> Result<String> {
        let results: Vec<_> = SAMPLE_TEXTS
            .iter()
            .map(|text| (*text, self.classifier.classify(text)))
            .collect();

        match self.format() {
            OutputFormat::Json => {
                let views: Vec<_> = results
                    .iter()
                    .map(|(text, result)| AnalysisView { text, result })
                    .collect();
                Ok(output::to_json(&views)?)
            }
            OutputFormat::Text => Ok(results
                .iter()
                .map(|(text, result)| output::render_analysis(text, result))
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }
}

fn open_history(config: &AppConfig) -> Box<dyn HistoryStore> {
    let capacity = config.history.capacity;
    if !config.history.enabled {
        return Box::new(InMemoryHistory::with_capacity(capacity));
    }

    let path = config.history.resolved_path();
    match JsonFileHistory::open_with_capacity(&path, capacity) {
        Ok(history) => {
            debug!(path = %history.path().display(), entries = history.len(), "history opened");
            Box::new(history)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "history unavailable, keeping it in memory");
            Box::new(InMemoryHistory::with_capacity(capacity))
        }
    }
}

fn read_stdin() -> Result<String> {
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .context("failed to read standard input")?;
    Ok(text)
}

/// Process exit status for a failed command: 2 for bad input, 1 otherwise
pub fn exit_status(err: &anyhow::Error) -> u8 {
    let bad_input = err
        .chain()
        .filter_map(|cause| cause.downcast_ref::<tonecheck_core::Error>())
        .any(tonecheck_core::Error::is_input);
    if bad_input {
        2
    } else {
        1
    }
}

/// Log progress at every tenth of the batch
fn progress_logger() -> ProgressFn {
    Arc::new(|progress: BatchProgress| {
        let step = (progress.total / 10).max(1);
        if progress.processed % step == 0 || progress.processed == progress.total {
            info!(
                processed = progress.processed,
                total = progress.total,
                percent = (progress.fraction() * 100.0).round() as u32,
                "batch progress"
            );
        }
    })
}

/// Cancel the batch cooperatively on Ctrl-C
fn spawn_interrupt_handler(cancel: CancelFlag) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, cancelling batch");
            cancel.cancel();
        }
    });
}
