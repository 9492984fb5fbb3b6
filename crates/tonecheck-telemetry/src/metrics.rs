//! In-process analysis counters

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tonecheck_core::{AnalysisResult, BatchSummary, Sentiment};

/// Counters for analyses and batch runs, shared by clone
#[derive(Clone)]
pub struct MetricsCollector {
    inner: Arc<MetricsInner>,
}

#[derive(Default)]
struct MetricsInner {
    analyses: AtomicU64,
    positive: AtomicU64,
    negative: AtomicU64,
    neutral: AtomicU64,
    batch_runs: AtomicU64,
    batch_rows: AtomicU64,
    total_latency_us: AtomicU64,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner::default()),
        }
    }

    fn label_counter(&self, sentiment: Sentiment) -> &AtomicU64 {
        match sentiment {
            Sentiment::Positive => &self.inner.positive,
            Sentiment::Negative => &self.inner.negative,
            Sentiment::Neutral => &self.inner.neutral,
        }
    }

    /// Record one single-text analysis
    pub fn record_analysis(&self, result: &AnalysisResult, latency_us: u64) {
        self.inner.analyses.fetch_add(1, Ordering::Relaxed);
        self.label_counter(result.sentiment)
            .fetch_add(1, Ordering::Relaxed);
        self.inner
            .total_latency_us
            .fetch_add(latency_us, Ordering::Relaxed);

        ::metrics::counter!("tonecheck_cli_analyses_total").increment(1);
    }

    /// Record a finished batch; each row counts as an analysis
    pub fn record_batch(&self, summary: &BatchSummary, latency_us: u64) {
        self.inner.batch_runs.fetch_add(1, Ordering::Relaxed);
        self.inner
            .batch_rows
            .fetch_add(summary.total as u64, Ordering::Relaxed);
        self.inner
            .analyses
            .fetch_add(summary.total as u64, Ordering::Relaxed);
        for sentiment in Sentiment::ALL {
            self.label_counter(sentiment)
                .fetch_add(summary.count(sentiment) as u64, Ordering::Relaxed);
        }
        self.inner
            .total_latency_us
            .fetch_add(latency_us, Ordering::Relaxed);

        ::metrics::counter!("tonecheck_cli_batches_total").increment(1);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            analyses: self.inner.analyses.load(Ordering::Relaxed),
            positive: self.inner.positive.load(Ordering::Relaxed),
            negative: self.inner.negative.load(Ordering::Relaxed),
            neutral: self.inner.neutral.load(Ordering::Relaxed),
            batch_runs: self.inner.batch_runs.load(Ordering::Relaxed),
            batch_rows: self.inner.batch_rows.load(Ordering::Relaxed),
            total_latency_us: self.inner.total_latency_us.load(Ordering::Relaxed),
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct MetricsSnapshot {
    pub analyses: u64,
    pub positive: u64,
    pub negative: u64,
    pub neutral: u64,
    pub batch_runs: u64,
    pub batch_rows: u64,
    pub total_latency_us: u64,
}

impl MetricsSnapshot {
    /// Mean latency per analysis
    pub fn avg_latency_us(&self) -> u64 {
        if self.analyses == 0 {
            0
        } else {
            self.total_latency_us / self.analyses
        }
    }

    /// Share of analyses that ended with `sentiment`
    pub fn rate(&self, sentiment: Sentiment) -> f64 {
        let count = match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Negative => self.negative,
            Sentiment::Neutral => self.neutral,
        };
        if self.analyses == 0 {
            0.0
        } else {
            count as f64 / self.analyses as f64
        }
    }
}
