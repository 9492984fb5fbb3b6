//! Configuration for the batch pipeline

use serde::{Deserialize, Serialize};

/// Limits and parallelism for batch runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Maximum rows accepted per batch, 0 disables the cap
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,

    /// Worker tasks used by the concurrent runner
    #[serde(default = "default_workers")]
    pub workers: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_rows: default_max_rows(),
            workers: default_workers(),
        }
    }
}

impl BatchConfig {
    /// Configuration without a row cap
    pub fn unlimited() -> Self {
        Self {
            max_rows: 0,
            ..Self::default()
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn row_limit(&self) -> Option<usize> {
        (self.max_rows > 0).then_some(self.max_rows)
    }
}

fn default_max_rows() -> usize {
    100
}

fn default_workers() -> usize {
    num_cpus::get()
}
