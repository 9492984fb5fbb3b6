//! Application configuration
//!
//! Loaded from a YAML file (missing file = defaults), then overridden by CLI flags.

use crate::cli::{Cli, Commands};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tonecheck_classifiers::BatchConfig;
use tonecheck_core::{Error, Result};
use tonecheck_telemetry::DEFAULT_CAPACITY;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub batch: BatchSettings,

    #[serde(default)]
    pub history: HistoryConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl AppConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(config_path: &str, cli: &Cli) -> Result<Self> {
        let mut config = Self::from_file(config_path)?;
        config.apply_overrides(cli);
        config.validate()?;
        Ok(config)
    }

    /// Read `path`, or fall back to defaults when it does not exist
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
            .map_err(|e| Error::config(format!("{}: {e}", path.display())))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::config(e.to_string()))
    }

    /// Apply CLI overrides
    pub fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(format) = cli.format {
            self.output.format = format;
        }

        if let Some(path) = &cli.history_file {
            self.history.path = Some(path.clone());
        }

        if cli.no_history {
            self.history.enabled = false;
        }

        if let Commands::Batch {
            max_rows, workers, ..
        } = &cli.command
        {
            if let Some(max_rows) = max_rows {
                self.batch.pipeline.max_rows = *max_rows;
            }
            if let Some(workers) = workers {
                self.batch.pipeline.workers = *workers;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch.pipeline.workers == 0 {
            return Err(Error::config("batch.workers must be at least 1"));
        }
        if self.history.capacity == 0 {
            return Err(Error::config("history.capacity must be at least 1"));
        }
        Ok(())
    }
}

/// Batch limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSettings {
    #[serde(flatten)]
    pub pipeline: BatchConfig,

    /// Largest accepted input file in bytes, 0 disables the check
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            pipeline: BatchConfig::default(),
            max_file_bytes: default_max_file_bytes(),
        }
    }
}

/// History persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// History file, defaults to the platform data directory
    #[serde(default)]
    pub path: Option<PathBuf>,

    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

impl HistoryConfig {
    pub fn resolved_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(default_history_path)
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
            capacity: default_capacity(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

/// How results are printed on stdout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

fn default_max_file_bytes() -> u64 {
    5 * 1024 * 1024
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn default_true() -> bool {
    true
}

fn default_history_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tonecheck")
        .join("history.json")
}
