//! tonecheck command-line interface
//!
//! Wires the lexicon classifier, the batch pipeline, CSV files and the analysis history
//! together behind the `tonecheck` binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod csv_io;
pub mod output;

pub use cli::{Cli, Commands};
pub use commands::{exit_status, App};
pub use config::{AppConfig, OutputFormat};
