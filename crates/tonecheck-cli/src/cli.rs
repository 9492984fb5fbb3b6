use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tonecheck_core::Sentiment;

#[derive(Parser, Debug)]
#[command(name = "tonecheck")]
#[command(
    author,
    version,
    about = "Rule-based sentiment analysis for text and CSV files"
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, default_value = "tonecheck.yaml")]
    pub config: String,

    /// Output format (overrides the configuration file)
    #[arg(short, long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    /// History file path (overrides the configuration file)
    #[arg(long, global = true)]
    pub history_file: Option<PathBuf>,

    /// Do not read or write the history file
    #[arg(long, global = true)]
    pub no_history: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a single text
    Analyze {
        /// Text to analyze
        #[arg(required_unless_present = "stdin", conflicts_with = "stdin")]
        text: Option<String>,

        /// Read the text from standard input
        #[arg(long)]
        stdin: bool,

        /// Show tokens, lexicon matches and per-word scores
        #[arg(long)]
        explain: bool,
    },

    /// Analyze every row of a CSV file
    Batch {
        /// Input CSV file with a header row
        input: PathBuf,

        /// Write the annotated rows to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Column holding the text (defaults to a name-based guess)
        #[arg(long)]
        column: Option<String>,

        /// Maximum rows accepted, 0 = no limit
        #[arg(long)]
        max_rows: Option<usize>,

        /// Worker tasks
        #[arg(short, long)]
        workers: Option<usize>,
    },

    /// List or clear past analyses
    History {
        /// Delete all entries
        #[arg(long)]
        clear: bool,

        /// Show at most this many entries
        #[arg(short, long)]
        limit: Option<usize>,

        /// Only entries whose headline label matches (positive, negative, neutral)
        #[arg(short, long)]
        sentiment: Option<Sentiment>,
    },

    /// Analyze the built-in sample texts
    Samples,
}
