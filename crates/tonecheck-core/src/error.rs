//! Error types for tonecheck

/// Result type alias using tonecheck's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for tonecheck operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Tabular input that cannot be analyzed
    #[error("input error: {0}")]
    Input(#[from] InputError),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A batch run was cancelled between rows
    #[error("batch cancelled after {processed} rows")]
    Cancelled { processed: usize },

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Create a new malformed-input error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Input(InputError::Malformed(msg.into()))
    }

    /// Whether this error describes bad caller input rather than a system failure
    pub fn is_input(&self) -> bool {
        matches!(self, Self::Input(_))
    }
}

/// Problems with the tabular data handed to the batch pipeline
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    /// The table has no header row
    #[error("input has no header row")]
    MissingHeader,

    /// The table has a header but no data rows
    #[error("input contains no data rows")]
    NoRows,

    /// No column could be chosen as the text source
    #[error("no text column could be selected (looked for {candidates})")]
    NoTextColumn { candidates: String },

    /// More rows than the configured cap
    #[error("{rows} rows exceeds the limit of {limit} rows per batch")]
    TooManyRows { rows: usize, limit: usize },

    /// Input file larger than the configured cap
    #[error("file is {bytes} bytes, the limit is {limit} bytes")]
    FileTooLarge { bytes: u64, limit: u64 },

    /// Structurally broken input (bad quoting, ragged rows, invalid UTF-8)
    #[error("malformed input: {0}")]
    Malformed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_errors_convert_and_display() {
        let err: Error = InputError::TooManyRows { rows: 120, limit: 100 }.into();
        assert!(err.is_input());
        assert_eq!(
            err.to_string(),
            "input error: 120 rows exceeds the limit of 100 rows per batch"
        );
    }

    #[test]
    fn cancellation_is_not_an_input_error() {
        let err = Error::Cancelled { processed: 3 };
        assert!(!err.is_input());
        assert_eq!(err.to_string(), "batch cancelled after 3 rows");
    }
}
