//! Error types for the eight-puzzle crate

use thiserror::Error;

use crate::puzzle::Move;

/// Main error type for the eight-puzzle crate
///
/// Search failures (unsolvable instances, exhausted budgets, time limits) are
/// not errors; they are reported through the result types of each strategy.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid puzzle state: {reason}")]
    InvalidState { reason: String },

    #[error("illegal move {mv} from state {state}")]
    IllegalMove { mv: Move, state: String },

    #[error("malformed state '{state}': expected exactly one blank, found {blanks}")]
    MalformedState { state: String, blanks: usize },

    #[error("position ({row}, {col}) is out of bounds (rows and columns are 0-2)")]
    InvalidPosition { row: usize, col: usize },

    #[error("invalid move '{input}' (expected up, down, left or right)")]
    ParseMove { input: String },

    #[error("invalid algorithm '{input}'. Expected one of: {expected}")]
    ParseAlgorithm { input: String, expected: String },

    #[error("invalid observation '{input}' (expected 'row,col=value' or 'index=value')")]
    ParseObservation { input: String },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },

    #[error("internal invariant violated: {message}")]
    InvariantViolation { message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}

impl Error {
    pub(crate) fn invalid_state(reason: impl Into<String>) -> Self {
        Error::InvalidState {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            message: message.into(),
        }
    }
}
