//! Record store error types.

use thiserror::Error;

/// Errors that can occur while reading or writing HR records.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("seed parse error: {0}")]
    Parse(String),

    #[error("record not found: {0}")]
    NotFound(String),

    #[error("duplicate record: {0}")]
    Duplicate(String),

    #[error("{0}")]
    Other(String),
}

/// Convenience alias for record store results.
pub type RecordResult<T> = Result<T, RecordError>;
