use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Machine-readable reason an extraction was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReasonCode {
    AmbiguousEmployee,
    MissingField,
    UnparseableDate,
    InvalidDateRange,
    ModelFormatError,
}

/// Structured failure produced when model output cannot become an `Action`.
///
/// Zero matches and multiple matches for a name are both `AmbiguousEmployee`;
/// `candidates` is empty in the zero-match case.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExtractionFailure {
    #[error("ambiguous employee '{name}' ({} candidates)", candidates.len())]
    AmbiguousEmployee {
        name: String,
        candidates: Vec<String>,
    },

    #[error("missing required field '{field}'")]
    MissingField { field: String },

    #[error("unparseable date in '{field}': {value}")]
    UnparseableDate { field: String, value: String },

    #[error("end date {end} precedes start date {start}")]
    InvalidDateRange { start: String, end: String },

    #[error("model format error: {detail}")]
    ModelFormatError { detail: String },
}

impl ExtractionFailure {
    pub fn reason_code(&self) -> ReasonCode {
        match self {
            ExtractionFailure::AmbiguousEmployee { .. } => ReasonCode::AmbiguousEmployee,
            ExtractionFailure::MissingField { .. } => ReasonCode::MissingField,
            ExtractionFailure::UnparseableDate { .. } => ReasonCode::UnparseableDate,
            ExtractionFailure::InvalidDateRange { .. } => ReasonCode::InvalidDateRange,
            ExtractionFailure::ModelFormatError { .. } => ReasonCode::ModelFormatError,
        }
    }

    pub fn format_error(detail: impl Into<String>) -> Self {
        ExtractionFailure::ModelFormatError {
            detail: detail.into(),
        }
    }

    pub fn missing(field: impl Into<String>) -> Self {
        ExtractionFailure::MissingField {
            field: field.into(),
        }
    }
}
