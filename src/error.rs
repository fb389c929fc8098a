//! Custom error types for the dashboard core.
//!
//! This module defines the primary error type, `DashboardError`, for the whole crate.
//! Using the `thiserror` crate, it provides a centralized and consistent way to report
//! failures from ingestion, report composition, configuration and history persistence.
//!
//! ## Error Hierarchy
//!
//! `DashboardError` consolidates the following sources:
//!
//! - **`Validation`**: A data row is missing one of the required text fields (equipment
//!   name or type). Carries the 1-based data row index and the field name so a caller can
//!   render "row 2: missing name" without re-parsing anything.
//! - **`Parse`**: The raw CSV text itself is malformed (for example a row with a different
//!   column count than the header). Carries the row index and the parser's message.
//! - **`EmptyReport`**: A report was requested for a dataset without records.
//! - **`Config`** / **`Configuration`**: Figment extraction failures and semantic
//!   validation failures of the loaded configuration respectively.
//! - **`Io`** / **`Serialization`**: Only produced by the history persistence adapter.
//!
//! Removing an unknown dataset from the history store is deliberately not represented
//! here: it is a no-op, not a failure.
//!
//! By using `#[from]`, `DashboardError` can be created from the underlying error types with
//! the `?` operator.

use thiserror::Error;

/// Convenience alias for results using the crate error type.
pub type AppResult<T> = std::result::Result<T, DashboardError>;

/// Coarse classification of a [`DashboardError`], for callers that branch on the kind
/// of failure rather than on its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required field was missing from an input row.
    MissingField,
    /// The raw input could not be parsed.
    ParseError,
    /// A report was requested for an empty dataset.
    EmptyReport,
    /// Configuration could not be loaded or failed validation.
    Config,
    /// Reading or writing persisted state failed.
    Io,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ErrorKind::MissingField => "missing_field",
            ErrorKind::ParseError => "parse_error",
            ErrorKind::EmptyReport => "empty_report",
            ErrorKind::Config => "config",
            ErrorKind::Io => "io",
        };
        write!(f, "{}", label)
    }
}

/// Primary error type for the dashboard core.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// A row is missing `name` or `category`. The whole batch is rejected.
    #[error("Row {row_index}: missing required field '{field}'")]
    Validation {
        /// 1-based index of the offending data row (the header is not counted).
        row_index: usize,
        /// Name of the missing field (`"name"` or `"category"`).
        field: &'static str,
    },

    /// The raw tabular input is structurally malformed.
    #[error("Row {row_index}: {message}")]
    Parse {
        /// 1-based index of the offending data row (the header is not counted).
        row_index: usize,
        /// Message reported by the underlying parser.
        message: String,
    },

    /// A report was requested for a dataset without records.
    #[error("No data available to generate report")]
    EmptyReport,

    /// Configuration extraction failed.
    #[error("Configuration error: {0}")]
    Config(#[from] figment::Error),

    /// Configuration loaded but is semantically invalid.
    #[error("Configuration validation error: {0}")]
    Configuration(String),

    /// Reading or writing the history file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The history file could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DashboardError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DashboardError::Validation { .. } => ErrorKind::MissingField,
            DashboardError::Parse { .. } => ErrorKind::ParseError,
            DashboardError::EmptyReport => ErrorKind::EmptyReport,
            DashboardError::Config(_) | DashboardError::Configuration(_) => ErrorKind::Config,
            DashboardError::Io(_) | DashboardError::Serialization(_) => ErrorKind::Io,
        }
    }

    /// Data row the error refers to, for ingestion errors.
    pub fn row_index(&self) -> Option<usize> {
        match self {
            DashboardError::Validation { row_index, .. }
            | DashboardError::Parse { row_index, .. } => Some(*row_index),
            _ => None,
        }
    }
}
