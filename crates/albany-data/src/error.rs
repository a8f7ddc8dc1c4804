//! Error types for data operations.

use chrono::NaiveDate;
use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur during data operations.
#[derive(Debug, Error)]
pub enum DataError {
    /// Dates and values disagree in length
    #[error("Length mismatch: {dates} dates but {values} values")]
    LengthMismatch {
        /// Number of timestamps supplied
        dates: usize,
        /// Number of values supplied
        values: usize,
    },

    /// Timestamps are not strictly increasing
    #[error("Timestamps must be strictly increasing: {previous} followed by {next}")]
    UnorderedDates {
        /// Earlier position in the input
        previous: NaiveDate,
        /// Offending timestamp that follows it
        next: NaiveDate,
    },

    /// Column not present in a panel
    #[error("Column not found: {0}")]
    MissingColumn(String),

    /// Column name used twice
    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),

    /// Series do not share the same timestamps
    #[error("Misaligned series: {0}")]
    Misaligned(String),

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Data parsing error
    #[error("Data parsing error: {0}")]
    Parse(String),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
