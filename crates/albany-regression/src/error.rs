//! Error types for regression and rolling statistics.

use albany_data::DataError;
use thiserror::Error;

/// Result type for regression operations.
pub type Result<T> = std::result::Result<T, RegressionError>;

/// Errors that can occur during regression estimation
#[derive(Debug, Error)]
pub enum RegressionError {
    /// Invalid parameter (zero window, unknown column, misaligned inputs)
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Dimension mismatch
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension
        actual: usize,
    },

    /// Fewer observations than regressors
    #[error("Insufficient data: need at least {required} observations, got {actual}")]
    InsufficientData {
        /// Required number of observations
        required: usize,
        /// Actual number of observations
        actual: usize,
    },

    /// Design matrix columns are linearly dependent
    #[error("Design matrix is rank-deficient at column {column}")]
    RankDeficient {
        /// First column found to be dependent on earlier ones
        column: usize,
    },

    /// Missing or infinite value in the inputs
    #[error("Inputs contain missing or non-finite values")]
    NonFinite,

    /// Data error
    #[error("Data error: {0}")]
    Data(#[from] DataError),
}
