//! Error types for model fitting and prediction.

use thiserror::Error;

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors that can occur during fitting or prediction.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Too few rows to fit and evaluate
    #[error("Insufficient data: need at least {required} rows, got {actual}")]
    InsufficientData {
        /// Required number of rows
        required: usize,
        /// Actual number of rows
        actual: usize,
    },

    /// Dimension mismatch
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension
        actual: usize,
    },

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}
