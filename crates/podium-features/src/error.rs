//! Error types for feature construction.

use thiserror::Error;

/// Result type for feature operations.
pub type Result<T> = std::result::Result<T, FeatureError>;

/// Errors that can occur while building features.
#[derive(Debug, Error)]
pub enum FeatureError {
    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// Aggregated frame is missing a value it must carry
    #[error("Missing value in column '{column}' at row {row}")]
    MissingValue {
        /// Column name
        column: String,
        /// Row index
        row: usize,
    },

    /// Feature matrix could not be assembled
    #[error("Shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}
