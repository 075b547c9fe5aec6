//! Error types for data operations.

use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur during data operations.
#[derive(Debug, Error)]
pub enum DataError {
    /// Network error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Provider returned an unexpected status
    #[error("OpenF1 API error: {0}")]
    Api(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Data parsing error
    #[error("Data parsing error: {0}")]
    Parse(String),

    /// Provider returned nothing for the request
    #[error("Missing data for {query}: {reason}")]
    MissingData {
        /// Query that was issued
        query: String,
        /// Reason for missing data
        reason: String,
    },

    /// Required column absent from an input artifact
    #[error("Missing column '{column}' in {artifact}")]
    MissingColumn {
        /// Column name that was expected
        column: String,
        /// Artifact that was read
        artifact: String,
    },

    /// Unknown session type code
    #[error("Invalid session code: {0}")]
    InvalidSessionCode(String),

    /// Cache lock was poisoned by a panicking holder
    #[error("Cache lock poisoned")]
    CacheLock,

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DataError {
    /// True when the provider simply has nothing for the request yet.
    pub const fn is_missing_data(&self) -> bool {
        matches!(self, Self::MissingData { .. })
    }
}
