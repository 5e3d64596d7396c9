//! Error types for dataset operations.

use thiserror::Error;

/// Errors that can occur while loading or parsing a dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The dataset file could not be read.
    #[error("Failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    /// The dataset contents are not valid JSON of the expected shape.
    #[error("Failed to parse dataset: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for dataset operations.
pub type DatasetResult<T> = Result<T, DatasetError>;
