//! Error types for report assembly and persistence.

use thiserror::Error;

/// Errors from assembling or writing result tables.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Evaluation rows and model answers differ in length.
    ///
    /// Unlike the optional score tables, which are merely dropped on a
    /// length mismatch, rows and answers are the backbone of the outcome
    /// table and cannot be paired partially.
    #[error("Evaluation rows and model answers are not the same length ({rows} vs {answers})")]
    LengthMismatch {
        /// Number of evaluation rows.
        rows: usize,
        /// Number of model answers.
        answers: usize,
    },

    /// CSV serialization failed.
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Filesystem error while persisting a table.
    #[error("Failed to write report file: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for report operations.
pub type ReportResult<T> = Result<T, ReportError>;
