//! Pipeline-level error type.

use thiserror::Error;

/// Errors surfaced by the experiment runner.
///
/// Each variant wraps the error type of the stage that failed, so callers
/// can match on where a run broke down without digging through strings.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The runner was started without any candidate models.
    #[error("No candidate models were configured for this run")]
    NoCandidates,

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] fincot_core::CoreError),

    /// Dataset loading or parsing failed.
    #[error("Dataset error: {0}")]
    Dataset(#[from] fincot_dataset::DatasetError),

    /// Answer generation failed.
    #[error("Model error: {0}")]
    Model(#[from] fincot_models::ModelError),

    /// Outcome assembly or CSV persistence failed.
    #[error("Report error: {0}")]
    Report(#[from] fincot_report::ReportError),

    /// Filesystem error while preparing the output directory.
    #[error("Output directory error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
