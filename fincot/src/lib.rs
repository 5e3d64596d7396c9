//! # fincot - Financial Chain-of-Thought Evaluation Harness
//!
//! fincot runs LLMs against financial numerical-reasoning QA datasets
//! (FinQA-style report excerpts with tables) and scores two things per
//! question: whether the final number is right, and how closely the model's
//! chain of thought tracks the human-annotated reasoning. Runs are offline
//! and deterministic: a seeded sampler fixes the question set, so two runs
//! with the same configuration are directly comparable.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fincot::{EvalConfig, ExperimentRunner, OpenAIChat};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     fincot::init_tracing();
//!
//!     let config = EvalConfig::from_env()?
//!         .with_dataset_path("data/train.json")
//!         .with_sample_size(50);
//!
//!     let report = ExperimentRunner::new(config)
//!         .with_candidate(OpenAIChat::from_env("gpt-4o-mini")?)
//!         .with_candidate(OpenAIChat::from_env("gpt-4o")?)
//!         .with_judge(OpenAIChat::from_env("gpt-4o")?)
//!         .run()
//!         .await?;
//!
//!     for run in &report.runs {
//!         println!(
//!             "{}: {:.2}% accurate over {} questions",
//!             run.summary.model, run.summary.accuracy, run.summary.num_questions
//!         );
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! fincot is organized as a workspace of focused crates:
//!
//! - [`fincot_core`] - Row and record types, configuration, errors
//! - [`fincot_dataset`] - Loading, value normalization, flattening, sampling
//! - [`fincot_models`] - Model capabilities, the OpenAI client, test mocks
//! - [`fincot_scorers`] - Answer accuracy and judged reasoning quality
//! - [`fincot_report`] - Outcome assembly and CSV persistence
//!
//! This crate re-exports the pieces and adds the [`ExperimentRunner`] that
//! drives them end to end.
//!
//! ## Outputs
//!
//! A run writes one `<model>_outcome.csv` per candidate with every
//! question, answer, and score, plus a `summary.csv` with one line per
//! model. The returned [`ExperimentReport`] carries the same summaries
//! along with the run id and timing.

#![warn(missing_docs)]
#![deny(unsafe_code)]

mod error;
mod runner;

// ============================================================================
// Crate Re-exports
// ============================================================================

/// Row and record types, configuration, and core errors.
pub use fincot_core as core;

/// Dataset loading, normalization, flattening, and sampling.
pub use fincot_dataset as dataset;

/// Model capabilities and implementations.
pub use fincot_models as models;

/// Answer accuracy and reasoning quality scoring.
pub use fincot_scorers as scorers;

/// Outcome assembly and CSV persistence.
pub use fincot_report as report;

// ============================================================================
// Flat Type Re-exports
// ============================================================================

// Core
pub use fincot_core::{
    Annotation, CoreError, Environment, EvalConfig, EvaluationRow, HasAnswer, HasReasoning,
    ModelAnswer, QaPair, RawRecord, RunId,
};

// Dataset
pub use fincot_dataset::{
    clean_value, load_records, parse_table, records_from_str, shuffle_and_sample, DatasetError,
    Flattener, NormalizedValue, TableRow,
};

// Models
pub use fincot_models::{
    parse_cot_response, AnswerGenerator, BoxedGenerator, BoxedJudge, MockGenerator, MockJudge,
    ModelError, OpenAIChat, ReasoningJudge,
};

// Scorers
pub use fincot_scorers::{
    score_answers, score_reasoning, score_rows, AccuracyReport, AccuracyVerdict, ItemOutcome,
    ReasoningReport, ReasoningScore, SkipReason, Verdict, ANSWER_TOLERANCE,
};

// Report
pub use fincot_report::{
    assemble, ModelSummary, OutcomeRow, OutcomeTable, ReportError, SummaryTable,
};

// Pipeline
pub use error::{PipelineError, PipelineResult};
pub use runner::{ExperimentReport, ExperimentRunner, ModelRun};

// ============================================================================
// Prelude Module
// ============================================================================

/// Convenient prelude for common imports.
///
/// ```rust
/// use fincot::prelude::*;
/// ```
pub mod prelude {
    pub use crate::core::{EvalConfig, EvaluationRow, HasAnswer, HasReasoning, ModelAnswer};
    pub use crate::dataset::{load_records, shuffle_and_sample, Flattener};
    pub use crate::models::{
        AnswerGenerator, MockGenerator, MockJudge, OpenAIChat, ReasoningJudge,
    };
    pub use crate::report::{assemble, ModelSummary, OutcomeTable, SummaryTable};
    pub use crate::scorers::{score_reasoning, score_rows, AccuracyReport, ReasoningReport};
    pub use crate::{ExperimentReport, ExperimentRunner, PipelineError, PipelineResult};
}

// ============================================================================
// Tracing Setup
// ============================================================================

/// Install a console tracing subscriber for the whole process.
///
/// The filter comes from `RUST_LOG` and defaults to `info` when the
/// variable is unset. Calling this more than once is harmless; only the
/// first call installs a subscriber.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

// ============================================================================
// Version Information
// ============================================================================

/// Returns the current version of fincot.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Returns version information as a tuple (major, minor, patch).
pub fn version_tuple() -> (u32, u32, u32) {
    let version = version();
    let parts: Vec<&str> = version.split('.').collect();
    (
        parts.first().and_then(|s| s.parse().ok()).unwrap_or(0),
        parts.get(1).and_then(|s| s.parse().ok()).unwrap_or(0),
        parts.get(2).and_then(|s| s.parse().ok()).unwrap_or(0),
    )
}
