//! # fincot-core
//!
//! Core data model, configuration, and capability traits for the fincot
//! evaluation harness.
//!
//! ## Core Concepts
//!
//! - **[`RawRecord`]**: one source document as loaded from the dataset file
//! - **[`EvaluationRow`]**: one flattened question-in-context unit submitted
//!   for generation and scoring
//! - **[`ModelAnswer`]**: one generation result, positionally aligned with
//!   the submitted rows
//! - **[`HasAnswer`] / [`HasReasoning`]**: capability traits the scorers
//!   consume instead of duck-typed field access
//! - **[`EvalConfig`]**: explicit run configuration built once and threaded
//!   through the pipeline entry point

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod id;
pub mod record;
pub mod row;

// Re-exports
pub use config::{EvalConfig, Environment};
pub use error::{CoreError, CoreResult};
pub use id::RunId;
pub use record::{Annotation, QaPair, RawRecord};
pub use row::{EvaluationRow, HasAnswer, HasReasoning, ModelAnswer};
