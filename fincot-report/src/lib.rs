//! Outcome assembly and CSV persistence for evaluation runs.
//!
//! This crate turns the pieces of a finished run into tables a person can
//! read: the per-question [`OutcomeTable`] pairing every evaluation row with
//! the model's answer and any scores, and the cross-model [`SummaryTable`]
//! with one line per evaluated model.
//!
//! ## Core Concepts
//!
//! - **Assembly**: [`assemble`] joins rows, answers, and score reports
//!   positionally. Rows and answers must match in length; score reports are
//!   optional and are dropped with a logged error when their length differs.
//! - **Persistence**: both tables write themselves as CSV to any
//!   [`std::io::Write`] sink or to a path.
//!
//! ## Example
//!
//! ```rust,no_run
//! use fincot_core::{EvaluationRow, ModelAnswer};
//! use fincot_report::assemble;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let rows: Vec<EvaluationRow> = vec![];
//! let answers: Vec<ModelAnswer> = vec![];
//! let table = assemble(&rows, &answers, None, None)?;
//! table.write_csv_path("outcome.csv")?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

mod error;
mod outcome;
mod summary;

pub use error::{ReportError, ReportResult};
pub use outcome::{assemble, OutcomeRow, OutcomeTable};
pub use summary::{ModelSummary, SummaryTable};
