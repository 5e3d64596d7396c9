//! # fincot-dataset
//!
//! Dataset handling for the fincot evaluation harness: loading raw
//! financial QA records, normalizing their values, flattening them into
//! per-question evaluation rows, and drawing deterministic samples.
//!
//! ## Core Concepts
//!
//! - **Loading**: [`load_records`] reads a JSON array of records from disk,
//!   [`records_from_str`] parses one from memory.
//! - **Normalization**: [`clean_value`] turns raw cell text into a
//!   [`NormalizedValue`], and [`parse_table`] applies it across a whole
//!   table.
//! - **Flattening**: [`Flattener`] expands each record into one
//!   [`EvaluationRow`](fincot_core::EvaluationRow) per question, with the
//!   record's pre-text, table, and post-text serialized into a single
//!   context string.
//! - **Sampling**: [`shuffle_and_sample`] draws a seeded, reproducible
//!   subset so different models see the same questions.
//!
//! The pipeline applies these in order: load, sample, flatten.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod flatten;
pub mod loader;
pub mod normalize;
pub mod sample;

pub use error::{DatasetError, DatasetResult};
pub use flatten::Flattener;
pub use loader::{load_records, records_from_str};
pub use normalize::{clean_value, parse_table, NormalizedValue, TableRow};
pub use sample::shuffle_and_sample;
