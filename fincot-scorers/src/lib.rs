//! # fincot-scorers
//!
//! The two scoring passes of the fincot evaluation harness.
//!
//! ## Core Concepts
//!
//! - **Answer accuracy**: [`score_answers`] pairs reference and predicted
//!   answers positionally, parses both numerically after symbol stripping,
//!   and classifies each pair with an absolute tolerance of 1.0. The
//!   aggregate is a percentage.
//! - **Reasoning quality**: [`score_reasoning`] asks a
//!   [`ReasoningJudge`](fincot_models::ReasoningJudge) to rate each
//!   candidate reasoning trace against the reference steps on a 1-10
//!   scale. Rows the judge cannot score are skipped, never zero-filled,
//!   and the aggregate is the mean of what remains.
//!
//! Both scorers tolerate length mismatches by pairing up to the shorter
//! sequence. Neither returns errors; degraded inputs degrade the report
//! and are logged.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod accuracy;
pub mod reasoning;
pub mod result;

pub use accuracy::{score_answers, score_rows, ANSWER_TOLERANCE};
pub use reasoning::score_reasoning;
pub use result::{
    AccuracyReport, AccuracyVerdict, ItemOutcome, ReasoningReport, ReasoningScore, SkipReason,
    Verdict,
};
