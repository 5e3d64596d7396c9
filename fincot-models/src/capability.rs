//! Capability traits consumed by the evaluation pipeline.
//!
//! The pipeline never talks to a provider API directly. It asks for two
//! things: an answer to a financial question, and a judgement of how close
//! a candidate reasoning trace is to the reference. Any type implementing
//! these traits can be plugged in, including the scripted mocks in
//! [`crate::mock`].

use std::sync::Arc;

use async_trait::async_trait;

use fincot_core::ModelAnswer;

use crate::error::ModelResult;

/// Capability to answer a financial question from a serialized context.
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    /// Name of the underlying model, used to label output artifacts.
    fn name(&self) -> &str;

    /// Produce a final answer and its reasoning trace for one question.
    async fn generate(&self, context: &str, question: &str) -> ModelResult<ModelAnswer>;
}

/// Capability to rate candidate reasoning against reference reasoning.
#[async_trait]
pub trait ReasoningJudge: Send + Sync {
    /// Name of the underlying judge model.
    fn name(&self) -> &str;

    /// Rate how closely the candidate reasoning matches the reference
    /// steps, returning the judge's raw textual verdict. Callers parse the
    /// verdict themselves since judges do not always follow instructions.
    async fn assess(
        &self,
        context: &str,
        reference_reasoning: &str,
        candidate_reasoning: &str,
    ) -> ModelResult<String>;
}

/// Shared reference to a dynamic answer generator.
pub type BoxedGenerator = Arc<dyn AnswerGenerator>;

/// Shared reference to a dynamic reasoning judge.
pub type BoxedJudge = Arc<dyn ReasoningJudge>;
