//! Prompt construction and completion parsing.
//!
//! Both capabilities in this crate drive plain chat models, so the prompts
//! carry the full task description and the answer format contract. The
//! generation side expects the model to reason first and close with an
//! `Answer:` line, which [`parse_cot_response`] splits back apart.

use tracing::warn;

use fincot_core::ModelAnswer;

/// System instruction for chain-of-thought answer generation.
pub const ANSWER_INSTRUCTION: &str = "Use the provided context to analyse and compute the final \
    answer to the financial question using numerical reasoning. Think step by step, then end \
    your reply with a line of the form `Answer: <result>` where <result> is only the final \
    numeric result in decimal.";

/// System instruction for the reasoning judge.
pub const JUDGE_INSTRUCTION: &str = "Assess the quality of the LLM's numerical reasoning steps \
    compared to the correct steps. Provide an answer between 1-10 where 1 is not similar and 10 \
    is very similar. Your whole reply must be an integer between 1-10.";

/// Marker separating a completion's reasoning trace from its final answer.
pub const ANSWER_MARKER: &str = "Answer:";

/// Build the user prompt for answer generation.
#[must_use]
pub fn answer_prompt(context: &str, question: &str) -> String {
    format!("Context:\n{context}\n\nQuestion: {question}")
}

/// Build the user prompt for the reasoning judge.
#[must_use]
pub fn judge_prompt(context: &str, reference_reasoning: &str, candidate_reasoning: &str) -> String {
    format!(
        "Actual Steps:\n{reference_reasoning}\n\nContext:\n{context}\n\nLLM Reasoning Steps:\n{candidate_reasoning}"
    )
}

/// Split a chain-of-thought completion into reasoning and final answer.
///
/// Everything before the last [`ANSWER_MARKER`] is the reasoning trace and
/// everything after it is the answer, both trimmed. A completion without
/// the marker becomes a bare answer with an empty reasoning trace, logged
/// at warning level.
#[must_use]
pub fn parse_cot_response(text: &str) -> ModelAnswer {
    match text.rfind(ANSWER_MARKER) {
        Some(position) => {
            let reasoning = text[..position].trim();
            let answer = text[position + ANSWER_MARKER.len()..].trim();
            ModelAnswer::new(answer, reasoning)
        }
        None => {
            warn!(
                "Completion has no '{}' marker, treating the whole text as the answer",
                ANSWER_MARKER
            );
            ModelAnswer::new(text.trim(), "")
        }
    }
}
