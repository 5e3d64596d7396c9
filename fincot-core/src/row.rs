//! Flattened evaluation rows and model answers.

use serde::{Deserialize, Serialize};

/// Access to a final-answer string.
///
/// Implemented by reference rows and model answers alike so the accuracy
/// scorer can pair any two answer-bearing sequences.
pub trait HasAnswer {
    /// The raw answer text.
    fn answer(&self) -> &str;
}

/// Access to a free-text reasoning trace.
pub trait HasReasoning {
    /// The raw reasoning text.
    fn reasoning(&self) -> &str;
}

/// One flattened question-in-context unit submitted for scoring.
///
/// Rows are created by the dataset flattener and never mutated afterwards.
/// The `id` is inherited from the source record and is not unique when a
/// record carries several questions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvaluationRow {
    /// Source record identifier.
    pub id: String,
    /// Serialized context: pre-text, table, and post-text sections.
    pub context: String,
    /// The question text.
    pub question: String,
    /// Reference answer, raw and uncleaned.
    pub reference_answer: String,
    /// Machine-computed reference answer, when the source had one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_derived_answer: Option<String>,
    /// Ground-truth reasoning trace the judge scores against.
    #[serde(default)]
    pub reference_reasoning_steps: Vec<String>,
    /// Computation-step slice selected for this question.
    #[serde(default)]
    pub step_list: Vec<String>,
}

impl EvaluationRow {
    /// Reference reasoning steps joined into a single trace.
    #[must_use]
    pub fn reference_reasoning(&self) -> String {
        self.reference_reasoning_steps.join("\n")
    }
}

impl HasAnswer for EvaluationRow {
    fn answer(&self) -> &str {
        &self.reference_answer
    }
}

/// One generation result for an [`EvaluationRow`].
///
/// Produced by an answer-generation capability; positionally aligned 1:1
/// with the row sequence that was submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelAnswer {
    /// Final numeric answer as text.
    pub answer: String,
    /// Free-text chain-of-thought trace.
    pub reasoning: String,
}

impl ModelAnswer {
    /// Create an answer with its reasoning trace.
    pub fn new(answer: impl Into<String>, reasoning: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            reasoning: reasoning.into(),
        }
    }
}

impl HasAnswer for ModelAnswer {
    fn answer(&self) -> &str {
        &self.answer
    }
}

impl HasReasoning for ModelAnswer {
    fn reasoning(&self) -> &str {
        &self.reasoning
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_reference_reasoning_joined() {
        let row = EvaluationRow {
            reference_reasoning_steps: vec!["step one".into(), "step two".into()],
            ..Default::default()
        };
        assert_eq!(row.reference_reasoning(), "step one\nstep two");
    }

    #[test]
    fn test_capability_traits() {
        let row = EvaluationRow {
            reference_answer: "14.1%".into(),
            ..Default::default()
        };
        assert_eq!(row.answer(), "14.1%");

        let answer = ModelAnswer::new("14.0", "subtract then divide");
        assert_eq!(answer.answer(), "14.0");
        assert_eq!(answer.reasoning(), "subtract then divide");
    }

    #[test]
    fn test_model_answer_serde() {
        let answer = ModelAnswer::new("42", "sum the column");
        let json = serde_json::to_string(&answer).unwrap();
        let parsed: ModelAnswer = serde_json::from_str(&json).unwrap();
        assert_eq!(answer, parsed);
    }
}
