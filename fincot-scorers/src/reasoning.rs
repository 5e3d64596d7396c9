//! Reasoning quality scoring via an LLM judge.

use tracing::{error, info, warn};

use fincot_core::{EvaluationRow, HasReasoning};
use fincot_models::ReasoningJudge;

use crate::result::{ItemOutcome, ReasoningReport, ReasoningScore, SkipReason};

/// Judge each candidate reasoning trace against its row's reference steps.
///
/// Rows are judged in order, one call each. A row is skipped rather than
/// zero-scored when its reference steps or the candidate trace are empty,
/// when the judge call fails, or when the verdict does not parse as a
/// number; one bad row never aborts the batch. Sequences of different
/// lengths are paired up to the shorter one.
pub async fn score_reasoning<A: HasReasoning>(
    rows: &[EvaluationRow],
    answers: &[A],
    judge: &dyn ReasoningJudge,
) -> ReasoningReport {
    if rows.len() != answers.len() {
        warn!(
            "Row and answer counts differ ({} vs {}); judging up to the shorter one",
            rows.len(),
            answers.len()
        );
    }

    let mut outcomes = Vec::with_capacity(rows.len().min(answers.len()));
    for (row, answer) in rows.iter().zip(answers.iter()) {
        outcomes.push(judge_row(row, answer.reasoning(), judge).await);
    }

    let report = ReasoningReport { outcomes };
    match report.average() {
        Some(average) => info!("Average reasoning score: {:.2}", average),
        None => info!("No reasoning scores to average"),
    }
    report
}

async fn judge_row(
    row: &EvaluationRow,
    candidate: &str,
    judge: &dyn ReasoningJudge,
) -> ItemOutcome {
    let reference = row.reference_reasoning();
    if reference.is_empty() || candidate.is_empty() {
        warn!("Row {} is missing reasoning data; skipping", row.id);
        return ItemOutcome::Skipped {
            id: row.id.clone(),
            reason: SkipReason::MissingReasoning,
        };
    }

    let verdict = match judge.assess(&row.context, &reference, candidate).await {
        Ok(verdict) => verdict,
        Err(err) => {
            error!("Reasoning assessment failed for row {}: {}", row.id, err);
            return ItemOutcome::Skipped {
                id: row.id.clone(),
                reason: SkipReason::JudgeFailure(err.to_string()),
            };
        }
    };

    match verdict.trim().parse::<f64>() {
        Ok(score) => {
            info!("Reasoning score for row {}: {}", row.id, score);
            ItemOutcome::Scored(ReasoningScore {
                id: row.id.clone(),
                score,
            })
        }
        Err(_) => {
            error!("Non-numeric verdict for row {}: {:?}", row.id, verdict);
            ItemOutcome::Skipped {
                id: row.id.clone(),
                reason: SkipReason::UnparsableVerdict(verdict),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fincot_core::ModelAnswer;
    use fincot_models::MockJudge;
    use pretty_assertions::assert_eq;

    fn row(id: &str, steps: &[&str]) -> EvaluationRow {
        EvaluationRow {
            id: id.to_string(),
            context: format!("context for {id}"),
            question: "q?".to_string(),
            reference_answer: "1".to_string(),
            reference_derived_answer: None,
            reference_reasoning_steps: steps.iter().map(ToString::to_string).collect(),
            step_list: Vec::new(),
        }
    }

    fn answer(reasoning: &str) -> ModelAnswer {
        ModelAnswer::new("1", reasoning)
    }

    #[tokio::test]
    async fn test_scores_are_averaged() {
        let rows = vec![row("doc-1", &["step one"]), row("doc-2", &["step one"])];
        let answers = vec![answer("traced a"), answer("traced b")];
        let judge = MockJudge::new("judge").with_verdict("8").with_verdict("6");

        let report = score_reasoning(&rows, &answers, &judge).await;

        assert_eq!(report.average(), Some(7.0));
        assert_eq!(report.len(), 2);
        assert_eq!(report.outcomes[0].id(), "doc-1");
        assert_eq!(report.outcomes[0].score(), Some(8.0));
    }

    #[tokio::test]
    async fn test_judge_receives_joined_reference_steps() {
        let rows = vec![row("doc-1", &["step one", "step two"])];
        let answers = vec![answer("the model reasoned")];
        let judge = MockJudge::new("judge").with_verdict("9");

        score_reasoning(&rows, &answers, &judge).await;

        let calls = judge.recorded_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].context, "context for doc-1");
        assert_eq!(calls[0].reference_reasoning, "step one\nstep two");
        assert_eq!(calls[0].candidate_reasoning, "the model reasoned");
    }

    #[tokio::test]
    async fn test_unparsable_verdict_is_skipped_not_zeroed() {
        let rows = vec![row("doc-1", &["step"]), row("doc-2", &["step"])];
        let answers = vec![answer("a"), answer("b")];
        let judge = MockJudge::new("judge")
            .with_verdict("8")
            .with_verdict("very similar!");

        let report = score_reasoning(&rows, &answers, &judge).await;

        assert_eq!(report.average(), Some(8.0));
        assert_eq!(report.skipped(), 1);
        assert!(matches!(
            &report.outcomes[1],
            ItemOutcome::Skipped {
                reason: SkipReason::UnparsableVerdict(v),
                ..
            } if v == "very similar!"
        ));
    }

    #[tokio::test]
    async fn test_judge_failure_does_not_abort_batch() {
        let rows = vec![row("doc-1", &["step"]), row("doc-2", &["step"])];
        let answers = vec![answer("a"), answer("b")];
        let judge = MockJudge::new("judge")
            .with_failure("judge offline")
            .with_verdict("4");

        let report = score_reasoning(&rows, &answers, &judge).await;

        assert_eq!(report.average(), Some(4.0));
        assert!(matches!(
            &report.outcomes[0],
            ItemOutcome::Skipped {
                reason: SkipReason::JudgeFailure(_),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_missing_reasoning_skips_without_calling_judge() {
        let rows = vec![row("doc-1", &[]), row("doc-2", &["step"])];
        let answers = vec![answer("traced"), answer("")];
        let judge = MockJudge::new("judge");

        let report = score_reasoning(&rows, &answers, &judge).await;

        assert_eq!(report.average(), None);
        assert_eq!(report.skipped(), 2);
        assert!(judge.recorded_calls().is_empty());
    }

    #[tokio::test]
    async fn test_fractional_verdicts_parse() {
        let rows = vec![row("doc-1", &["step"])];
        let answers = vec![answer("traced")];
        let judge = MockJudge::new("judge").with_verdict(" 7.5 ");

        let report = score_reasoning(&rows, &answers, &judge).await;
        assert_eq!(report.average(), Some(7.5));
    }
}
