//! Answer accuracy scoring.

use tracing::{debug, info, warn};

use fincot_core::{EvaluationRow, HasAnswer};

use crate::result::{AccuracyReport, AccuracyVerdict, Verdict};

/// Absolute tolerance for numeric comparison. Reference answers in
/// financial QA datasets are rounded inconsistently, so exact matching
/// would punish correct computations.
pub const ANSWER_TOLERANCE: f64 = 1.0;

/// Compare reference and predicted answers pairwise.
///
/// Both raw strings are stripped of `(`, `)`, `$`, `£`, and `%` and parsed
/// as floats. A pair is correct when both sides parse and their absolute
/// difference is at most [`ANSWER_TOLERANCE`]; a failed parse on either
/// side makes the pair incorrect. Sequences of different lengths are
/// paired up to the shorter one with a warning, and empty input yields an
/// empty report with zero accuracy.
pub fn score_answers<R, A>(references: &[R], answers: &[A]) -> AccuracyReport
where
    R: HasAnswer,
    A: HasAnswer,
{
    if references.is_empty() || answers.is_empty() {
        warn!("One or both answer lists are empty");
        return AccuracyReport::empty();
    }
    if references.len() != answers.len() {
        warn!(
            "Answer lists have different lengths ({} vs {}); processing up to the shorter one",
            references.len(),
            answers.len()
        );
    }

    let mut verdicts = Vec::new();
    let mut correct = 0;
    for (index, (reference, answer)) in references.iter().zip(answers.iter()).enumerate() {
        let result = compare_pair(reference.answer(), answer.answer());
        if result.is_correct() {
            correct += 1;
        }
        debug!("Result [{}]: {}", index, result);
        verdicts.push(AccuracyVerdict { id: None, result });
    }

    let total = verdicts.len();
    let accuracy = 100.0 * correct as f64 / total as f64;
    info!("Accuracy: {:.2}% ({}/{})", accuracy, correct, total);

    AccuracyReport {
        verdicts,
        correct,
        total,
        accuracy,
    }
}

/// Score evaluation rows against model answers, tagging each verdict with
/// its row id.
pub fn score_rows<A: HasAnswer>(rows: &[EvaluationRow], answers: &[A]) -> AccuracyReport {
    let mut report = score_answers(rows, answers);
    for (verdict, row) in report.verdicts.iter_mut().zip(rows.iter()) {
        verdict.id = Some(row.id.clone());
    }
    report
}

fn compare_pair(reference: &str, predicted: &str) -> Verdict {
    let reference = strip_symbols(reference);
    let predicted = strip_symbols(predicted);

    match (
        reference.trim().parse::<f64>(),
        predicted.trim().parse::<f64>(),
    ) {
        (Ok(expected), Ok(actual)) => {
            if (expected - actual).abs() <= ANSWER_TOLERANCE {
                Verdict::Correct
            } else {
                Verdict::Incorrect
            }
        }
        // A failed conversion on either side means incorrect, not an error.
        _ => Verdict::Incorrect,
    }
}

fn strip_symbols(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '(' | ')' | '$' | '£' | '%'))
        .collect()
}
