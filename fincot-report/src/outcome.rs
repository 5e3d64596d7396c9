//! Per-question outcome table.
//!
//! The outcome table is a positional join: evaluation rows, model answers,
//! and optional score reports are zipped index by index, never matched by
//! id. Rows and answers must match in length. Score tables attach only
//! when they cover every outcome row exactly; otherwise their columns are
//! dropped entirely and the mismatch is logged. Columns are all or
//! nothing, never null-filled.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use fincot_core::{EvaluationRow, HasAnswer, HasReasoning};
use fincot_scorers::{AccuracyReport, ReasoningReport, Verdict};
use tracing::{error, warn};

use crate::error::{ReportError, ReportResult};

/// One line of the per-question outcome table.
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeRow {
    /// Source record identifier.
    pub id: String,
    /// The question text.
    pub question: String,
    /// Serialized context the model saw.
    pub context: String,
    /// Ground-truth reasoning trace, steps joined with newlines.
    pub reference_reasoning: String,
    /// Reference answer, raw and uncleaned.
    pub reference_answer: String,
    /// Machine-computed reference answer, when the source had one.
    pub reference_derived_answer: Option<String>,
    /// The model's chain-of-thought trace.
    pub llm_reasoning: String,
    /// The model's final answer.
    pub llm_answer: String,
    /// Judge score for this row, when reasoning scores were attached.
    pub reasoning_score: Option<f64>,
    /// Accuracy verdict for this row, when accuracy results were attached.
    pub result: Option<Verdict>,
}

/// The assembled per-question table for one evaluated model.
#[derive(Debug, Clone, Default)]
pub struct OutcomeTable {
    /// Assembled rows, in submission order.
    pub rows: Vec<OutcomeRow>,
    /// Whether the reasoning score column is present.
    pub has_reasoning: bool,
    /// Whether the accuracy result column is present.
    pub has_accuracy: bool,
}

/// Join evaluation rows, model answers, and optional score reports into an
/// [`OutcomeTable`].
///
/// Rows and answers must have the same length. The optional reports attach
/// a column each, but only when they cover every row: the accuracy report
/// by its verdict count, the reasoning report by its scored-row count, so
/// a reasoning report with skips never attaches partially. A mismatched
/// report is dropped with a logged error rather than failing the assembly.
pub fn assemble<A>(
    rows: &[EvaluationRow],
    answers: &[A],
    reasoning: Option<&ReasoningReport>,
    accuracy: Option<&AccuracyReport>,
) -> ReportResult<OutcomeTable>
where
    A: HasAnswer + HasReasoning,
{
    if rows.len() != answers.len() {
        error!(
            "Cannot assemble outcomes: {} evaluation rows but {} model answers",
            rows.len(),
            answers.len()
        );
        return Err(ReportError::LengthMismatch {
            rows: rows.len(),
            answers: answers.len(),
        });
    }

    let mut table_rows: Vec<OutcomeRow> = rows
        .iter()
        .zip(answers.iter())
        .map(|(row, answer)| OutcomeRow {
            id: row.id.clone(),
            question: row.question.clone(),
            context: row.context.clone(),
            reference_reasoning: row.reference_reasoning(),
            reference_answer: row.reference_answer.clone(),
            reference_derived_answer: row.reference_derived_answer.clone(),
            llm_reasoning: answer.reasoning().to_string(),
            llm_answer: answer.answer().to_string(),
            reasoning_score: None,
            result: None,
        })
        .collect();

    // The joinable reasoning table holds scored rows only, so a single
    // skipped row already makes it shorter than the outcome table.
    let mut has_reasoning = false;
    if let Some(report) = reasoning {
        let scores: Vec<_> = report.scores().collect();
        if scores.len() == table_rows.len() {
            for (row, score) in table_rows.iter_mut().zip(scores) {
                row.reasoning_score = Some(score.score);
            }
            has_reasoning = true;
        } else {
            error!(
                "Reasoning scores cover {} rows but the outcome table has {}; dropping the score column",
                scores.len(),
                table_rows.len()
            );
        }
    }

    let mut has_accuracy = false;
    if let Some(report) = accuracy {
        if report.len() == table_rows.len() {
            for (row, verdict) in table_rows.iter_mut().zip(report.verdicts.iter()) {
                row.result = Some(verdict.result);
            }
            has_accuracy = true;
        } else {
            error!(
                "Accuracy report has {} entries but the outcome table has {}; dropping the result column",
                report.len(),
                table_rows.len()
            );
        }
    }

    let table = OutcomeTable {
        rows: table_rows,
        has_reasoning,
        has_accuracy,
    };
    table.log_missing_values();
    Ok(table)
}

impl OutcomeTable {
    /// Number of rows in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn log_missing_values(&self) {
        let empty_traces = self
            .rows
            .iter()
            .filter(|row| row.llm_reasoning.is_empty())
            .count();
        if empty_traces > 0 {
            warn!("{} outcome rows have an empty reasoning trace", empty_traces);
        }
        if self.has_reasoning {
            let unscored = self
                .rows
                .iter()
                .filter(|row| row.reasoning_score.is_none())
                .count();
            if unscored > 0 {
                warn!("{} outcome rows have no reasoning score", unscored);
            }
        }
        if self.has_accuracy {
            let unjudged = self.rows.iter().filter(|row| row.result.is_none()).count();
            if unjudged > 0 {
                warn!("{} outcome rows have no accuracy result", unjudged);
            }
        }
    }

    /// Write the table as CSV to any sink.
    ///
    /// Score columns appear only when the corresponding report was attached
    /// at assembly; rows without a value get an empty cell.
    pub fn write_csv<W: Write>(&self, writer: W) -> ReportResult<()> {
        let mut wtr = csv::WriterBuilder::new().from_writer(writer);

        let mut header = vec![
            "id",
            "question",
            "context",
            "reference_reasoning",
            "reference_answer",
            "reference_derived_answer",
            "llm_reasoning",
            "llm_answer",
        ];
        if self.has_reasoning {
            header.push("reasoning_score");
        }
        if self.has_accuracy {
            header.push("result");
        }
        wtr.write_record(&header)?;

        for row in &self.rows {
            let mut record = vec![
                row.id.clone(),
                row.question.clone(),
                row.context.clone(),
                row.reference_reasoning.clone(),
                row.reference_answer.clone(),
                row.reference_derived_answer.clone().unwrap_or_default(),
                row.llm_reasoning.clone(),
                row.llm_answer.clone(),
            ];
            if self.has_reasoning {
                record.push(
                    row.reasoning_score
                        .map(|score| score.to_string())
                        .unwrap_or_default(),
                );
            }
            if self.has_accuracy {
                record.push(
                    row.result
                        .map(|verdict| verdict.to_string())
                        .unwrap_or_default(),
                );
            }
            wtr.write_record(&record)?;
        }

        wtr.flush()?;
        Ok(())
    }

    /// Write the table as CSV to a file, creating or truncating it.
    pub fn write_csv_path(&self, path: impl AsRef<Path>) -> ReportResult<()> {
        let file = File::create(path)?;
        self.write_csv(file)
    }

    /// Render the table as a CSV string.
    pub fn to_csv_string(&self) -> ReportResult<String> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
