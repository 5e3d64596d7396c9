//! Cross-model summary table.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ReportResult;

/// One line of the cross-model summary: aggregate scores for one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSummary {
    /// Model name as configured for the run.
    pub model: String,
    /// Number of questions the model was evaluated on.
    pub num_questions: usize,
    /// Answer accuracy in percent.
    pub accuracy: f64,
    /// Mean judge score, absent when no row could be judged.
    pub reasoning_score: Option<f64>,
}

/// Aggregate results for every model in a run, one [`ModelSummary`] per
/// model.
#[derive(Debug, Clone, Default)]
pub struct SummaryTable {
    /// Per-model summaries, in evaluation order.
    pub rows: Vec<ModelSummary>,
}

impl SummaryTable {
    /// Create an empty summary table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one model's summary.
    pub fn push(&mut self, summary: ModelSummary) {
        self.rows.push(summary);
    }

    /// Number of summarized models.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether any model has been summarized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Write the table as CSV to any sink.
    ///
    /// An absent reasoning score becomes an empty cell, not a zero.
    pub fn write_csv<W: Write>(&self, writer: W) -> ReportResult<()> {
        let mut wtr = csv::WriterBuilder::new().from_writer(writer);

        wtr.write_record(["model", "num_questions", "accuracy", "reasoning_score"])?;
        for row in &self.rows {
            wtr.write_record([
                row.model.clone(),
                row.num_questions.to_string(),
                row.accuracy.to_string(),
                row.reasoning_score
                    .map(|score| score.to_string())
                    .unwrap_or_default(),
            ])?;
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
