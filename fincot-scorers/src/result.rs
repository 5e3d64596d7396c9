//! Scoring result types.

use std::fmt;

use serde::Serialize;

/// Correctness of one answer pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// The answers agree within tolerance.
    Correct,
    /// The answers disagree, or one of them did not parse.
    Incorrect,
}

impl Verdict {
    /// Whether this verdict is [`Verdict::Correct`].
    #[must_use]
    pub fn is_correct(self) -> bool {
        matches!(self, Self::Correct)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Correct => write!(f, "correct"),
            Self::Incorrect => write!(f, "incorrect"),
        }
    }
}

/// One scored answer pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccuracyVerdict {
    /// Row id, when the reference side carries one.
    pub id: Option<String>,
    /// Correctness of the pair.
    pub result: Verdict,
}

/// Aggregate accuracy over paired answers.
#[derive(Debug, Clone, Serialize)]
pub struct AccuracyReport {
    /// Per-pair verdicts in input order.
    pub verdicts: Vec<AccuracyVerdict>,
    /// Number of correct pairs.
    pub correct: usize,
    /// Number of processed pairs.
    pub total: usize,
    /// Percentage of correct answers, `0.0` when nothing was processed.
    pub accuracy: f64,
}

impl AccuracyReport {
    /// An empty report with zero accuracy.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            verdicts: Vec::new(),
            correct: 0,
            total: 0,
            accuracy: 0.0,
        }
    }

    /// Number of verdicts in the report.
    #[must_use]
    pub fn len(&self) -> usize {
        self.verdicts.len()
    }

    /// Whether the report contains no verdicts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.verdicts.is_empty()
    }
}

/// A successfully parsed judge verdict for one row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReasoningScore {
    /// Row id the score belongs to.
    pub id: String,
    /// Similarity score on the judge's 1-10 scale.
    pub score: f64,
}

/// Why a row was excluded from the reasoning aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    /// The reference steps or the candidate trace were empty.
    MissingReasoning,
    /// The judge call itself failed.
    JudgeFailure(String),
    /// The judge's verdict did not parse as a number.
    UnparsableVerdict(String),
}

/// Outcome of judging one row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ItemOutcome {
    /// The judge produced a usable score.
    Scored(ReasoningScore),
    /// The row was excluded from the aggregate.
    Skipped {
        /// Row id.
        id: String,
        /// Why the row was skipped.
        reason: SkipReason,
    },
}

impl ItemOutcome {
    /// The id of the judged row.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Scored(score) => &score.id,
            Self::Skipped { id, .. } => id,
        }
    }

    /// The score, if the row was scored.
    #[must_use]
    pub fn score(&self) -> Option<f64> {
        match self {
            Self::Scored(score) => Some(score.score),
            Self::Skipped { .. } => None,
        }
    }
}

/// Aggregate reasoning quality over judged rows.
#[derive(Debug, Clone, Serialize)]
pub struct ReasoningReport {
    /// Per-row outcomes in input order.
    pub outcomes: Vec<ItemOutcome>,
}

impl ReasoningReport {
    /// Mean of the successfully parsed scores.
    ///
    /// `None` when no row produced a usable score, which is distinct from
    /// a genuine score of zero.
    #[must_use]
    pub fn average(&self) -> Option<f64> {
        let scores: Vec<f64> = self.outcomes.iter().filter_map(ItemOutcome::score).collect();
        if scores.is_empty() {
            None
        } else {
            Some(scores.iter().sum::<f64>() / scores.len() as f64)
        }
    }

    /// Iterate over the scored outcomes.
    pub fn scores(&self) -> impl Iterator<Item = &ReasoningScore> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            ItemOutcome::Scored(score) => Some(score),
            ItemOutcome::Skipped { .. } => None,
        })
    }

    /// Number of skipped rows.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.outcomes.len() - self.scores().count()
    }

    /// Number of judged rows, scored and skipped alike.
    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Whether no rows were judged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}
