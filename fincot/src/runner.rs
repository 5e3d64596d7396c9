//! End-to-end experiment runner.
//!
//! [`ExperimentRunner`] wires the whole pipeline together: load the dataset,
//! sample it deterministically, flatten it into evaluation rows, generate
//! answers with each candidate model, score them, and persist one outcome
//! CSV per model plus a cross-model summary.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use fincot_core::{EvalConfig, EvaluationRow, ModelAnswer, RunId};
use fincot_dataset::{load_records, shuffle_and_sample, Flattener};
use fincot_models::{AnswerGenerator, BoxedGenerator, BoxedJudge, ReasoningJudge};
use fincot_report::{assemble, ModelSummary, SummaryTable};
use fincot_scorers::{score_reasoning, score_rows};
use serde::Serialize;
use tokio::sync::Semaphore;
use tracing::{debug, info};

use crate::error::{PipelineError, PipelineResult};

/// The result of evaluating one candidate model.
#[derive(Debug, Clone, Serialize)]
pub struct ModelRun {
    /// Aggregate scores for the model.
    pub summary: ModelSummary,
    /// Path of the per-question outcome CSV that was written.
    pub outcome_path: PathBuf,
}

/// The result of a full experiment across all candidate models.
#[derive(Debug, Clone, Serialize)]
pub struct ExperimentReport {
    /// Unique identifier for this run.
    pub run_id: RunId,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run finished.
    pub finished_at: DateTime<Utc>,
    /// Path of the cross-model summary CSV.
    pub summary_path: PathBuf,
    /// One entry per evaluated model, in configuration order.
    pub runs: Vec<ModelRun>,
}

impl ExperimentReport {
    /// Wall-clock duration of the run.
    #[must_use]
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Runs candidate models through the evaluation pipeline.
///
/// Every candidate sees the same evaluation rows: the dataset is loaded and
/// sampled once per run, and the sampler is seeded from the configuration,
/// so two runs with the same configuration evaluate the same questions.
///
/// # Example
///
/// ```rust,no_run
/// use fincot::{EvalConfig, ExperimentRunner, MockGenerator, MockJudge};
///
/// # async fn run() -> Result<(), fincot::PipelineError> {
/// let config = EvalConfig::from_env()?.with_sample_size(5);
/// let report = ExperimentRunner::new(config)
///     .with_candidate(MockGenerator::new("baseline"))
///     .with_judge(MockJudge::new("judge"))
///     .run()
///     .await?;
/// println!("summary written to {}", report.summary_path.display());
/// # Ok(())
/// # }
/// ```
pub struct ExperimentRunner {
    config: EvalConfig,
    candidates: Vec<BoxedGenerator>,
    judge: Option<BoxedJudge>,
}

impl ExperimentRunner {
    /// Create a runner with no candidates and no judge.
    #[must_use]
    pub fn new(config: EvalConfig) -> Self {
        Self {
            config,
            candidates: Vec::new(),
            judge: None,
        }
    }

    /// Add a candidate model to evaluate.
    #[must_use]
    pub fn with_candidate(mut self, candidate: impl AnswerGenerator + 'static) -> Self {
        self.candidates.push(Arc::new(candidate));
        self
    }

    /// Add an already-shared candidate model.
    #[must_use]
    pub fn with_shared_candidate(mut self, candidate: BoxedGenerator) -> Self {
        self.candidates.push(candidate);
        self
    }

    /// Set the judge model for reasoning quality scoring.
    ///
    /// Without a judge, outcome tables carry accuracy results only.
    #[must_use]
    pub fn with_judge(mut self, judge: impl ReasoningJudge + 'static) -> Self {
        self.judge = Some(Arc::new(judge));
        self
    }

    /// Run the full experiment.
    ///
    /// # Errors
    ///
    /// Fails when no candidates are configured, when the dataset cannot be
    /// loaded, when a generation request fails, or when a result file
    /// cannot be written. Scoring itself never fails; degraded inputs
    /// degrade the scores and are logged.
    pub async fn run(&self) -> PipelineResult<ExperimentReport> {
        if self.candidates.is_empty() {
            return Err(PipelineError::NoCandidates);
        }

        let run_id = RunId::new();
        let started_at = Utc::now();
        info!(
            "Starting run {} against {}",
            run_id,
            self.config.dataset_path.display()
        );

        let records = load_records(&self.config.dataset_path)?;
        let records = shuffle_and_sample(records, self.config.sample_size, self.config.seed);
        let rows = Flattener::new()
            .with_parse_tables(self.config.parse_tables)
            .flatten(&records);
        info!(
            "Evaluating {} models on {} questions",
            self.candidates.len(),
            rows.len()
        );

        std::fs::create_dir_all(&self.config.output_dir)?;

        let mut summary = SummaryTable::new();
        let mut runs = Vec::with_capacity(self.candidates.len());
        for candidate in &self.candidates {
            let run = self.evaluate_model(candidate, &rows).await?;
            summary.push(run.summary.clone());
            runs.push(run);
        }

        let summary_path = self.config.output_dir.join("summary.csv");
        summary.write_csv_path(&summary_path)?;
        info!("Wrote cross-model summary to {}", summary_path.display());

        Ok(ExperimentReport {
            run_id,
            started_at,
            finished_at: Utc::now(),
            summary_path,
            runs,
        })
    }

    async fn evaluate_model(
        &self,
        candidate: &BoxedGenerator,
        rows: &[EvaluationRow],
    ) -> PipelineResult<ModelRun> {
        let model = candidate.name().to_string();
        info!("Generating answers with {}", model);
        let answers = self.generate_answers(candidate, rows).await?;

        let accuracy = score_rows(rows, &answers);
        let reasoning = match &self.judge {
            Some(judge) => Some(score_reasoning(rows, &answers, judge.as_ref()).await),
            None => None,
        };

        let table = assemble(rows, &answers, reasoning.as_ref(), Some(&accuracy))?;
        let outcome_path = self.config.output_dir.join(outcome_file_name(&model));
        table.write_csv_path(&outcome_path)?;
        info!(
            "Wrote {} outcome rows for {} to {}",
            table.len(),
            model,
            outcome_path.display()
        );

        let summary = ModelSummary {
            model,
            num_questions: rows.len(),
            accuracy: accuracy.accuracy,
            reasoning_score: reasoning.as_ref().and_then(|report| report.average()),
        };
        Ok(ModelRun {
            summary,
            outcome_path,
        })
    }

    /// Generate one answer per row, preserving row order.
    ///
    /// With a concurrency bound of 1 the requests run strictly one after
    /// another. Above 1, up to that many requests are in flight at once;
    /// results still come back in row order.
    async fn generate_answers(
        &self,
        candidate: &BoxedGenerator,
        rows: &[EvaluationRow],
    ) -> PipelineResult<Vec<ModelAnswer>> {
        if self.config.concurrency <= 1 {
            let mut answers = Vec::with_capacity(rows.len());
            for (idx, row) in rows.iter().enumerate() {
                debug!("Generating answer {}/{}", idx + 1, rows.len());
                let answer = candidate.generate(&row.context, &row.question).await?;
                answers.push(answer);
            }
            return Ok(answers);
        }

        let semaphore = Arc::new(Semaphore::new(self.config.concurrency));
        let tasks: Vec<_> = rows
            .iter()
            .map(|row| {
                let sem = semaphore.clone();
                async move {
                    let _permit = sem.acquire().await.expect("Semaphore closed");
                    candidate.generate(&row.context, &row.question).await
                }
            })
            .collect();

        let results = futures::future::join_all(tasks).await;
        results
            .into_iter()
            .collect::<Result<Vec<_>, _>>()
            .map_err(PipelineError::from)
    }
}

/// File name for a model's outcome CSV, with path separators and whitespace
/// in the model name replaced.
fn outcome_file_name(model: &str) -> String {
    let safe: String = model
        .chars()
        .map(|c| {
            if c == '/' || c == '\\' || c.is_whitespace() {
                '_'
            } else {
                c
            }
        })
        .collect();
    format!("{safe}_outcome.csv")
}

#[cfg(test)]
mod tests {
    use super::*;
    use fincot_models::{MockGenerator, MockJudge};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn write_dataset(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("train.json");
        let data = r#"[
            {
                "id": "doc-1",
                "pre_text": ["revenue was $100 in 2017 ."],
                "table": [["", "2017"], ["revenue", "$100"]],
                "qa": {"question": "what was revenue?", "answer": "100", "exe_ans": 100.0, "steps": ["read the table"]},
                "annotation": {"dialogue_break": ["find the revenue line"]}
            },
            {
                "id": "doc-2",
                "pre_text": ["costs were $100 ."],
                "qa": {"question": "what were costs?", "answer": "100", "steps": ["read the text"]},
                "annotation": {"dialogue_break": ["find the cost line"]}
            }
        ]"#;
        std::fs::write(&path, data).unwrap();
        path
    }

    fn test_config(dir: &TempDir) -> EvalConfig {
        EvalConfig::development()
            .with_dataset_path(write_dataset(dir))
            .with_output_dir(dir.path().join("output"))
            .with_sample_size(2)
            .with_seed(10)
    }

    #[tokio::test]
    async fn test_run_end_to_end() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);

        let report = ExperimentRunner::new(config)
            .with_candidate(
                MockGenerator::new("mock-model")
                    .with_answer("100", "looked it up")
                    .with_answer("100", "looked it up"),
            )
            .with_judge(MockJudge::new("judge").with_verdict("8").with_verdict("6"))
            .run()
            .await
            .unwrap();

        assert_eq!(report.runs.len(), 1);
        let run = &report.runs[0];
        assert_eq!(run.summary.model, "mock-model");
        assert_eq!(run.summary.num_questions, 2);
        assert_eq!(run.summary.accuracy, 100.0);
        assert_eq!(run.summary.reasoning_score, Some(7.0));
        assert!(run.outcome_path.ends_with("mock-model_outcome.csv"));
        assert!(run.outcome_path.exists());

        let summary_csv = std::fs::read_to_string(&report.summary_path).unwrap();
        assert_eq!(
            summary_csv,
            "model,num_questions,accuracy,reasoning_score\nmock-model,2,100,7\n"
        );
        assert!(report.duration() >= chrono::Duration::zero());
    }

    #[tokio::test]
    async fn test_run_without_judge_skips_reasoning() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);

        let report = ExperimentRunner::new(config)
            .with_candidate(MockGenerator::new("mock-model"))
            .run()
            .await
            .unwrap();

        assert_eq!(report.runs[0].summary.reasoning_score, None);
        let outcome_csv = std::fs::read_to_string(&report.runs[0].outcome_path).unwrap();
        assert!(!outcome_csv.contains("reasoning_score"));
        assert!(outcome_csv.lines().next().unwrap().ends_with(",result"));
    }

    #[tokio::test]
    async fn test_run_requires_candidates() {
        let dir = TempDir::new().unwrap();
        let runner = ExperimentRunner::new(test_config(&dir));

        let err = runner.run().await.unwrap_err();
        assert!(matches!(err, PipelineError::NoCandidates));
    }

    #[tokio::test]
    async fn test_generation_failure_stops_the_run() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);

        let err = ExperimentRunner::new(config)
            .with_candidate(MockGenerator::new("flaky").with_failure("quota exhausted"))
            .run()
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Model(_)));
    }

    #[tokio::test]
    async fn test_concurrent_generation() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir).with_concurrency(4);

        let generator = MockGenerator::new("mock-model")
            .with_answer("100", "first")
            .with_answer("100", "second");
        let report = ExperimentRunner::new(config)
            .with_shared_candidate(Arc::new(generator.clone()))
            .run()
            .await
            .unwrap();

        assert_eq!(report.runs[0].summary.accuracy, 100.0);
        assert_eq!(generator.recorded_calls().len(), 2);
    }

    #[tokio::test]
    async fn test_multiple_candidates_share_rows() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);

        let report = ExperimentRunner::new(config)
            .with_candidate(
                MockGenerator::new("strong")
                    .with_answer("100", "t")
                    .with_answer("100", "t"),
            )
            .with_candidate(
                MockGenerator::new("weak")
                    .with_answer("7", "t")
                    .with_answer("7", "t"),
            )
            .run()
            .await
            .unwrap();

        assert_eq!(report.runs.len(), 2);
        assert_eq!(report.runs[0].summary.accuracy, 100.0);
        assert_eq!(report.runs[1].summary.accuracy, 0.0);
        let summary_csv = std::fs::read_to_string(&report.summary_path).unwrap();
        assert_eq!(summary_csv.lines().count(), 3);
    }

    #[test]
    fn test_outcome_file_name_sanitized() {
        assert_eq!(outcome_file_name("gpt-4o"), "gpt-4o_outcome.csv");
        assert_eq!(
            outcome_file_name("openai/gpt 4o"),
            "openai_gpt_4o_outcome.csv"
        );
    }
}
