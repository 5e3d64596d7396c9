//! Scripted capability implementations for testing.
//!
//! [`MockGenerator`] and [`MockJudge`] return pre-configured results in
//! order and record every call they receive, so pipeline tests can assert
//! on both the outputs and the prompts that reached the model.
//!
//! # Example
//!
//! ```rust
//! use fincot_models::MockGenerator;
//!
//! let generator = MockGenerator::new("scripted")
//!     .with_answer("5.0", "the change is 5")
//!     .with_failure("connection dropped");
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use fincot_core::ModelAnswer;

use crate::capability::{AnswerGenerator, ReasoningJudge};
use crate::error::{ModelError, ModelResult};

/// A scripted answer generator for testing.
///
/// Configured results are returned in order; once exhausted, a neutral
/// default answer is returned so tests do not have to script every call.
#[derive(Debug, Clone)]
pub struct MockGenerator {
    name: String,
    results: Arc<Mutex<Vec<ModelResult<ModelAnswer>>>>,
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockGenerator {
    /// Create a new mock generator.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            results: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue an answer to return.
    pub fn with_answer(self, answer: impl Into<String>, reasoning: impl Into<String>) -> Self {
        self.results
            .lock()
            .unwrap()
            .push(Ok(ModelAnswer::new(answer, reasoning)));
        self
    }

    /// Queue a failure to return.
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.results.lock().unwrap().push(Err(ModelError::api(message)));
        self
    }

    /// Get the recorded `(context, question)` pairs.
    pub fn recorded_calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnswerGenerator for MockGenerator {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, context: &str, question: &str) -> ModelResult<ModelAnswer> {
        self.calls
            .lock()
            .unwrap()
            .push((context.to_string(), question.to_string()));

        let mut results = self.results.lock().unwrap();
        if results.is_empty() {
            Ok(ModelAnswer::new("0.0", "mock reasoning"))
        } else {
            results.remove(0)
        }
    }
}

/// One recorded judge invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JudgeCall {
    /// The serialized context that was passed.
    pub context: String,
    /// The reference reasoning trace.
    pub reference_reasoning: String,
    /// The candidate reasoning trace.
    pub candidate_reasoning: String,
}

/// A scripted reasoning judge for testing.
///
/// Configured verdicts are returned in order; once exhausted, a mid-scale
/// `"5"` is returned.
#[derive(Debug, Clone)]
pub struct MockJudge {
    name: String,
    verdicts: Arc<Mutex<Vec<ModelResult<String>>>>,
    calls: Arc<Mutex<Vec<JudgeCall>>>,
}

impl MockJudge {
    /// Create a new mock judge.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            verdicts: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a verdict to return.
    pub fn with_verdict(self, verdict: impl Into<String>) -> Self {
        self.verdicts.lock().unwrap().push(Ok(verdict.into()));
        self
    }

    /// Queue a failure to return.
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.verdicts.lock().unwrap().push(Err(ModelError::api(message)));
        self
    }

    /// Get the recorded invocations.
    pub fn recorded_calls(&self) -> Vec<JudgeCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReasoningJudge for MockJudge {
    fn name(&self) -> &str {
        &self.name
    }

    async fn assess(
        &self,
        context: &str,
        reference_reasoning: &str,
        candidate_reasoning: &str,
    ) -> ModelResult<String> {
        self.calls.lock().unwrap().push(JudgeCall {
            context: context.to_string(),
            reference_reasoning: reference_reasoning.to_string(),
            candidate_reasoning: candidate_reasoning.to_string(),
        });

        let mut verdicts = self.verdicts.lock().unwrap();
        if verdicts.is_empty() {
            Ok("5".to_string())
        } else {
            verdicts.remove(0)
        }
    }
}
