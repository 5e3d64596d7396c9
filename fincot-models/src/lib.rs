//! # fincot-models
//!
//! Model capabilities for the fincot evaluation harness.
//!
//! This crate defines the two capabilities the pipeline needs from an LLM,
//! plus implementations of them:
//!
//! - [`AnswerGenerator`]: given a financial context and a question, produce
//!   a final numeric answer with a chain-of-thought reasoning trace.
//! - [`ReasoningJudge`]: given a reference reasoning trace and a
//!   candidate's, return a textual similarity verdict on a 1-10 scale.
//!
//! ## Implementations
//!
//! - [`OpenAIChat`]: both capabilities over the OpenAI Chat Completions
//!   API. Reasoning models (`o1-*`) get their sampling constraints applied
//!   automatically.
//! - [`MockGenerator`] / [`MockJudge`]: scripted implementations for
//!   testing, with call recording.
//!
//! ## Example
//!
//! ```rust,ignore
//! use fincot_models::{AnswerGenerator, OpenAIChat};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let model = OpenAIChat::from_env("gpt-4o")?;
//!     let answer = model
//!         .generate("### Pre-Text\nrevenue was $100.\n\n", "what was revenue?")
//!         .await?;
//!     println!("{} ({})", answer.answer, answer.reasoning);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod capability;
pub mod error;
pub mod mock;
pub mod openai;
pub mod prompt;

pub use capability::{AnswerGenerator, BoxedGenerator, BoxedJudge, ReasoningJudge};
pub use error::{ModelError, ModelResult};
pub use mock::{JudgeCall, MockGenerator, MockJudge};
pub use openai::OpenAIChat;
pub use prompt::parse_cot_response;
