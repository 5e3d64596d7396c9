//! OpenAI Chat Completions implementation of both capabilities.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use fincot_core::ModelAnswer;

use crate::capability::{AnswerGenerator, ReasoningJudge};
use crate::error::{ModelError, ModelResult};
use crate::prompt;

/// Token floor enforced for `o1-*` reasoning models, which burn part of
/// the budget on hidden reasoning tokens.
const MIN_REASONING_TOKENS: u64 = 5000;

/// Chat Completions client for the OpenAI API.
///
/// Implements [`AnswerGenerator`] and [`ReasoningJudge`] over the same
/// endpoint, so one configured model can serve either role. Reasoning
/// models (`o1-*`) only accept `temperature = 1.0` and need a generous
/// completion budget; both constraints are applied automatically and
/// logged when they override a configured value.
#[derive(Debug, Clone)]
pub struct OpenAIChat {
    model_name: String,
    api_key: String,
    base_url: String,
    client: Client,
    temperature: f64,
    max_tokens: Option<u64>,
    timeout: Duration,
}

impl OpenAIChat {
    /// Create a client for `model_name` with an explicit API key.
    pub fn new(model_name: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".to_string(),
            client: Client::new(),
            temperature: 0.0,
            max_tokens: None,
            timeout: Duration::from_secs(120),
        }
        .with_reasoning_constraints()
    }

    /// Create a client reading the key from the `OPENAI_API_KEY` variable.
    pub fn from_env(model_name: impl Into<String>) -> Result<Self, ModelError> {
        match std::env::var("OPENAI_API_KEY") {
            Ok(api_key) => Ok(Self::new(model_name, api_key)),
            Err(_) => Err(ModelError::Configuration(
                "OPENAI_API_KEY is not set".to_string(),
            )),
        }
    }

    /// Override the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Use a pre-configured HTTP client.
    #[must_use]
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Set the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the sampling temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self.with_reasoning_constraints()
    }

    /// Set the maximum number of completion tokens.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u64) -> Self {
        self.max_tokens = Some(max_tokens);
        self.with_reasoning_constraints()
    }

    fn is_reasoning_model(&self) -> bool {
        self.model_name.starts_with("o1-")
    }

    fn with_reasoning_constraints(mut self) -> Self {
        if !self.is_reasoning_model() {
            return self;
        }
        if self.temperature != 1.0 {
            warn!(
                "Overriding temperature from {} to 1.0 for model {}",
                self.temperature, self.model_name
            );
            self.temperature = 1.0;
        }
        match self.max_tokens {
            Some(tokens) if tokens >= MIN_REASONING_TOKENS => {}
            _ => {
                warn!(
                    "Setting max_tokens to {} for model {}",
                    MIN_REASONING_TOKENS, self.model_name
                );
                self.max_tokens = Some(MIN_REASONING_TOKENS);
            }
        }
        self
    }

    /// Assemble the wire request for one system/user prompt pair.
    fn build_request(&self, system_prompt: &str, user_prompt: &str) -> ChatCompletionRequest {
        // Reasoning models reject the deprecated max_tokens field.
        let (max_tokens, max_completion_tokens) = if self.is_reasoning_model() {
            (None, self.max_tokens)
        } else {
            (self.max_tokens, None)
        };

        ChatCompletionRequest {
            model: self.model_name.clone(),
            messages: vec![
                ChatMessage::system(system_prompt),
                ChatMessage::user(user_prompt),
            ],
            temperature: Some(self.temperature),
            max_tokens,
            max_completion_tokens,
        }
    }

    /// Send one completion request and return the assistant's text.
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> ModelResult<String> {
        let body = self.build_request(system_prompt, user_prompt);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let headers = response.headers().clone();
            let body = response.text().await.unwrap_or_default();
            return Err(self.translate_error(status, &body, &headers));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ModelError::invalid_response(e.to_string()))?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::invalid_response("completion had no choices"))?;
        choice
            .message
            .content
            .filter(|content| !content.is_empty())
            .ok_or_else(|| ModelError::invalid_response("completion had no message content"))
    }

    fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
        headers
            .get("retry-after")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<u64>().ok())
            .map(Duration::from_secs)
    }

    /// Map a non-success response to the closest error variant.
    fn translate_error(&self, status: u16, body: &str, headers: &HeaderMap) -> ModelError {
        if status == 429 {
            return ModelError::rate_limited(Self::parse_retry_after(headers));
        }
        // Prefer the structured envelope when the body carries one.
        match serde_json::from_str::<OpenAIError>(body) {
            Ok(envelope) if status == 401 => ModelError::auth(envelope.error.message),
            Ok(envelope) => ModelError::Api {
                message: envelope.error.message,
                code: envelope.error.code,
            },
            Err(_) => ModelError::http(status, body),
        }
    }
}

#[async_trait]
impl AnswerGenerator for OpenAIChat {
    fn name(&self) -> &str {
        &self.model_name
    }

    async fn generate(&self, context: &str, question: &str) -> ModelResult<ModelAnswer> {
        debug!("Generating answer with {} for: {}", self.model_name, question);
        let completion = self
            .complete(
                prompt::ANSWER_INSTRUCTION,
                &prompt::answer_prompt(context, question),
            )
            .await?;
        Ok(prompt::parse_cot_response(&completion))
    }
}

#[async_trait]
impl ReasoningJudge for OpenAIChat {
    fn name(&self) -> &str {
        &self.model_name
    }

    async fn assess(
        &self,
        context: &str,
        reference_reasoning: &str,
        candidate_reasoning: &str,
    ) -> ModelResult<String> {
        debug!("Assessing reasoning with {}", self.model_name);
        self.complete(
            prompt::JUDGE_INSTRUCTION,
            &prompt::judge_prompt(context, reference_reasoning, candidate_reasoning),
        )
        .await
    }
}

/// Chat completion request.
#[derive(Debug, Clone, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    /// Maximum tokens to generate (deprecated, use max_completion_tokens).
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u64>,
}

/// Chat message.
#[derive(Debug, Clone, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

impl ChatMessage {
    fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Chat completion response.
#[derive(Debug, Clone, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

/// Chat choice.
#[derive(Debug, Clone, Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

/// Response message.
#[derive(Debug, Clone, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// OpenAI error envelope.
#[derive(Debug, Clone, Deserialize)]
struct OpenAIError {
    error: OpenAIErrorBody,
}

/// OpenAI error body.
#[derive(Debug, Clone, Deserialize)]
struct OpenAIErrorBody {
    message: String,
    code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn completion_body(content: &str) -> serde_json::Value {
        json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "model": "gpt-4o",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 20, "completion_tokens": 10, "total_tokens": 30}
        })
    }

    #[test]
    fn test_openai_chat_new() {
        let model = OpenAIChat::new("gpt-4o", "sk-test-key");
        assert_eq!(AnswerGenerator::name(&model), "gpt-4o");
        assert_eq!(model.temperature, 0.0);
        assert_eq!(model.max_tokens, None);
    }

    #[test]
    fn test_openai_chat_builder() {
        let model = OpenAIChat::new("gpt-4o", "sk-test-key")
            .with_base_url("https://custom.api.com/v1")
            .with_temperature(0.7)
            .with_max_tokens(256)
            .with_timeout(Duration::from_secs(60));

        assert_eq!(model.base_url, "https://custom.api.com/v1");
        assert_eq!(model.temperature, 0.7);
        assert_eq!(model.max_tokens, Some(256));
        assert_eq!(model.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_reasoning_model_constraints() {
        let model = OpenAIChat::new("o1-mini", "key");
        assert_eq!(model.temperature, 1.0);
        assert_eq!(model.max_tokens, Some(MIN_REASONING_TOKENS));

        // Builders cannot weaken the constraints.
        let model = model.with_temperature(0.2).with_max_tokens(100);
        assert_eq!(model.temperature, 1.0);
        assert_eq!(model.max_tokens, Some(MIN_REASONING_TOKENS));

        let model = OpenAIChat::new("o1-preview", "key").with_max_tokens(8000);
        assert_eq!(model.max_tokens, Some(8000));
    }

    #[test]
    fn test_build_request_token_fields() {
        let request = OpenAIChat::new("gpt-4o", "key")
            .with_max_tokens(256)
            .build_request("sys", "user");
        assert_eq!(request.max_tokens, Some(256));
        assert_eq!(request.max_completion_tokens, None);

        let request = OpenAIChat::new("o1-mini", "key").build_request("sys", "user");
        assert_eq!(request.max_tokens, None);
        assert_eq!(request.max_completion_tokens, Some(MIN_REASONING_TOKENS));
        assert_eq!(request.temperature, Some(1.0));
    }

    #[tokio::test]
    async fn test_generate_parses_completion() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({"model": "gpt-4o"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
                "Revenue went from 100 to 105, a change of 5.\nAnswer: 5.0",
            )))
            .mount(&server)
            .await;

        let model = OpenAIChat::new("gpt-4o", "sk-test").with_base_url(server.uri());
        let answer = model.generate("### Pre-Text\nnumbers\n\n", "change?").await.unwrap();

        assert_eq!(answer.answer, "5.0");
        assert_eq!(answer.reasoning, "Revenue went from 100 to 105, a change of 5.");
    }

    #[tokio::test]
    async fn test_assess_returns_raw_verdict() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("8")))
            .mount(&server)
            .await;

        let model = OpenAIChat::new("gpt-4o", "sk-test").with_base_url(server.uri());
        let verdict = model.assess("ctx", "ref steps", "candidate steps").await.unwrap();
        assert_eq!(verdict, "8");
    }

    #[tokio::test]
    async fn test_authentication_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {"message": "Invalid API key", "type": "invalid_request_error", "code": "invalid_api_key"}
            })))
            .mount(&server)
            .await;

        let model = OpenAIChat::new("gpt-4o", "bad-key").with_base_url(server.uri());
        let err = model.generate("ctx", "q?").await.unwrap_err();
        assert!(matches!(err, ModelError::Authentication(_)));
    }

    #[tokio::test]
    async fn test_rate_limited_with_retry_after() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(429)
                    .insert_header("retry-after", "2")
                    .set_body_json(json!({
                        "error": {"message": "Rate limit reached", "type": "rate_limit_error", "code": null}
                    })),
            )
            .mount(&server)
            .await;

        let model = OpenAIChat::new("gpt-4o", "sk-test").with_base_url(server.uri());
        let err = model.generate("ctx", "q?").await.unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(err.retry_after(), Some(Duration::from_secs(2)));
    }

    #[tokio::test]
    async fn test_server_error_is_retryable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
            .mount(&server)
            .await;

        let model = OpenAIChat::new("gpt-4o", "sk-test").with_base_url(server.uri());
        let err = model.generate("ctx", "q?").await.unwrap_err();
        assert!(matches!(err, ModelError::Http { status: 500, .. }));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_empty_content_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "chatcmpl-2",
                "object": "chat.completion",
                "model": "gpt-4o",
                "choices": [],
            })))
            .mount(&server)
            .await;

        let model = OpenAIChat::new("gpt-4o", "sk-test").with_base_url(server.uri());
        let err = model.generate("ctx", "q?").await.unwrap_err();
        assert!(matches!(err, ModelError::InvalidResponse(_)));
    }
}
