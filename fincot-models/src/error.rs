//! Error types shared by every model capability.
//!
//! Providers fail in two broad ways: transient transport trouble worth
//! retrying (timeouts, dropped connections, rate limits, server-side 5xx)
//! and permanent rejections that should stop a run (bad credentials,
//! malformed responses, refused requests). [`ModelError::is_retryable`]
//! encodes that split for callers that wrap a model in a retry loop.

use std::time::Duration;

use thiserror::Error;

/// An error surfaced while talking to a model provider.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The provider rejected the request at the API level.
    #[error("API error: {message}")]
    Api {
        /// Message from the provider's error envelope.
        message: String,
        /// Machine-readable code, when the envelope carries one.
        code: Option<String>,
    },

    /// Non-success HTTP status without a parseable error envelope.
    #[error("HTTP {status}: {body}")]
    Http {
        /// Status code of the response.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The credentials were rejected.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The provider throttled the request.
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited {
        /// Delay suggested by the `retry-after` header, when present.
        retry_after: Option<Duration>,
    },

    /// The request did not complete in time.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The connection could not be established.
    #[error("Connection error: {0}")]
    Connection(String),

    /// A success response whose body could not be used.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The model was misconfigured before any request went out.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Anything else.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ModelError {
    /// Whether retrying the same request could plausibly succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout(_) | Self::RateLimited { .. } | Self::Connection(_) => true,
            Self::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// The provider-suggested retry delay, for rate-limit errors.
    #[must_use]
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }

    /// An API-level rejection without an error code.
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
            code: None,
        }
    }

    /// A raw HTTP failure.
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        Self::Http {
            status,
            body: body.into(),
        }
    }

    /// A credential rejection.
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Authentication(message.into())
    }

    /// A throttling response, with the suggested delay when known.
    pub fn rate_limited(retry_after: Option<Duration>) -> Self {
        Self::RateLimited { retry_after }
    }

    /// A success response that could not be interpreted.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }
}

impl From<reqwest::Error> for ModelError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            // reqwest does not expose the configured timeout here.
            Self::Timeout(Duration::from_secs(120))
        } else if err.is_connect() {
            Self::Connection(err.to_string())
        } else if let Some(status) = err.status() {
            Self::http(status.as_u16(), err.to_string())
        } else {
            Self::Other(err.into())
        }
    }
}

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_errors_are_retryable() {
        assert!(ModelError::Timeout(Duration::from_secs(120)).is_retryable());
        assert!(ModelError::rate_limited(Some(Duration::from_secs(5))).is_retryable());
        assert!(ModelError::Connection("reset by peer".into()).is_retryable());
        assert!(ModelError::http(503, "overloaded").is_retryable());
    }

    #[test]
    fn test_permanent_errors_are_not_retryable() {
        assert!(!ModelError::http(400, "bad request").is_retryable());
        assert!(!ModelError::auth("invalid key").is_retryable());
        assert!(!ModelError::api("refused").is_retryable());
        assert!(!ModelError::invalid_response("empty body").is_retryable());
    }

    #[test]
    fn test_retry_after_only_on_rate_limits() {
        let throttled = ModelError::rate_limited(Some(Duration::from_secs(60)));
        assert_eq!(throttled.retry_after(), Some(Duration::from_secs(60)));
        assert_eq!(ModelError::rate_limited(None).retry_after(), None);
        assert_eq!(ModelError::http(500, "oops").retry_after(), None);
    }

    #[test]
    fn test_display_carries_provider_detail() {
        let err = ModelError::Api {
            message: "quota exhausted".to_string(),
            code: Some("insufficient_quota".to_string()),
        };
        assert_eq!(err.to_string(), "API error: quota exhausted");
        assert!(ModelError::http(404, "not found").to_string().contains("404"));
    }
}
