//! Core error types.

use thiserror::Error;

/// Errors produced by core configuration handling.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No configuration profile exists for the requested environment.
    #[error("no configuration profile for environment: {0}")]
    UnknownEnvironment(String),
}

impl CoreError {
    /// Create an unknown-environment error.
    pub fn unknown_environment(name: impl Into<String>) -> Self {
        Self::UnknownEnvironment(name.into())
    }
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
