//! Error taxonomy shared by every subsystem.

use serde::Serialize;
use thiserror::Error;

use crate::resilience::orchestrator::AttemptOutcome;

/// Errors that can occur while orchestrating an access check.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AccessError {
    /// Invalid policy or delay bounds. Never retried.
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// Simulated backend overload.
    #[error("{message}")]
    Transient { message: String },

    /// The attempt did not finish before its deadline.
    #[error("{scenario} timed out after {timeout_ms:.2} ms")]
    Timeout { scenario: String, timeout_ms: f64 },

    /// Every attempt failed and no fallback was configured.
    #[error("{scenario} failed after {attempts} attempts: {last_error}")]
    RetryExhausted {
        scenario: String,
        attempts: u32,
        last_error: String,
        history: Vec<AttemptOutcome>,
    },

    /// A scenario could not produce an orchestration result at all.
    #[error("{scenario} could not be run: {message}")]
    Runner { scenario: String, message: String },
}

impl AccessError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn transient(message: impl Into<String>) -> Self {
        Self::Transient {
            message: message.into(),
        }
    }

    /// Whether the orchestrator may schedule another attempt after this error.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient { .. } | Self::Timeout { .. })
    }

    /// Short machine-friendly label, used for metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config { .. } => "config",
            Self::Transient { .. } => "transient",
            Self::Timeout { .. } => "timeout",
            Self::RetryExhausted { .. } => "retry_exhausted",
            Self::Runner { .. } => "runner",
        }
    }
}

/// Result type for access checks.
pub type AccessResult<T> = Result<T, AccessError>;
