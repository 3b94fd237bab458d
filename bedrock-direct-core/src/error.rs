//! Error types for bedrock-direct
//!
//! Errors are grouped by how the retry loop treats them:
//!
//! - [`ErrorClass::Fatal`] - configuration or caller mistakes, never retried
//! - [`ErrorClass::Retryable`] - transport failures and unparsable responses
//! - [`ErrorClass::Terminal`] - the retry budget ran out

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, InvokeError>;

/// How an [`InvokeError`] should be handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Fix the configuration or the input; retrying cannot help
    Fatal,
    /// Transient; the retry loop tries again after a backoff delay
    Retryable,
    /// Raised once the retry loop is exhausted
    Terminal,
}

/// Errors produced by the invocation client
#[derive(Debug, Error)]
pub enum InvokeError {
    /// Invalid configuration or the transport could not be established
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The call input had an unsupported shape
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Any failure during the network call (throttling, timeouts, 5xx, ...)
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body could not be decomposed
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Every attempt failed
    #[error("failed to get valid response after {attempts} attempts. Last error: {last_error}")]
    RetriesExhausted {
        /// Number of attempts made
        attempts: u32,
        /// Message of the last error observed
        last_error: String,
    },
}

impl InvokeError {
    /// Classify this error for retry handling
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Configuration(_) | Self::InvalidArgument(_) => ErrorClass::Fatal,
            Self::Transport(_) | Self::MalformedResponse(_) => ErrorClass::Retryable,
            Self::RetriesExhausted { .. } => ErrorClass::Terminal,
        }
    }

    /// Returns true if the retry loop should try again after this error
    pub fn is_retryable(&self) -> bool {
        self.class() == ErrorClass::Retryable
    }

    /// Returns true if this is a configuration error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Returns true if this is an invalid-argument error
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// Returns true if the retry budget was exhausted
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::RetriesExhausted { .. })
    }
}
