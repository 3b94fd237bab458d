//! Retry with exponential backoff
//!
//! The n-th retry waits `backoff_factor^n` seconds. There is no jitter and no
//! cap: with the default factor of 1.5 and three attempts the waits are 1.5s
//! and 2.25s.

use crate::error::{InvokeError, Result};
use std::sync::Arc;
use std::time::Duration;

/// Configuration for retry behavior
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Total attempts, including the first (default: 3)
    pub max_attempts: u32,
    /// Base of the exponential delay in seconds (default: 1.5)
    pub backoff_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: crate::config::DEFAULT_MAX_RETRIES,
            backoff_factor: crate::config::DEFAULT_BACKOFF_FACTOR,
        }
    }
}

/// Information about a retry attempt
#[derive(Debug, Clone)]
pub struct RetryInfo {
    /// Which attempt just failed (1-based)
    pub attempt: u32,
    /// Maximum attempts configured
    pub max_attempts: u32,
    /// How long we'll wait before retrying
    pub delay: Duration,
    /// The error that triggered the retry
    pub error: String,
}

/// Callback type for retry events
pub type RetryCallback = Arc<dyn Fn(RetryInfo) + Send + Sync>;

/// Delay before the retry that follows `attempt` failures
pub fn backoff_delay(attempt: u32, backoff_factor: f64) -> Duration {
    let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
    Duration::try_from_secs_f64(backoff_factor.powi(exponent)).unwrap_or(Duration::MAX)
}

/// Retry an async operation with exponential backoff
///
/// Retryable errors (see [`InvokeError::is_retryable`]) are logged and retried
/// until `max_attempts` is reached, at which point the last error is wrapped in
/// [`InvokeError::RetriesExhausted`]. Fatal errors are returned immediately.
///
/// # Example
///
/// ```ignore
/// let result = retry_with_backoff(
///     || async { transport.invoke_model(model_id, "application/json", "application/json", body.clone()).await },
///     &config,
///     &Some(Arc::new(|info| eprintln!("Retry {}: {}", info.attempt, info.error))),
/// ).await?;
/// ```
pub async fn retry_with_backoff<F, Fut, T>(
    mut op: F,
    config: &RetryConfig,
    on_retry: &Option<RetryCallback>,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let mut attempt = 0;
    let mut last_error = String::new();

    while attempt < config.max_attempts {
        match op().await {
            Ok(result) => return Ok(result),
            Err(err) if !err.is_retryable() => return Err(err),
            Err(err) => {
                last_error = err.to_string();
                log::error!(
                    "Error calling model on attempt {}: {}",
                    attempt + 1,
                    last_error
                );

                attempt += 1;
                if attempt < config.max_attempts {
                    let delay = backoff_delay(attempt, config.backoff_factor);

                    if let Some(callback) = on_retry {
                        callback(RetryInfo {
                            attempt,
                            max_attempts: config.max_attempts,
                            delay,
                            error: last_error.clone(),
                        });
                    }

                    log::info!("Retrying in {:.1} seconds...", delay.as_secs_f64());
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    Err(InvokeError::RetriesExhausted {
        attempts: config.max_attempts,
        last_error,
    })
}
