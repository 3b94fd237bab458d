//! # bedrock-direct-core
//!
//! A direct client for Claude models on AWS Bedrock, built around the raw
//! `InvokeModel` API rather than an agent framework.
//!
//! ## Quick Start
//!
//! ```ignore
//! use bedrock_direct_core::{ClientConfig, InvocationClient};
//!
//! #[tokio::main]
//! async fn main() -> bedrock_direct_core::Result<()> {
//!     let client = InvocationClient::new(ClientConfig::default())
//!         .await?
//!         .with_system_prompt("You are a helpful assistant.");
//!
//!     let result = client.invoke("What is 2 + 2?", false).await?;
//!     println!("{}", result.response_text.unwrap_or_default());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Extended Thinking
//!
//! Pass `true` as the second argument to [`InvocationClient::invoke`] to
//! enable extended thinking. The request then carries the configured thinking
//! budget, runs at temperature 1.0 as Bedrock requires, and `max_tokens` is
//! raised above the budget when needed. The reasoning trace is returned in
//! [`InvocationResult::reasoning_text`].
//!
//! ## Structured Answers
//!
//! When the response text contains a JSON object, its fields are copied into
//! [`InvocationResult::extra_fields`]. This is best-effort: text without a
//! parseable object simply yields no extra fields.
//!
//! ## Retries
//!
//! Transport failures and unparsable responses are retried up to
//! `aws.max_retries` attempts, waiting `aws.backoff_factor^n` seconds before
//! the n-th retry. Once attempts run out the call fails with
//! [`InvokeError::RetriesExhausted`].
//!
//! ## Feature Flags
//!
//! - `test-utils` - Scripted [`ModelTransport`] for tests without AWS access

pub mod client;
pub mod config;
pub mod error;
pub mod request;
pub mod response;
pub mod retry;
pub mod transport;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use client::{InvocationClient, ModelInfo, DEFAULT_AGENT_NAME};
pub use config::{AwsSettings, ClaudeSettings, ClientConfig};
pub use error::{ErrorClass, InvokeError, Result};
pub use request::{InvocationRequest, MessageContent, ThinkingConfig};
pub use response::InvocationResult;
pub use retry::{RetryCallback, RetryConfig, RetryInfo};
pub use transport::{ModelTransport, SdkTransport};
