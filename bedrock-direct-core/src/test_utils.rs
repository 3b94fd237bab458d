//! Test utilities for bedrock-direct-core.
//!
//! Provides a scripted [`ModelTransport`] so the client can be exercised
//! without AWS credentials.
//!
//! Enable with the `test-utils` feature:
//!
//! ```toml
//! [dev-dependencies]
//! bedrock-direct-core = { version = "...", features = ["test-utils"] }
//! ```
//!
//! # Example
//!
//! ```rust
//! use bedrock_direct_core::test_utils::MockTransport;
//! use bedrock_direct_core::{ClientConfig, InvocationClient};
//! use std::sync::Arc;
//!
//! # async fn example() -> bedrock_direct_core::Result<()> {
//! let transport = Arc::new(MockTransport::new().with_text("Hello from mock!"));
//! let client = InvocationClient::with_transport(ClientConfig::default(), transport.clone())?;
//!
//! let result = client.invoke("Hi", false).await?;
//! assert_eq!(result.response_text.as_deref(), Some("Hello from mock!"));
//! assert_eq!(transport.call_count(), 1);
//! # Ok(())
//! # }
//! ```

use std::collections::VecDeque;

use parking_lot::Mutex;
use serde_json::{json, Value};

use crate::error::{InvokeError, Result};
use crate::transport::ModelTransport;

/// A request observed by [`MockTransport`]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub model_id: String,
    pub content_type: String,
    pub accept: String,
    /// Request body parsed as JSON
    pub body: Value,
}

/// A scripted transport for testing.
///
/// Responses are returned in the order they were added. Once the script is
/// exhausted every further call fails with a transport error.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<Vec<u8>>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    /// Create a mock transport with no responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw response body.
    pub fn with_raw(self, body: impl Into<Vec<u8>>) -> Self {
        self.responses.lock().push_back(Ok(body.into()));
        self
    }

    /// Queue a JSON response body.
    pub fn with_body(self, body: Value) -> Self {
        self.with_raw(body.to_string())
    }

    /// Queue a response with a single text block.
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_body(json!({
            "content": [{"type": "text", "text": text.into()}]
        }))
    }

    /// Queue a response with a thinking block followed by a text block.
    pub fn with_thinking(self, thinking: impl Into<String>, text: impl Into<String>) -> Self {
        self.with_body(json!({
            "content": [
                {"type": "thinking", "thinking": thinking.into(), "signature": "sig"},
                {"type": "text", "text": text.into()}
            ]
        }))
    }

    /// Queue a transport failure.
    pub fn with_error(self, message: impl Into<String>) -> Self {
        self.responses
            .lock()
            .push_back(Err(InvokeError::Transport(message.into())));
        self
    }

    /// Queue `count` transport failures.
    pub fn with_errors(self, count: usize, message: &str) -> Self {
        (0..count).fold(self, |mock, _| mock.with_error(message))
    }

    /// Number of calls made so far.
    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Every request received, in order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    /// Body of the most recent request.
    pub fn last_body(&self) -> Option<Value> {
        self.requests.lock().last().map(|r| r.body.clone())
    }
}

#[async_trait::async_trait]
impl ModelTransport for MockTransport {
    async fn invoke_model(
        &self,
        model_id: &str,
        content_type: &str,
        accept: &str,
        body: Vec<u8>,
    ) -> Result<Vec<u8>> {
        let body = serde_json::from_slice(&body).unwrap_or(Value::Null);
        self.requests.lock().push(RecordedRequest {
            model_id: model_id.to_string(),
            content_type: content_type.to_string(),
            accept: accept.to_string(),
            body,
        });

        self.responses.lock().pop_front().unwrap_or_else(|| {
            Err(InvokeError::Transport(
                "No mock response configured".to_string(),
            ))
        })
    }
}
