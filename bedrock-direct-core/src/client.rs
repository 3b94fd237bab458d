//! The invocation client

use crate::config::{ClaudeSettings, ClientConfig};
use crate::error::Result;
use crate::request::{InvocationRequest, MessageContent};
use crate::response::InvocationResult;
use crate::retry::{retry_with_backoff, RetryCallback, RetryConfig, RetryInfo};
use crate::transport::{ModelTransport, SdkTransport, JSON_CONTENT_TYPE};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::time::Instant;

/// Name reported by [`InvocationClient::model_info`] unless overridden
pub const DEFAULT_AGENT_NAME: &str = "DirectClaudeAgent";

/// Snapshot of a client's resolved configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInfo {
    pub model_id: String,
    pub agent_name: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub region: String,
    pub thinking_budget_tokens: u32,
    pub profile_name: Option<String>,
}

/// Direct client for Claude models on AWS Bedrock
///
/// Sends single-turn requests through `InvokeModel`, optionally with extended
/// thinking, retrying transient failures with exponential backoff.
///
/// ```ignore
/// use bedrock_direct_core::{ClientConfig, InvocationClient};
///
/// let client = InvocationClient::new(ClientConfig::default()).await?;
/// let result = client.invoke("Why is the sky blue?", true).await?;
/// println!("{}", result.reasoning_text.unwrap_or_default());
/// println!("{}", result.response_text.unwrap_or_default());
/// ```
///
/// The client holds no per-call state, so one instance can serve concurrent
/// calls from many tasks.
#[derive(Clone)]
pub struct InvocationClient {
    transport: Arc<dyn ModelTransport>,
    settings: ClaudeSettings,
    profile_name: Option<String>,
    system_prompt: Option<String>,
    agent_name: String,
    retry_config: RetryConfig,
    on_retry: Option<RetryCallback>,
}

impl InvocationClient {
    /// Create a client backed by AWS Bedrock
    ///
    /// Credentials come from the default AWS chain, or from
    /// `aws.profile_name` when set. Fails with a configuration error if the
    /// configuration is invalid or credentials cannot be resolved.
    pub async fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = SdkTransport::connect(&config.claude, &config.aws).await?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Create a client over a custom transport
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn ModelTransport>) -> Result<Self> {
        config.validate()?;
        let ClientConfig {
            claude,
            aws,
            system_prompt,
        } = config;

        log::info!("Initialized InvocationClient with model {}", claude.model_id);

        Ok(Self {
            transport,
            retry_config: RetryConfig {
                max_attempts: aws.max_retries,
                backoff_factor: aws.backoff_factor,
            },
            profile_name: aws.profile_name,
            settings: claude,
            system_prompt,
            agent_name: DEFAULT_AGENT_NAME.to_string(),
            on_retry: None,
        })
    }

    /// Set the name reported in [`ModelInfo`]
    pub fn with_agent_name(mut self, name: impl Into<String>) -> Self {
        self.agent_name = name.into();
        self
    }

    /// Override the configured system prompt
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Set a callback to be notified before each retry
    ///
    /// # Example
    /// ```ignore
    /// let client = InvocationClient::new(config).await?
    ///     .with_retry_callback(|info| {
    ///         eprintln!("Retry {}/{} in {:?}: {}",
    ///             info.attempt, info.max_attempts, info.delay, info.error);
    ///     });
    /// ```
    pub fn with_retry_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(RetryInfo) + Send + Sync + 'static,
    {
        self.on_retry = Some(Arc::new(callback));
        self
    }

    /// Send one user turn to the model
    ///
    /// With `use_extended_thinking` the model's reasoning is returned in
    /// [`InvocationResult::reasoning_text`].
    pub async fn invoke(
        &self,
        content: impl Into<MessageContent>,
        use_extended_thinking: bool,
    ) -> Result<InvocationResult> {
        let request = InvocationRequest::build(
            &self.settings,
            self.system_prompt.as_deref(),
            content.into(),
            use_extended_thinking,
        );
        let body = request.to_body()?;
        log::debug!("Request body: {}", String::from_utf8_lossy(&body));

        let body = body.as_slice();
        retry_with_backoff(
            || self.attempt(body),
            &self.retry_config,
            &self.on_retry,
        )
        .await
    }

    /// Like [`invoke`](Self::invoke), for content that arrives as JSON
    ///
    /// A string is sent as text and an array as content blocks; anything else
    /// is rejected without contacting the model.
    pub async fn invoke_value(
        &self,
        content: Value,
        use_extended_thinking: bool,
    ) -> Result<InvocationResult> {
        let content = MessageContent::try_from(content)?;
        self.invoke(content, use_extended_thinking).await
    }

    async fn attempt(&self, body: &[u8]) -> Result<InvocationResult> {
        let started = Instant::now();
        let raw = self
            .transport
            .invoke_model(
                &self.settings.model_id,
                JSON_CONTENT_TYPE,
                JSON_CONTENT_TYPE,
                body.to_vec(),
            )
            .await?;
        log::info!(
            "API call completed in {:.2} seconds",
            started.elapsed().as_secs_f64()
        );

        InvocationResult::from_response_body(&raw)
    }

    /// Resolved configuration, for diagnostics
    pub fn model_info(&self) -> ModelInfo {
        ModelInfo {
            model_id: self.settings.model_id.clone(),
            agent_name: self.agent_name.clone(),
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
            region: self.settings.region.clone(),
            thinking_budget_tokens: self.settings.thinking_budget_tokens,
            profile_name: self.profile_name.clone(),
        }
    }
}
