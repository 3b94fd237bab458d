//! Request construction for the Bedrock `InvokeModel` API
//!
//! Builds the Anthropic messages body Bedrock expects for Claude models.
//! A request always carries a single user turn; extended thinking mode adds a
//! `thinking` directive and adjusts sampling parameters to satisfy the
//! provider's constraints.

use crate::config::ClaudeSettings;
use crate::error::InvokeError;
use serde::ser::{Serialize, Serializer};
use serde_json::Value;

/// Protocol version tag required by Bedrock for Anthropic models
pub const ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";

/// Tokens added on top of the thinking budget when `max_tokens` is too small
pub const THINKING_MAX_TOKENS_MARGIN: u32 = 2000;

/// Temperature Bedrock requires when extended thinking is enabled
pub const THINKING_TEMPERATURE: f32 = 1.0;

/// Content of the user turn
#[derive(Debug, Clone, PartialEq)]
pub enum MessageContent {
    /// Plain text, sent as a single text block
    Text(String),
    /// Pre-built content blocks (images, documents, ...), sent unchanged
    Blocks(Vec<Value>),
}

impl From<&str> for MessageContent {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for MessageContent {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Vec<Value>> for MessageContent {
    fn from(blocks: Vec<Value>) -> Self {
        Self::Blocks(blocks)
    }
}

impl TryFrom<Value> for MessageContent {
    type Error = InvokeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(text) => Ok(Self::Text(text)),
            Value::Array(blocks) => Ok(Self::Blocks(blocks)),
            other => Err(InvokeError::InvalidArgument(format!(
                "unsupported message content type: {}",
                json_type_name(&other)
            ))),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(serde::Serialize)]
struct TextBlock<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

impl Serialize for MessageContent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MessageContent::Text(text) => [TextBlock { kind: "text", text }].serialize(serializer),
            MessageContent::Blocks(blocks) => blocks.serialize(serializer),
        }
    }
}

/// A single conversation turn
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RequestMessage {
    pub role: &'static str,
    pub content: MessageContent,
}

/// Extended thinking directive
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ThinkingConfig {
    /// Enable extended thinking with a token budget
    Enabled {
        /// Tokens the model may spend thinking
        budget_tokens: u32,
    },
}

/// Request body for one invocation
///
/// Field order matches the wire shape; `system` and `thinking` are omitted
/// when unset.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct InvocationRequest {
    pub anthropic_version: &'static str,
    pub max_tokens: u32,
    pub temperature: f32,
    pub messages: Vec<RequestMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking: Option<ThinkingConfig>,
}

impl InvocationRequest {
    /// Build the body for a single user turn
    pub fn build(
        settings: &ClaudeSettings,
        system_prompt: Option<&str>,
        content: MessageContent,
        use_extended_thinking: bool,
    ) -> Self {
        let mut request = Self {
            anthropic_version: ANTHROPIC_VERSION,
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
            messages: vec![RequestMessage {
                role: "user",
                content,
            }],
            system: system_prompt
                .filter(|prompt| !prompt.is_empty())
                .map(str::to_string),
            thinking: None,
        };

        if use_extended_thinking {
            let budget_tokens = settings.thinking_budget_tokens;
            request.thinking = Some(ThinkingConfig::Enabled { budget_tokens });
            request.temperature = THINKING_TEMPERATURE;

            if request.max_tokens <= budget_tokens {
                request.max_tokens = budget_tokens.saturating_add(THINKING_MAX_TOKENS_MARGIN);
                log::info!(
                    "Adjusted max_tokens to {} for extended thinking",
                    request.max_tokens
                );
            }
        }

        request
    }

    /// Serialize to the JSON bytes sent over the wire
    pub fn to_body(&self) -> Result<Vec<u8>, InvokeError> {
        serde_json::to_vec(self).map_err(|e| {
            InvokeError::InvalidArgument(format!("request body could not be serialized: {}", e))
        })
    }
}
