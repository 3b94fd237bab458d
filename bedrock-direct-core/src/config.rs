//! Client configuration
//!
//! Every setting has a built-in default, so a configuration deserialized from
//! a partial document (or with whole sections missing) is still complete.
//!
//! ```
//! use bedrock_direct_core::ClientConfig;
//!
//! let config: ClientConfig = serde_json::from_str(r#"{
//!     "claude": { "max_tokens": 4096 },
//!     "aws": { "profile_name": "research" }
//! }"#).unwrap();
//!
//! assert_eq!(config.claude.max_tokens, 4096);
//! assert_eq!(config.claude.region, "us-east-1");
//! assert_eq!(config.aws.max_retries, 3);
//! ```

use crate::error::{InvokeError, Result};
use crate::request::THINKING_MAX_TOKENS_MARGIN;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default Bedrock model (Claude 3.7 Sonnet through the US inference profile)
pub const DEFAULT_MODEL_ID: &str = "us.anthropic.claude-3-7-sonnet-20250219-v1:0";
/// Default maximum tokens to generate
pub const DEFAULT_MAX_TOKENS: u32 = 2000;
/// Default sampling temperature outside extended thinking
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
/// Default AWS region
pub const DEFAULT_REGION: &str = "us-east-1";
/// Default extended thinking budget
pub const DEFAULT_THINKING_BUDGET_TOKENS: u32 = 8000;
/// Default number of attempts per invocation
pub const DEFAULT_MAX_RETRIES: u32 = 3;
/// Default base of the exponential backoff, in seconds
pub const DEFAULT_BACKOFF_FACTOR: f64 = 1.5;
/// Default connect timeout (2 minutes)
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 120;
/// Default read timeout (30 minutes, extended thinking responses are slow)
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 1800;
/// Default number of concurrent in-flight calls per client
pub const DEFAULT_MAX_POOL_CONNECTIONS: usize = 50;
/// Largest thinking budget for which `max_tokens` can still be raised above it
pub const MAX_THINKING_BUDGET_TOKENS: u32 = u32::MAX - THINKING_MAX_TOKENS_MARGIN;

/// Model and sampling settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaudeSettings {
    /// Bedrock model ID or inference profile ID
    pub model_id: String,
    /// Maximum tokens to generate (must be >= 1)
    pub max_tokens: u32,
    /// Sampling temperature, ignored in extended thinking mode
    pub temperature: f32,
    /// AWS region hosting the model
    pub region: String,
    /// Tokens reserved for extended thinking
    pub thinking_budget_tokens: u32,
}

impl Default for ClaudeSettings {
    fn default() -> Self {
        Self {
            model_id: DEFAULT_MODEL_ID.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            region: DEFAULT_REGION.to_string(),
            thinking_budget_tokens: DEFAULT_THINKING_BUDGET_TOKENS,
        }
    }
}

/// Transport and retry settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AwsSettings {
    /// Attempts per invocation (must be >= 1)
    pub max_retries: u32,
    /// Base of the exponential backoff; the n-th retry waits `factor^n` seconds
    pub backoff_factor: f64,
    /// Named profile from the shared AWS config, or the default chain if unset
    pub profile_name: Option<String>,
    /// Connect timeout, written in seconds (fractions allowed)
    #[serde(
        rename = "connect_timeout_secs",
        alias = "connect_timeout",
        with = "duration_secs"
    )]
    pub connect_timeout: Duration,
    /// Read timeout, written in seconds (fractions allowed)
    #[serde(
        rename = "read_timeout_secs",
        alias = "read_timeout",
        with = "duration_secs"
    )]
    pub read_timeout: Duration,
    /// Maximum concurrent in-flight calls; further callers wait
    pub max_pool_connections: usize,
}

impl Default for AwsSettings {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
            profile_name: None,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            read_timeout: Duration::from_secs(DEFAULT_READ_TIMEOUT_SECS),
            max_pool_connections: DEFAULT_MAX_POOL_CONNECTIONS,
        }
    }
}

/// Serde helpers storing a [`Duration`] as a number of seconds
mod duration_secs {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(duration.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(D::Error::custom)
    }
}

/// Complete configuration for an [`InvocationClient`](crate::InvocationClient)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Model settings
    #[serde(alias = "claude_config")]
    pub claude: ClaudeSettings,
    /// Transport and retry settings
    #[serde(alias = "aws_config")]
    pub aws: AwsSettings,
    /// System prompt attached to every request
    pub system_prompt: Option<String>,
}

impl ClientConfig {
    /// Create a configuration with every setting at its default
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the model ID
    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.claude.model_id = model_id.into();
        self
    }

    /// Set the maximum number of tokens to generate
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.claude.max_tokens = max_tokens;
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.claude.temperature = temperature;
        self
    }

    /// Set the AWS region
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.claude.region = region.into();
        self
    }

    /// Set the extended thinking budget
    pub fn with_thinking_budget(mut self, budget_tokens: u32) -> Self {
        self.claude.thinking_budget_tokens = budget_tokens;
        self
    }

    /// Set the system prompt
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Set the number of attempts per invocation
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.aws.max_retries = max_retries;
        self
    }

    /// Set the backoff factor
    pub fn with_backoff_factor(mut self, factor: f64) -> Self {
        self.aws.backoff_factor = factor;
        self
    }

    /// Use a named AWS profile
    pub fn with_profile(mut self, profile_name: impl Into<String>) -> Self {
        self.aws.profile_name = Some(profile_name.into());
        self
    }

    /// Set connect and read timeouts
    pub fn with_timeouts(mut self, connect: Duration, read: Duration) -> Self {
        self.aws.connect_timeout = connect;
        self.aws.read_timeout = read;
        self
    }

    /// Set the maximum number of concurrent in-flight calls
    pub fn with_max_pool_connections(mut self, max: usize) -> Self {
        self.aws.max_pool_connections = max;
        self
    }

    /// Check the invariants the client relies on
    pub fn validate(&self) -> Result<()> {
        if self.claude.model_id.trim().is_empty() {
            return Err(InvokeError::Configuration("model_id must not be empty".into()));
        }
        if self.claude.region.trim().is_empty() {
            return Err(InvokeError::Configuration("region must not be empty".into()));
        }
        if !self.claude.temperature.is_finite() {
            return Err(InvokeError::Configuration(format!(
                "temperature must be a finite number, got {}",
                self.claude.temperature
            )));
        }
        if self.claude.thinking_budget_tokens > MAX_THINKING_BUDGET_TOKENS {
            return Err(InvokeError::Configuration(format!(
                "thinking_budget_tokens must be at most {}, got {}",
                MAX_THINKING_BUDGET_TOKENS, self.claude.thinking_budget_tokens
            )));
        }
        if self.claude.max_tokens == 0 {
            return Err(InvokeError::Configuration("max_tokens must be at least 1".into()));
        }
        if self.aws.max_retries == 0 {
            return Err(InvokeError::Configuration("max_retries must be at least 1".into()));
        }
        if !self.aws.backoff_factor.is_finite() || self.aws.backoff_factor <= 1.0 {
            return Err(InvokeError::Configuration(format!(
                "backoff_factor must be greater than 1.0, got {}",
                self.aws.backoff_factor
            )));
        }
        if self.aws.connect_timeout.is_zero() || self.aws.read_timeout.is_zero() {
            return Err(InvokeError::Configuration(
                "connect and read timeouts must be non-zero".into(),
            ));
        }
        if self.aws.max_pool_connections == 0 {
            return Err(InvokeError::Configuration(
                "max_pool_connections must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
