//! Transport seam between the client and AWS Bedrock
//!
//! [`ModelTransport`] is the one operation the client needs from the network:
//! send a body to `InvokeModel` and hand back the raw response body. The
//! production implementation wraps the AWS SDK; tests substitute a scripted
//! transport.

use crate::config::{AwsSettings, ClaudeSettings};
use crate::error::{InvokeError, Result};
use aws_config::timeout::TimeoutConfig;
use aws_credential_types::provider::ProvideCredentials;
use aws_sdk_bedrockruntime::error::SdkError;
use aws_sdk_bedrockruntime::primitives::Blob;
use aws_sdk_bedrockruntime::Client;
use aws_types::region::Region;
use std::error::Error as StdError;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// MIME type of request and response bodies
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Trait for sending raw requests to a hosted model
///
/// Implementations must be safe to share across tasks; the client calls
/// `invoke_model` concurrently when it is itself shared.
#[async_trait::async_trait]
pub trait ModelTransport: Send + Sync {
    /// Send `body` to the model and return the raw response body
    ///
    /// Any failure should be reported as [`InvokeError::Transport`] so the
    /// client retries it.
    async fn invoke_model(
        &self,
        model_id: &str,
        content_type: &str,
        accept: &str,
        body: Vec<u8>,
    ) -> Result<Vec<u8>>;
}

/// Production transport wrapping the AWS SDK Bedrock runtime client
///
/// At most `max_pool_connections` calls are in flight at once; additional
/// callers wait for a permit.
pub struct SdkTransport {
    client: Client,
    permits: Arc<Semaphore>,
}

impl SdkTransport {
    /// Build a transport from resolved settings
    ///
    /// Loads the AWS configuration for the model's region (and the named
    /// profile, if any) and resolves credentials once so that a missing or
    /// broken credential chain fails here rather than on the first call.
    pub async fn connect(claude: &ClaudeSettings, aws: &AwsSettings) -> Result<Self> {
        let timeouts = TimeoutConfig::builder()
            .connect_timeout(aws.connect_timeout)
            .read_timeout(aws.read_timeout)
            .build();

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(claude.region.clone()))
            .timeout_config(timeouts);
        if let Some(profile) = &aws.profile_name {
            loader = loader.profile_name(profile);
        }
        let sdk_config = loader.load().await;

        let provider = sdk_config.credentials_provider().ok_or_else(|| {
            InvokeError::Configuration("no AWS credentials provider configured".into())
        })?;
        provider.provide_credentials().await.map_err(|e| {
            InvokeError::Configuration(format!(
                "unable to resolve AWS credentials: {}",
                error_chain_message(&e)
            ))
        })?;

        Ok(Self::with_client(
            Client::new(&sdk_config),
            aws.max_pool_connections,
        ))
    }

    /// Wrap an existing SDK client
    pub fn with_client(client: Client, max_pool_connections: usize) -> Self {
        Self {
            client,
            permits: Arc::new(Semaphore::new(max_pool_connections.max(1))),
        }
    }
}

#[async_trait::async_trait]
impl ModelTransport for SdkTransport {
    async fn invoke_model(
        &self,
        model_id: &str,
        content_type: &str,
        accept: &str,
        body: Vec<u8>,
    ) -> Result<Vec<u8>> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| InvokeError::Transport(e.to_string()))?;

        let output = self
            .client
            .invoke_model()
            .model_id(model_id)
            .content_type(content_type)
            .accept(accept)
            .body(Blob::new(body))
            .send()
            .await
            .map_err(describe_sdk_error)?;

        Ok(output.body.into_inner())
    }
}

/// Turn an SDK error into a transport error carrying its most useful message
fn describe_sdk_error<E, R>(err: SdkError<E, R>) -> InvokeError
where
    E: StdError + 'static,
    R: std::fmt::Debug,
{
    InvokeError::Transport(error_chain_message(&err))
}

/// Innermost meaningful message in an error chain
///
/// The SDK wraps the interesting error ("ThrottlingException: ...",
/// "connection refused") in generic dispatch layers; those are skipped.
fn error_chain_message(err: &dyn StdError) -> String {
    let mut messages = Vec::new();
    collect_error_messages(err, &mut messages);
    messages
        .pop()
        .unwrap_or_else(|| "Unknown error".to_string())
}

/// Recursively collect error messages from an error chain
fn collect_error_messages(err: &dyn StdError, messages: &mut Vec<String>) {
    let msg = err.to_string();
    if !msg.is_empty()
        && !msg.starts_with("dispatch failure")
        && !msg.starts_with("connector error")
        && !msg.starts_with("unhandled error")
        && !msg.starts_with("service error")
    {
        messages.push(msg);
    }

    if let Some(source) = err.source() {
        collect_error_messages(source, messages);
    }
}
