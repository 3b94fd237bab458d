//! Web search through the Serper API

use crate::error::ToolError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Serper Google search endpoint
pub const SERPER_URL: &str = "https://google.serper.dev/search";

/// Results requested per query
pub const DEFAULT_RESULTS_PER_QUERY: u32 = 2;

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings for [`SearchClient`]
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Serper API key, sent as `X-API-KEY`
    pub api_key: String,
    /// Search endpoint (default: [`SERPER_URL`])
    pub endpoint: String,
    /// Number of organic results to request
    pub results_per_query: u32,
    /// Request timeout
    pub timeout: Duration,
}

impl SearchConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: SERPER_URL.to_string(),
            results_per_query: DEFAULT_RESULTS_PER_QUERY,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Point the client at a different endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the number of results requested per query
    pub fn with_results_per_query(mut self, count: u32) -> Self {
        self.results_per_query = count;
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    q: &'a str,
    num: u32,
}

/// Search response; only organic results are kept
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub organic: Vec<OrganicResult>,
}

/// A single organic search hit
#[derive(Debug, Clone, Deserialize)]
pub struct OrganicResult {
    pub link: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
}

/// Client for the Serper search API
pub struct SearchClient {
    client: Client,
    config: SearchConfig,
}

impl SearchClient {
    pub fn new(config: SearchConfig) -> Result<Self, ToolError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// Run a search
    ///
    /// Never fails: timeouts, transport errors, error statuses and unreadable
    /// bodies are logged and reported as an empty result set.
    pub async fn search(&self, query: &str) -> SearchResults {
        log::info!("Searching the web...");
        let payload = SearchRequest {
            q: query,
            num: self.config.results_per_query,
        };
        log::debug!("Payload: {:?}", payload);

        let response = match self
            .client
            .post(&self.config.endpoint)
            .header("X-API-KEY", &self.config.api_key)
            .json(&payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                log::error!("Search request timed out.");
                return SearchResults::default();
            }
            Err(e) => {
                log::error!("Search request failed: {}", e);
                return SearchResults::default();
            }
        };

        let status = response.status();
        if !status.is_success() {
            log::error!("Search failed with status code: {}", status.as_u16());
            return SearchResults::default();
        }

        match response.json::<SearchResults>().await {
            Ok(results) => {
                log::info!("Search successful.");
                results
            }
            Err(e) => {
                log::error!("Search response could not be parsed: {}", e);
                SearchResults::default()
            }
        }
    }
}
