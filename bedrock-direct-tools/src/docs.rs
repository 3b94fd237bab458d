//! Documentation search tool
//!
//! Scopes a web search to a library's documentation site, then fetches each
//! hit and returns the concatenated page text.

use crate::error::ToolError;
use crate::fetch::PageFetcher;
use crate::search::{SearchClient, SearchConfig};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Libraries the tool can search, with their documentation sites
pub const DOCS_SITES: &[(&str, &str)] = &[
    ("langchain", "python.langchain.com/docs"),
    ("llama_index", "python.llama_index.com/docs"),
    ("openai", "platform.openai.com/docs"),
];

/// Returned when the search yields nothing
pub const NO_RESULTS: &str = "No results found";

/// Documentation site for a library, if supported
pub fn docs_site(library: &str) -> Option<&'static str> {
    DOCS_SITES
        .iter()
        .find(|(name, _)| *name == library)
        .map(|(_, site)| *site)
}

/// Input for the documentation search tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GetDocsInput {
    /// The query to search for (e.g. "Chroma DB")
    pub query: String,

    /// The library to search in (e.g. "langchain")
    pub library: String,
}

/// Tool description handed to a model
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// Tool for searching library documentation
pub struct DocsTool {
    search: SearchClient,
    fetcher: PageFetcher,
}

impl DocsTool {
    /// Create a tool using the Serper API with default settings
    pub fn new(api_key: impl Into<String>) -> Result<Self, ToolError> {
        let config = SearchConfig::new(api_key);
        let fetcher = PageFetcher::new(config.timeout)?;
        Ok(Self::with_clients(SearchClient::new(config)?, fetcher))
    }

    /// Create a tool from pre-built clients
    pub fn with_clients(search: SearchClient, fetcher: PageFetcher) -> Self {
        Self { search, fetcher }
    }

    pub fn name(&self) -> &str {
        "get_docs"
    }

    pub fn description(&self) -> &str {
        "Search the latest docs for a given query and library. \
         Supports langchain, openai, and llama_index. Returns text from the docs."
    }

    /// Name, description and JSON schema of the input
    pub fn definition(&self) -> Result<ToolDefinition, ToolError> {
        let schema = schemars::schema_for!(GetDocsInput);
        let input_schema =
            serde_json::to_value(schema).map_err(|e| ToolError::Schema(e.to_string()))?;
        Ok(ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema,
        })
    }

    /// Execute with raw JSON input, as received from a tool call
    pub async fn execute_json(&self, input: Value) -> Result<String, ToolError> {
        let input: GetDocsInput =
            serde_json::from_value(input).map_err(|e| ToolError::InvalidInput(e.to_string()))?;
        self.get_docs(input).await
    }

    /// Search the documentation of `input.library` for `input.query`
    pub async fn get_docs(&self, input: GetDocsInput) -> Result<String, ToolError> {
        log::info!("Getting docs...");
        let site = docs_site(&input.library).ok_or_else(|| {
            log::error!("Library {} not supported.", input.library);
            ToolError::UnsupportedLibrary(input.library.clone())
        })?;

        let query = format!("site:{} {}", site, input.query);
        let results = self.search.search(&query).await;
        if results.organic.is_empty() {
            log::error!("No results found.");
            return Ok(NO_RESULTS.to_string());
        }

        let mut text = String::new();
        for result in &results.organic {
            text.push_str(&self.fetcher.fetch_text(&result.link).await);
        }

        log::info!("Docs fetched successfully.");
        log::debug!("Fetched text: {}", text);
        Ok(text)
    }
}
