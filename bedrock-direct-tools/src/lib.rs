//! Documentation search for bedrock-direct agents
//!
//! [`DocsTool`] answers "how do I ..." questions about a handful of Python
//! LLM libraries by searching their documentation sites through the Serper
//! API and returning the text of the top hits.
//!
//! ```ignore
//! use bedrock_direct_tools::{DocsTool, GetDocsInput};
//!
//! let tool = DocsTool::new(serper_api_key)?;
//! let text = tool
//!     .get_docs(GetDocsInput {
//!         query: "Chroma DB".into(),
//!         library: "langchain".into(),
//!     })
//!     .await?;
//! ```
//!
//! The same tool is served over MCP on stdio by [`DocsServer`], and by the
//! `docs-mcp-server` binary:
//!
//! ```text
//! docs-mcp-server --serper-api-key <KEY>
//! ```

pub mod docs;
pub mod error;
pub mod fetch;
pub mod search;
pub mod server;

pub use docs::{docs_site, DocsTool, GetDocsInput, ToolDefinition, DOCS_SITES, NO_RESULTS};
pub use error::ToolError;
pub use fetch::{html_to_text, PageFetcher};
pub use search::{OrganicResult, SearchClient, SearchConfig, SearchResults};
pub use server::{DocsServer, SERVER_NAME};
