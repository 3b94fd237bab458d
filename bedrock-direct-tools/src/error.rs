//! Error types for the documentation tools

use thiserror::Error;

/// Errors returned by [`DocsTool`](crate::DocsTool)
///
/// Search and page fetch failures are not errors: they degrade to an empty
/// result set or a marker string in the returned text.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested library has no known documentation site
    #[error("Library {0} not supported by this tool")]
    UnsupportedLibrary(String),

    /// The tool input could not be deserialized
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The HTTP client could not be built
    #[error("Failed to create HTTP client: {0}")]
    Client(String),

    /// The input schema could not be generated
    #[error("Schema error: {0}")]
    Schema(String),

    /// The MCP server failed to start or stopped abnormally
    #[error("Server error: {0}")]
    Server(String),
}

impl From<reqwest::Error> for ToolError {
    fn from(err: reqwest::Error) -> Self {
        ToolError::Client(err.to_string())
    }
}
