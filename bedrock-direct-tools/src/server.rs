//! MCP server exposing [`DocsTool`] as the `get_docs` tool
//!
//! ```ignore
//! use bedrock_direct_tools::{DocsServer, DocsTool};
//!
//! DocsServer::new(DocsTool::new(serper_api_key)?)
//!     .serve_stdio()
//!     .await?;
//! ```

use crate::docs::DocsTool;
use crate::error::ToolError;
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, Implementation, JsonObject, ListToolsResult,
    PaginatedRequestParam, ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData, RoleServer, ServerHandler, ServiceExt};
use serde_json::Value;
use std::sync::Arc;

/// Name the server reports during initialization
pub const SERVER_NAME: &str = "docs";

/// MCP server wrapping a [`DocsTool`]
///
/// Cloning is cheap; clones share the same tool and HTTP clients.
#[derive(Clone)]
pub struct DocsServer {
    tool: Arc<DocsTool>,
}

impl DocsServer {
    pub fn new(tool: DocsTool) -> Self {
        Self {
            tool: Arc::new(tool),
        }
    }

    /// Tools advertised by the server
    pub fn tools(&self) -> Result<Vec<Tool>, ToolError> {
        let definition = self.tool.definition()?;
        let input_schema = match definition.input_schema {
            Value::Object(schema) => schema,
            other => {
                return Err(ToolError::Schema(format!(
                    "input schema must be an object, got {}",
                    other
                )))
            }
        };

        Ok(vec![Tool::new(
            definition.name,
            definition.description,
            Arc::new(input_schema),
        )])
    }

    /// Dispatch a tool call
    ///
    /// Unknown tool names are protocol errors. Bad input and unsupported
    /// libraries come back as tool results flagged as errors so the calling
    /// model can see the message and correct itself.
    pub async fn call(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, ErrorData> {
        if name != self.tool.name() {
            return Err(ErrorData::invalid_params(
                format!("Unknown tool: {}", name),
                None,
            ));
        }

        let input = arguments.map(Value::Object).unwrap_or(Value::Null);
        match self.tool.execute_json(input).await {
            Ok(text) => Ok(CallToolResult::success(vec![Content::text(text)])),
            Err(e @ (ToolError::UnsupportedLibrary(_) | ToolError::InvalidInput(_))) => {
                Ok(CallToolResult::error(vec![Content::text(e.to_string())]))
            }
            Err(e) => Err(ErrorData::internal_error(e.to_string(), None)),
        }
    }

    /// Serve over stdin/stdout until the client disconnects
    pub async fn serve_stdio(self) -> Result<(), ToolError> {
        log::info!("Starting {} MCP server on stdio", SERVER_NAME);
        let service = self
            .serve(rmcp::transport::stdio())
            .await
            .map_err(|e| ToolError::Server(e.to_string()))?;

        let reason = service
            .waiting()
            .await
            .map_err(|e| ToolError::Server(e.to_string()))?;
        log::info!("MCP server stopped: {:?}", reason);
        Ok(())
    }
}

impl ServerHandler for DocsServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Implementation::from_build_env()
            },
            instructions: Some(
                "Search the documentation of langchain, llama_index and openai \
                 with the get_docs tool."
                    .into(),
            ),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        let tools = self
            .tools()
            .map_err(|e| ErrorData::internal_error(e.to_string(), None))?;
        Ok(ListToolsResult::with_all_items(tools))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        log::debug!("Calling tool: {}", request.name);
        self.call(&request.name, request.arguments).await
    }
}
