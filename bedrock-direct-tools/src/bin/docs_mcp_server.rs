//! MCP server for documentation search over stdio
//!
//! Usage: docs-mcp-server --serper-api-key <KEY>

use anyhow::Context;
use bedrock_direct_tools::{DocsServer, DocsTool, PageFetcher, SearchClient, SearchConfig};
use clap::Parser;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "docs-mcp-server", version, about = "Serve the get_docs tool over MCP on stdio")]
struct Args {
    /// Serper API key used for web searches
    #[arg(long)]
    serper_api_key: String,

    /// Results fetched per search
    #[arg(long, default_value_t = bedrock_direct_tools::search::DEFAULT_RESULTS_PER_QUERY)]
    results: u32,

    /// Timeout for search and page requests, in seconds
    #[arg(long, default_value_t = bedrock_direct_tools::search::DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let timeout = Duration::from_secs(args.timeout_secs);

    let config = SearchConfig::new(args.serper_api_key)
        .with_results_per_query(args.results)
        .with_timeout(timeout);
    let tool = DocsTool::with_clients(
        SearchClient::new(config).context("failed to build search client")?,
        PageFetcher::new(timeout).context("failed to build page fetcher")?,
    );

    DocsServer::new(tool)
        .serve_stdio()
        .await
        .context("docs MCP server failed")?;
    Ok(())
}
