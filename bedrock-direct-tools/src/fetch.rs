//! Page fetching and text extraction

use crate::error::ToolError;
use html2md::parse_html;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// User agent sent with page requests
pub const USER_AGENT: &str = "docs-app/1.0";

/// Text returned in place of a page that timed out
pub const TIMEOUT_MARKER: &str = "Timeout error";

/// Fetches pages and converts their HTML to text
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(timeout: Duration) -> Result<Self, ToolError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }

    /// Fetch a page and return its text
    ///
    /// Failures are contained: a timeout yields [`TIMEOUT_MARKER`] and any
    /// other failure a short `"Fetch error: ..."` line, so one bad page does
    /// not sink the whole lookup.
    pub async fn fetch_text(&self, url: &str) -> String {
        log::info!("Fetching URL...");
        log::debug!("Fetching URL: {}", url);

        let url = match Url::parse(url) {
            Ok(url) => url,
            Err(e) => {
                log::error!("Invalid URL {}: {}", url, e);
                return format!("Fetch error: invalid URL {}", url);
            }
        };

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                log::error!("Fetch request timed out.");
                return TIMEOUT_MARKER.to_string();
            }
            Err(e) => {
                log::error!("Fetch request failed: {}", e);
                return format!("Fetch error: {}", e);
            }
        };

        match response.text().await {
            Ok(html) => {
                log::info!("URL fetched successfully.");
                html_to_text(&html)
            }
            Err(e) if e.is_timeout() => {
                log::error!("Fetch request timed out.");
                TIMEOUT_MARKER.to_string()
            }
            Err(e) => {
                log::error!("Failed to read page body: {}", e);
                format!("Fetch error: {}", e)
            }
        }
    }
}

/// Convert HTML to readable text
pub fn html_to_text(html: &str) -> String {
    parse_html(html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_to_text_keeps_content() {
        let text = html_to_text("<html><body><h1>Retrievers</h1><p>Use a vector store.</p></body></html>");
        assert!(text.contains("Retrievers"));
        assert!(text.contains("Use a vector store."));
        assert!(!text.contains("<p>"));
    }

    #[tokio::test]
    async fn test_invalid_url_is_contained() {
        let fetcher = PageFetcher::new(Duration::from_secs(1)).unwrap();
        let text = fetcher.fetch_text("not a url").await;
        assert!(text.starts_with("Fetch error"));
    }
}
