//! HTTP/XML fetch layer.
//!
//! Retrieves feed bytes with a bounded timeout and a browser-like user agent,
//! then parses the RSS/Atom document into raw items. A malformed document is
//! a feed-level parse error, never a partial item list.

use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur while fetching and parsing one feed.
///
/// All variants are recoverable at feed granularity: the orchestrator records
/// them in the run summary and moves on to the next feed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// Request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Document could not be parsed as RSS or Atom
    #[error("Parse error: {0}")]
    Parse(String),
}

/// One feed entry as delivered by the wire, before normalization.
///
/// `published` is already a concrete timestamp where the document carried a
/// parseable date; a missing or malformed date surfaces as `None` and is
/// replaced with the scrape wall-clock time downstream.
#[derive(Debug, Clone)]
pub struct RawItem {
    pub title: Option<String>,
    pub description_html: Option<String>,
    pub link: Option<String>,
    pub guid: Option<String>,
    pub media_image_url: Option<String>,
    pub published: Option<DateTime<Utc>>,
}

/// Build the shared HTTP client used for all feed requests.
///
/// The user agent is sent verbatim; several feed providers reject requests
/// carrying a default library identifier.
pub fn build_client(user_agent: &str) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder().user_agent(user_agent).build()
}

/// Fetch one feed and parse it into raw items.
///
/// The whole request (send + body) is bounded by `timeout`; a feed that
/// never answers cannot stall the run. Non-success statuses and malformed
/// XML are surfaced as [`FetchError`] values.
pub async fn fetch_feed(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
) -> Result<Vec<RawItem>, FetchError> {
    let bytes = tokio::time::timeout(timeout, async {
        let response = client.get(url).send().await.map_err(FetchError::Network)?;

        if !response.status().is_success() {
            return Err(FetchError::HttpStatus(response.status().as_u16()));
        }

        response.bytes().await.map_err(FetchError::Network)
    })
    .await
    .map_err(|_| FetchError::Timeout)??;

    let feed = feed_rs::parser::parse(&bytes[..]).map_err(|e| FetchError::Parse(e.to_string()))?;

    let items = feed
        .entries
        .into_iter()
        .map(|entry| {
            let link = entry.links.first().map(|l| l.href.clone());
            let media_image_url = entry
                .media
                .iter()
                .flat_map(|m| m.content.iter())
                .find_map(|c| c.url.as_ref().map(|u| u.to_string()));
            let guid = if entry.id.is_empty() {
                None
            } else {
                Some(entry.id)
            };

            RawItem {
                title: entry.title.map(|t| t.content),
                description_html: entry
                    .summary
                    .map(|s| s.content)
                    .or_else(|| entry.content.and_then(|c| c.body)),
                link,
                guid,
                media_image_url,
                published: entry.published,
            }
        })
        .collect();

    Ok(items)
}

// ============================================================================
// Tests
// ============================================================================
