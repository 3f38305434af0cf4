//! Configuration file parser for ~/.config/headliner/config.toml.
//!
//! The config file is optional — a missing file yields `Config::default()`,
//! which carries the reference feed list. Unknown keys are silently ignored
//! by serde, though we log a warning when the file contains potential typos.
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use url::Url;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// One configured feed endpoint: a human-readable source name and its URL.
///
/// The source name must match a row in the `sources` reference table;
/// a feed whose name cannot be resolved is skipped at scrape time.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct FeedConfig {
    pub name: String,
    pub url: String,
}

/// Tuning constants for a scrape run.
///
/// All fields use `#[serde(default)]` so any subset can be overridden.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScrapeOptions {
    /// Maximum number of items taken from each feed per run.
    pub items_per_feed: usize,

    /// Per-request timeout in seconds.
    pub fetch_timeout_secs: u64,

    /// User agent sent with feed requests. Some providers reject the
    /// default library identifier outright.
    pub user_agent: String,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            items_per_feed: 10,
            fetch_timeout_secs: 10,
            user_agent: "Mozilla/5.0".to_string(),
        }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the SQLite database file.
    pub db_path: String,

    /// Ordered feed list. Feeds are scraped in this order.
    pub feeds: Vec<FeedConfig>,

    /// Scrape tuning constants.
    pub scrape: ScrapeOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: "headlines.db".to_string(),
            feeds: vec![
                FeedConfig {
                    name: "NDTV".to_string(),
                    url: "https://feeds.feedburner.com/ndtvnews-latest".to_string(),
                },
                FeedConfig {
                    name: "India Today".to_string(),
                    url: "https://www.indiatoday.in/rss/home".to_string(),
                },
                FeedConfig {
                    name: "Hindustan Times".to_string(),
                    url: "https://www.hindustantimes.com/feeds/rss/latest-news/rssfeed.xml"
                        .to_string(),
                },
            ],
            scrape: ScrapeOptions::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → silently accepted (serde default behavior), logged as warning
    ///
    /// Feeds whose URL is not a valid http(s) URL are dropped with a warning
    /// rather than failing the whole load.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        // Parse the TOML content first as a raw table to detect unknown keys
        if let Ok(raw) = content.parse::<toml::Table>() {
            let known_keys = ["db_path", "feeds", "scrape"];
            for key in raw.keys() {
                if !known_keys.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let mut config: Config = toml::from_str(&content)?;
        config.feeds.retain(|feed| {
            if is_feed_url(&feed.url) {
                true
            } else {
                tracing::warn!(name = %feed.name, url = %feed.url, "Dropping feed with invalid URL");
                false
            }
        });

        tracing::info!(
            path = %path.display(),
            feeds = config.feeds.len(),
            "Loaded configuration"
        );
        Ok(config)
    }
}

/// A feed URL must parse and use an http(s) scheme.
fn is_feed_url(raw: &str) -> bool {
    match Url::parse(raw) {
        Ok(url) => url.scheme() == "http" || url.scheme() == "https",
        Err(_) => false,
    }
}

// ============================================================================
// Tests
// ============================================================================
