//! Feed scrape orchestrator.
//!
//! One run walks the configured feeds in order, and within each feed drives
//! fetch → normalize → classify → resolve → insert for the first N items.
//! Feeds are isolated from each other: any fetch, parse, resolution, or
//! storage failure is recorded in that feed's summary and the run moves on.
//! The only run-aborting failure is being unable to open the store, which
//! happens before this module is ever reached.

use std::time::Duration;

use chrono::Utc;
use thiserror::Error;

use crate::classify::CategoryTable;
use crate::config::{FeedConfig, ScrapeOptions};
use crate::ingest::{fetch_feed, normalize, FetchError};
use crate::storage::{Database, InsertOutcome, NewHeadline, StorageError};

/// A feed-level failure. Every variant is recoverable at run level.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Fetching or parsing the feed document failed
    #[error(transparent)]
    Fetch(#[from] FetchError),
    /// The configured source name has no row in the reference store;
    /// headlines cannot be attributed, so the whole feed is skipped
    #[error("Source '{0}' is not seeded in the reference store")]
    UnknownSource(String),
    /// Resolution or insert failed mid-feed
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Per-feed item tallies for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedCounts {
    /// Items taken from the feed document (after the per-feed cap)
    pub seen: usize,
    /// Items newly committed this run
    pub inserted: usize,
    /// Items whose URL was already stored
    pub duplicates: usize,
}

/// Outcome of scraping one configured feed.
#[derive(Debug)]
pub struct FeedSummary {
    pub name: String,
    pub url: String,
    pub outcome: Result<FeedCounts, ScrapeError>,
}

/// Scrape every configured feed once, in configuration order.
///
/// Returns one [`FeedSummary`] per feed, in the same order. A failing feed
/// never aborts the run; its error travels in the summary instead.
pub async fn run_scrape(
    db: &Database,
    client: &reqwest::Client,
    feeds: &[FeedConfig],
    options: &ScrapeOptions,
    categories: &CategoryTable,
) -> Vec<FeedSummary> {
    let mut summaries = Vec::with_capacity(feeds.len());

    for feed in feeds {
        tracing::info!(source = %feed.name, url = %feed.url, "Scraping feed");
        let outcome = scrape_feed(db, client, feed, options, categories).await;

        match &outcome {
            Ok(counts) => {
                tracing::info!(
                    source = %feed.name,
                    seen = counts.seen,
                    inserted = counts.inserted,
                    duplicates = counts.duplicates,
                    "Feed complete"
                );
            }
            Err(e) => {
                tracing::warn!(source = %feed.name, error = %e, "Feed skipped");
            }
        }

        summaries.push(FeedSummary {
            name: feed.name.clone(),
            url: feed.url.clone(),
            outcome,
        });
    }

    summaries
}

/// Scrape a single feed: fetch and parse the document, resolve the source
/// once, then run each item through the normalize/classify/resolve/insert
/// pipeline.
async fn scrape_feed(
    db: &Database,
    client: &reqwest::Client,
    feed: &FeedConfig,
    options: &ScrapeOptions,
    categories: &CategoryTable,
) -> Result<FeedCounts, ScrapeError> {
    let timeout = Duration::from_secs(options.fetch_timeout_secs);
    let items = fetch_feed(client, &feed.url, timeout).await?;

    let source_id = db
        .source_id(&feed.name)
        .await?
        .ok_or_else(|| ScrapeError::UnknownSource(feed.name.clone()))?;

    let mut counts = FeedCounts::default();

    for raw in items.into_iter().take(options.items_per_feed) {
        counts.seen += 1;

        let item = normalize(raw, Utc::now());
        let category = categories.classify(&item.title, &item.description);
        let category_id = db
            .resolve_category(category, categories.fallback_name())
            .await?;

        let headline = NewHeadline {
            title: item.title,
            description: item.description,
            url: item.url,
            image_url: item.image_url,
            source_id,
            category_id,
            publish_date: item.publish_date,
        };

        match db.insert_headline(&headline).await? {
            InsertOutcome::Inserted => {
                counts.inserted += 1;
                tracing::info!(category = %category, title = %headline.title, "Added headline");
            }
            InsertOutcome::AlreadyExists => {
                counts.duplicates += 1;
            }
        }
    }

    Ok(counts)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::build_client;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const RSS: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
  <item><title>cricket final</title><link>http://example.com/s1</link></item>
</channel></rss>"#;

    async fn seeded_db() -> Database {
        let db = Database::open(":memory:").await.unwrap();
        db.seed_categories(&[("Sports", ""), ("General", "")])
            .await
            .unwrap();
        db.seed_sources(&["Wire"]).await.unwrap();
        db
    }

    fn table() -> CategoryTable {
        CategoryTable::builtin()
    }

    #[tokio::test]
    async fn test_empty_feed_list_yields_no_summaries() {
        let db = seeded_db().await;
        let client = build_client("Mozilla/5.0").unwrap();
        let summaries =
            run_scrape(&db, &client, &[], &ScrapeOptions::default(), &table()).await;
        assert!(summaries.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_source_skips_feed_without_inserting() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(RSS))
            .mount(&server)
            .await;

        let db = seeded_db().await;
        let client = build_client("Mozilla/5.0").unwrap();
        let feeds = vec![FeedConfig {
            name: "Not Seeded".to_string(),
            url: server.uri(),
        }];

        let summaries =
            run_scrape(&db, &client, &feeds, &ScrapeOptions::default(), &table()).await;
        assert_eq!(summaries.len(), 1);
        assert!(matches!(
            summaries[0].outcome,
            Err(ScrapeError::UnknownSource(_))
        ));
        assert_eq!(db.headline_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_per_feed_cap_limits_items() {
        let mut body = String::from(r#"<?xml version="1.0"?><rss version="2.0"><channel>"#);
        for i in 0..15 {
            body.push_str(&format!(
                "<item><title>story {i}</title><link>http://example.com/{i}</link></item>"
            ));
        }
        body.push_str("</channel></rss>");

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;

        let db = seeded_db().await;
        let client = build_client("Mozilla/5.0").unwrap();
        let feeds = vec![FeedConfig {
            name: "Wire".to_string(),
            url: server.uri(),
        }];

        let summaries =
            run_scrape(&db, &client, &feeds, &ScrapeOptions::default(), &table()).await;
        let counts = summaries[0].outcome.as_ref().unwrap();
        assert_eq!(counts.seen, 10);
        assert_eq!(counts.inserted, 10);
        assert_eq!(db.headline_count().await.unwrap(), 10);
    }
}
