//! News headline ingestion pipeline.
//!
//! Aggregates headlines from configured RSS feeds, classifies each item into
//! a topical category by keyword, deduplicates against previously stored
//! items by canonical URL, and persists normalized records keyed by source
//! and category in SQLite.
//!
//! The pipeline runs as a sequential batch job: feeds in configuration
//! order, items in document order. One bad feed never aborts a run — every
//! feed's outcome travels in its [`scrape::FeedSummary`].

pub mod classify;
pub mod config;
pub mod ingest;
pub mod scrape;
pub mod storage;
