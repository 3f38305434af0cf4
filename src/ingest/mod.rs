//! Feed ingestion: HTTP retrieval, XML parsing, and item normalization.
//!
//! The ingestion path is two stages:
//!
//! - [`fetch`] - HTTP retrieval with a fixed timeout and user agent, plus
//!   RSS/Atom parsing into raw items via the `feed-rs` crate
//! - [`normalize`] - conversion of a raw item into the canonical headline
//!   record, applying the documented per-field fallbacks
//!
//! Raw items are ephemeral: produced by the fetch layer, consumed by the
//! normalizer, never persisted.

pub mod fetch;
pub mod normalize;

pub use fetch::{build_client, fetch_feed, FetchError, RawItem};
pub use normalize::{normalize, NormalizedItem, MAX_DESCRIPTION_CHARS};
