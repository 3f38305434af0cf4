//! SQLite persistence: schema, reference-data resolution, and the headline
//! dedup gate.
//!
//! The store carries three tables. `sources` and `categories` are static
//! reference data — seeded at deployment, read-only for the scrape pipeline.
//! `headlines` is the only table the pipeline writes, and `headlines.url`
//! carries a UNIQUE constraint that doubles as the dedup key.

mod headlines;
mod reference;
mod schema;

pub use headlines::{HeadlineRecord, InsertOutcome, NewHeadline};
pub use schema::{Database, StorageError};
