//! Core data models for bibliographic records and search resolution.

mod query;
mod record;

pub use query::{AttemptLog, BookQuery, SearchMethod, SearchResult};
pub use record::{BibliographicRecord, RecordBuilder, BROWSE_ID_PREFIX};
