//! # opac-resolver
//!
//! Resolve a book seen on a marketplace page to its bibliographic record
//! in a legacy WebOPAC library catalog, using only the identifier and/or
//! noisy title/author text scraped from that page.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (BibliographicRecord, BookQuery, SearchResult)
//! - [`extract`]: Identifier and title extraction from noisy page text
//! - [`parser`]: Catalog response parsing (detail and list page shapes)
//! - [`cascade`]: The multi-strategy search orchestrator
//! - [`catalog`]: Transport boundary to the catalog endpoint
//! - [`config`]: Configuration management
//! - [`utils`]: HTTP client, retry and display utilities
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use opac_resolver::catalog::WebOpacTransport;
//! use opac_resolver::config::Config;
//! use opac_resolver::{BookQuery, SearchCascade};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let transport = Arc::new(WebOpacTransport::new(&config));
//! let cascade = SearchCascade::new(transport, &config.catalog.site_id);
//!
//! let query = BookQuery::new()
//!     .identifier("9784297100339")
//!     .title("実践Rust入門");
//! let result = cascade.resolve(&query).await?;
//! println!("found: {} ({} records)", result.found, result.records.len());
//! # Ok(())
//! # }
//! ```

pub mod cascade;
pub mod catalog;
pub mod config;
pub mod extract;
pub mod models;
pub mod parser;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use cascade::SearchCascade;
pub use extract::QueryError;
pub use models::{BibliographicRecord, BookQuery, SearchMethod, SearchResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
