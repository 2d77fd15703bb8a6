//! Text extraction from noisy marketplace page content.
//!
//! Marketplace product pages carry the book identifier and title in wildly
//! inconsistent shapes (labeled detail rows, bare digit runs, titles padded
//! with subtitles, edition markers and storefront boilerplate). This module
//! turns that text into clean catalog queries:
//!
//! - [`extract_identifier`]: scan free text for a validated ISBN-13/ISBN-10
//! - [`normalize_title`]: strip storefront boilerplate for a full-title search
//! - [`main_title_and_author`]: isolate the main title and author surname
//!   token for the loosest keyword search

mod isbn;
mod title;

pub use isbn::extract_identifier;
pub use title::{main_title_and_author, normalize_title};

use thiserror::Error;

/// Query construction errors.
///
/// These are the only hard errors this crate raises to callers; everything
/// downstream of query construction degrades instead of failing.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum QueryError {
    /// Neither an identifier nor a title was supplied
    #[error("neither an identifier nor a title was supplied")]
    InvalidQuery,

    /// Normalization left no usable search text
    #[error("query normalization produced no usable text")]
    EmptyQuery,
}
