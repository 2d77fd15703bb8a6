//! Search input and outcome models.

use serde::{Deserialize, Serialize};

use crate::models::BibliographicRecord;

/// The search strategy used for one resolution attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMethod {
    /// Exact identifier lookup
    Isbn,
    /// Keyword search on the full (boilerplate-stripped) title
    FullTitle,
    /// Keyword search on the main title plus the author surname token
    TitleAndAuthor,
}

impl SearchMethod {
    /// Stable identifier for logs and serialized output.
    pub fn id(&self) -> &'static str {
        match self {
            SearchMethod::Isbn => "isbn",
            SearchMethod::FullTitle => "full_title",
            SearchMethod::TitleAndAuthor => "title_and_author",
        }
    }
}

impl std::fmt::Display for SearchMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Book lookup input scraped from a marketplace page.
///
/// At least one of `identifier` or `title` must be non-empty, otherwise
/// the cascade fails fast with an invalid-query error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookQuery {
    /// Validated ISBN-13 or ISBN-10 (separators already stripped)
    pub identifier: Option<String>,

    /// Raw title text as scraped, possibly with marketplace boilerplate
    pub title: Option<String>,

    /// Raw author text as scraped, possibly a placeholder
    pub author: Option<String>,
}

impl BookQuery {
    /// Create an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the identifier.
    pub fn identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Set the raw title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the raw author.
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Whether this query carries enough input to attempt any strategy.
    pub fn has_searchable_input(&self) -> bool {
        let filled = |field: &Option<String>| {
            field.as_deref().is_some_and(|s| !s.trim().is_empty())
        };
        filled(&self.identifier) || filled(&self.title)
    }
}

/// One cascade step, recorded in the order attempted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptLog {
    /// Strategy used for this attempt
    pub method: SearchMethod,

    /// Query string sent to the catalog
    pub query: String,

    /// Whether the attempt produced at least one record
    pub succeeded: bool,

    /// Transport failure detail, if the attempt never produced a response
    pub error_message: Option<String>,
}

impl AttemptLog {
    /// Record an attempt that received a response yielding `record_count` records.
    pub fn parsed(method: SearchMethod, query: impl Into<String>, record_count: usize) -> Self {
        Self {
            method,
            query: query.into(),
            succeeded: record_count > 0,
            error_message: None,
        }
    }

    /// Record an attempt that failed at the transport boundary.
    pub fn failed(method: SearchMethod, query: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            method,
            query: query.into(),
            succeeded: false,
            error_message: Some(error.into()),
        }
    }
}

/// Outcome of one full cascade resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Whether any strategy produced records
    pub found: bool,

    /// Records in display order (empty when `found` is false)
    pub records: Vec<BibliographicRecord>,

    /// Strategy that produced the records, `None` when all were exhausted
    pub method: Option<SearchMethod>,

    /// Catalog-reported total; always at least `records.len()` when present
    pub total_count: Option<usize>,

    /// Every attempt made, in order
    pub attempts: Vec<AttemptLog>,
}

impl SearchResult {
    /// Build a successful result from a non-empty record set.
    ///
    /// The catalog-reported total is clamped up to the number of records
    /// actually extracted, since the legacy page omits the counter on
    /// detail-page responses.
    pub fn found(
        method: SearchMethod,
        records: Vec<BibliographicRecord>,
        reported_total: usize,
        attempts: Vec<AttemptLog>,
    ) -> Self {
        debug_assert!(!records.is_empty());
        let total = reported_total.max(records.len());
        Self {
            found: true,
            method: Some(method),
            total_count: Some(total),
            records,
            attempts,
        }
    }

    /// Build the no-match result after exhausting every applicable strategy.
    pub fn not_found(attempts: Vec<AttemptLog>) -> Self {
        Self {
            found: false,
            records: Vec::new(),
            method: None,
            total_count: None,
            attempts,
        }
    }
}
