//! Bibliographic record model representing one catalog entry.

use serde::{Deserialize, Serialize};

/// Record identifiers carrying this prefix have a directly browsable
/// detail page on the catalog; anything else only resolves through search.
pub const BROWSE_ID_PREFIX: &str = "BB";

/// A single bibliographic record extracted from a catalog response.
///
/// Records are constructed exclusively by the response parser and are
/// immutable afterwards. Every field except `record_id`, `title`,
/// `raw_citation` and `ordinal` is optional because the legacy catalog
/// markup frequently omits them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BibliographicRecord {
    /// Opaque catalog identifier (e.g. "BB10482"), unique within a response
    pub record_id: String,

    /// Record title; records with an empty title are discarded by the parser
    pub title: String,

    /// Author statement, including any trailing role marker (著, 編, ...)
    pub author: Option<String>,

    /// Publisher name
    pub publisher: Option<String>,

    /// Four-digit publication year
    pub year: Option<String>,

    /// Edition statement (e.g. "第3版")
    pub edition: Option<String>,

    /// Series statement
    pub series: Option<String>,

    /// The unparsed source citation, retained for diagnostics
    pub raw_citation: String,

    /// 1-based display position as it appeared in the response
    pub ordinal: usize,
}

impl BibliographicRecord {
    /// Create a record with required fields only.
    pub fn new(record_id: impl Into<String>, title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            record_id: record_id.into(),
            raw_citation: title.clone(),
            title,
            author: None,
            publisher: None,
            year: None,
            edition: None,
            series: None,
            ordinal: 1,
        }
    }

    /// Browsable URL for this record on the given catalog site.
    ///
    /// IDs carrying the [`BROWSE_ID_PREFIX`] map to a stable detail-page
    /// URL; anything else falls back to the site's search landing page.
    pub fn browse_url(&self, host: &str, site_id: &str) -> String {
        if self.record_id.starts_with(BROWSE_ID_PREFIX) {
            format!(
                "https://{}/webopac{}/{}",
                host,
                site_id,
                urlencoding::encode(&self.record_id)
            )
        } else {
            format!("https://{}/webopac{}/", host, site_id)
        }
    }
}

/// Builder for constructing [`BibliographicRecord`] values.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    record: BibliographicRecord,
}

impl RecordBuilder {
    /// Create a new builder with the required fields.
    pub fn new(record_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            record: BibliographicRecord::new(record_id, title),
        }
    }

    /// Set the author statement.
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.record.author = Some(author.into());
        self
    }

    /// Set the publisher.
    pub fn publisher(mut self, publisher: impl Into<String>) -> Self {
        self.record.publisher = Some(publisher.into());
        self
    }

    /// Set the publication year.
    pub fn year(mut self, year: impl Into<String>) -> Self {
        self.record.year = Some(year.into());
        self
    }

    /// Set the edition statement.
    pub fn edition(mut self, edition: impl Into<String>) -> Self {
        self.record.edition = Some(edition.into());
        self
    }

    /// Set the series statement.
    pub fn series(mut self, series: impl Into<String>) -> Self {
        self.record.series = Some(series.into());
        self
    }

    /// Set the raw source citation.
    pub fn raw_citation(mut self, citation: impl Into<String>) -> Self {
        self.record.raw_citation = citation.into();
        self
    }

    /// Set the 1-based display position.
    pub fn ordinal(mut self, ordinal: usize) -> Self {
        self.record.ordinal = ordinal;
        self
    }

    /// Build the record.
    pub fn build(self) -> BibliographicRecord {
        self.record
    }
}
