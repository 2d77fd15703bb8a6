//! Catalog transport boundary.
//!
//! This module defines the [`CatalogTransport`] trait that separates the
//! resolution engine from the network. The production implementation
//! ([`WebOpacTransport`]) speaks the legacy WebOPAC search endpoint; tests
//! swap in [`mock::MockTransport`]. The transport returns the raw response
//! body as a single string; all page-shape variance is resolved by the
//! parser, never at this boundary.

mod webopac;

pub mod mock;

pub use webopac::WebOpacTransport;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The kind of query a transport call performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryKind {
    /// Identifier lookup through the advanced-search ISBN field
    Isbn,
    /// Free keyword search
    Keyword,
}

impl QueryKind {
    /// Stable identifier for logs.
    pub fn id(&self) -> &'static str {
        match self {
            QueryKind::Isbn => "isbn",
            QueryKind::Keyword => "keyword",
        }
    }
}

impl std::fmt::Display for QueryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Errors raised at the transport boundary.
///
/// The cascade catches these per attempt and proceeds to the next
/// strategy; they only surface to users through the attempt log.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The catalog answered with a non-success HTTP status
    #[error("catalog returned status {code}: {message}")]
    Status { code: u16, message: String },

    /// Connection, timeout or other network-level failure
    #[error("network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        TransportError::Network(err.to_string())
    }
}

/// A capability that executes one catalog search and returns the raw
/// response body.
///
/// Implementations own every network concern (timeouts, retries,
/// compression); callers only interpret success or failure. `site_id`
/// selects which catalog instance of the family is queried.
#[async_trait]
pub trait CatalogTransport: Send + Sync + std::fmt::Debug {
    /// Execute one search and return the raw response body.
    async fn search(
        &self,
        kind: QueryKind,
        value: &str,
        site_id: &str,
    ) -> Result<String, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_kind_id() {
        assert_eq!(QueryKind::Isbn.id(), "isbn");
        assert_eq!(QueryKind::Keyword.id(), "keyword");
    }

    #[test]
    fn test_transport_error_display() {
        let err = TransportError::Status {
            code: 503,
            message: "Service Unavailable".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "catalog returned status 503: Service Unavailable"
        );
    }
}
