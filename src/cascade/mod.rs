//! Multi-strategy search resolution.
//!
//! The cascade tries progressively looser queries, strictly in order:
//! identifier lookup first, then the full normalized title, then the main
//! title with the author token. Each later strategy only runs after the
//! previous, more precise one has conclusively failed, so the strategies
//! never race. A transport failure on one strategy is recorded and the
//! cascade moves on; running out of strategies is a normal "not found"
//! outcome, not an error.

use std::sync::Arc;

use crate::catalog::{CatalogTransport, QueryKind};
use crate::extract::{main_title_and_author, normalize_title, QueryError};
use crate::models::{AttemptLog, BibliographicRecord, BookQuery, SearchMethod, SearchResult};
use crate::parser::parse_response;

/// Records and reported total of one successful attempt.
struct AttemptHit {
    records: Vec<BibliographicRecord>,
    reported_total: usize,
}

/// Orchestrates transport calls for one catalog site.
///
/// Each [`resolve`](SearchCascade::resolve) call is independent and holds
/// no state between invocations; dropping the returned future cancels the
/// in-flight transport call without publishing partial results.
#[derive(Debug, Clone)]
pub struct SearchCascade {
    transport: Arc<dyn CatalogTransport>,
    site_id: String,
}

impl SearchCascade {
    /// Create a cascade over a transport, bound to one catalog site.
    pub fn new(transport: Arc<dyn CatalogTransport>, site_id: impl Into<String>) -> Self {
        Self {
            transport,
            site_id: site_id.into(),
        }
    }

    /// The catalog site this cascade queries.
    pub fn site_id(&self) -> &str {
        &self.site_id
    }

    /// Resolve a book query against the catalog.
    ///
    /// Fails fast with [`QueryError::InvalidQuery`] when neither an
    /// identifier nor a title is supplied, and with
    /// [`QueryError::EmptyQuery`] when title normalization leaves nothing
    /// to search on. Every other failure mode degrades into the attempt
    /// log of the returned [`SearchResult`].
    pub async fn resolve(&self, query: &BookQuery) -> Result<SearchResult, QueryError> {
        if !query.has_searchable_input() {
            return Err(QueryError::InvalidQuery);
        }

        let mut attempts = Vec::new();

        if let Some(identifier) = trimmed(&query.identifier) {
            if let Some(hit) = self
                .attempt(SearchMethod::Isbn, QueryKind::Isbn, identifier, &mut attempts)
                .await
            {
                return Ok(SearchResult::found(
                    SearchMethod::Isbn,
                    hit.records,
                    hit.reported_total,
                    attempts,
                ));
            }
        }

        if let Some(title) = trimmed(&query.title) {
            let full_title = normalize_title(title)?;
            if let Some(hit) = self
                .attempt(
                    SearchMethod::FullTitle,
                    QueryKind::Keyword,
                    &full_title,
                    &mut attempts,
                )
                .await
            {
                return Ok(SearchResult::found(
                    SearchMethod::FullTitle,
                    hit.records,
                    hit.reported_total,
                    attempts,
                ));
            }

            let loose = main_title_and_author(title, query.author.as_deref())?;
            if let Some(hit) = self
                .attempt(
                    SearchMethod::TitleAndAuthor,
                    QueryKind::Keyword,
                    &loose,
                    &mut attempts,
                )
                .await
            {
                return Ok(SearchResult::found(
                    SearchMethod::TitleAndAuthor,
                    hit.records,
                    hit.reported_total,
                    attempts,
                ));
            }
        }

        tracing::info!(
            site_id = %self.site_id,
            attempts = attempts.len(),
            "no strategy produced records"
        );
        Ok(SearchResult::not_found(attempts))
    }

    /// Run one strategy: call the transport, parse, and log the attempt.
    ///
    /// Returns `Some` only when the attempt produced records. Transport
    /// failures are swallowed into the attempt log so the caller falls
    /// through to the next strategy.
    async fn attempt(
        &self,
        method: SearchMethod,
        kind: QueryKind,
        query: &str,
        attempts: &mut Vec<AttemptLog>,
    ) -> Option<AttemptHit> {
        tracing::info!(%method, query, site_id = %self.site_id, "attempting catalog search");

        match self.transport.search(kind, query, &self.site_id).await {
            Ok(body) => {
                let page = parse_response(&body);
                let count = page.records.len();
                tracing::debug!(%method, records = count, total = page.total_count, "attempt parsed");
                attempts.push(AttemptLog::parsed(method, query, count));
                if count > 0 {
                    Some(AttemptHit {
                        records: page.records,
                        reported_total: page.total_count,
                    })
                } else {
                    None
                }
            }
            Err(err) => {
                tracing::warn!(%method, query, error = %err, "attempt failed at transport");
                attempts.push(AttemptLog::failed(method, query, err.to_string()));
                None
            }
        }
    }
}

fn trimmed(field: &Option<String>) -> Option<&str> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
