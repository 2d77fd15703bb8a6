//! Mock transport for testing purposes.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::catalog::{CatalogTransport, QueryKind, TransportError};

/// A mock transport that replays scripted responses per query kind.
///
/// Responses are consumed in the order pushed; when a queue runs dry the
/// mock answers with an empty body, which parses as an empty list page.
/// Every call is recorded for assertions.
#[derive(Debug, Default)]
pub struct MockTransport {
    isbn_responses: Mutex<VecDeque<Result<String, TransportError>>>,
    keyword_responses: Mutex<VecDeque<Result<String, TransportError>>>,
    calls: Mutex<Vec<(QueryKind, String, String)>>,
}

impl MockTransport {
    /// Create a mock with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response body for the given query kind.
    pub fn push_response(&self, kind: QueryKind, body: impl Into<String>) {
        self.queue(kind).lock().unwrap().push_back(Ok(body.into()));
    }

    /// Queue a transport failure for the given query kind.
    pub fn push_error(&self, kind: QueryKind, error: TransportError) {
        self.queue(kind).lock().unwrap().push_back(Err(error));
    }

    /// Every `(kind, query, site_id)` triple seen so far, in call order.
    pub fn calls(&self) -> Vec<(QueryKind, String, String)> {
        self.calls.lock().unwrap().clone()
    }

    fn queue(&self, kind: QueryKind) -> &Mutex<VecDeque<Result<String, TransportError>>> {
        match kind {
            QueryKind::Isbn => &self.isbn_responses,
            QueryKind::Keyword => &self.keyword_responses,
        }
    }
}

#[async_trait]
impl CatalogTransport for MockTransport {
    async fn search(
        &self,
        kind: QueryKind,
        value: &str,
        site_id: &str,
    ) -> Result<String, TransportError> {
        self.calls
            .lock()
            .unwrap()
            .push((kind, value.to_string(), site_id.to_string()));

        match self.queue(kind).lock().unwrap().pop_front() {
            Some(response) => response,
            None => Ok(String::new()),
        }
    }
}
