//! Production transport for the WebOPAC catalog family.
//!
//! The catalog exposes no API; searches go through the same form POST the
//! search page itself submits. The endpoint lives under a per-site path
//! (`/webopac<site>/ctlsrh.do`) and distinguishes identifier lookups
//! (advanced-search `isbn_issn` field) from keyword searches (`words`
//! field). It also expects a referer from its own search tab and rejects
//! clients without a browser-like user agent.

use std::time::Duration;

use async_trait::async_trait;

use crate::catalog::{CatalogTransport, QueryKind, TransportError};
use crate::config::Config;
use crate::utils::{transport_retry_config, with_retry, HttpClient};

/// The endpoint only answers requests that look like a browser session.
const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";

/// Search servlet path under the per-site prefix.
const SEARCH_PATH: &str = "ctlsrh.do";

/// Referer path the endpoint expects, also under the per-site prefix.
const REFERER_PATH: &str = "cattab.do";

/// Transport that POSTs the legacy WebOPAC search endpoint.
#[derive(Debug, Clone)]
pub struct WebOpacTransport {
    client: HttpClient,
    base_url: String,
    list_count: usize,
}

impl WebOpacTransport {
    /// Create a transport from configuration.
    pub fn new(config: &Config) -> Self {
        let host = &config.catalog.host;
        let base_url = if host.contains("://") {
            host.trim_end_matches('/').to_string()
        } else {
            format!("https://{}", host)
        };
        Self {
            client: HttpClient::builder(
                BROWSER_USER_AGENT,
                Duration::from_secs(config.http.timeout_secs),
                Duration::from_secs(config.http.connect_timeout_secs),
            ),
            base_url,
            list_count: config.catalog.list_count,
        }
    }

    /// Create a transport against an explicit base URL (scheme included).
    /// Used by tests pointing at a local mock server.
    pub fn with_base_url(base_url: impl Into<String>, list_count: usize) -> Self {
        Self {
            client: HttpClient::with_user_agent(BROWSER_USER_AGENT),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            list_count,
        }
    }

    fn search_url(&self, site_id: &str) -> String {
        format!("{}/webopac{}/{}", self.base_url, site_id, SEARCH_PATH)
    }

    fn referer(&self, site_id: &str) -> String {
        format!("{}/webopac{}/{}", self.base_url, site_id, REFERER_PATH)
    }

    /// Form parameters for one search, mirroring the search page's own POST.
    fn form_params(&self, kind: QueryKind, value: &str, site_id: &str) -> Vec<(String, String)> {
        let list_count = self.list_count.to_string();
        match kind {
            QueryKind::Isbn => vec![
                ("isbn_issn".into(), value.into()),
                ("search_mode".into(), "advanced".into()),
                ("listcnt".into(), list_count),
                ("startpos".into(), String::new()),
                ("fromDsp".into(), "catsre".into()),
                ("sortkey".into(), String::new()),
                ("sorttype".into(), String::new()),
            ],
            QueryKind::Keyword => vec![
                ("words".into(), value.into()),
                ("holar".into(), site_id.into()),
                ("formkeyno".into(), String::new()),
                ("sortkey".into(), String::new()),
                ("sorttype".into(), String::new()),
                ("listcnt".into(), list_count),
                ("startpos".into(), String::new()),
                ("fromDsp".into(), "catsre".into()),
                ("srhRevTagFlg".into(), String::new()),
            ],
        }
    }
}

#[async_trait]
impl CatalogTransport for WebOpacTransport {
    async fn search(
        &self,
        kind: QueryKind,
        value: &str,
        site_id: &str,
    ) -> Result<String, TransportError> {
        let url = self.search_url(site_id);
        let referer = self.referer(site_id);
        let params = self.form_params(kind, value, site_id);

        tracing::debug!(%kind, site_id, query = value, "posting catalog search");

        let body = with_retry(transport_retry_config(), || {
            let client = self.client.clone();
            let url = url.clone();
            let referer = referer.clone();
            let params = params.clone();
            async move {
                let response = client
                    .client()
                    .post(&url)
                    .form(&params)
                    .header("Referer", referer)
                    .header(
                        "Accept",
                        "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
                    )
                    .header("Accept-Language", "ja,en-US;q=0.7,en;q=0.3")
                    .send()
                    .await
                    .map_err(|e| TransportError::Network(format!("catalog request failed: {}", e)))?;

                let status = response.status();
                if !status.is_success() {
                    return Err(TransportError::Status {
                        code: status.as_u16(),
                        message: status
                            .canonical_reason()
                            .unwrap_or("unknown status")
                            .to_string(),
                    });
                }

                response
                    .text()
                    .await
                    .map_err(|e| TransportError::Network(format!("failed to read response: {}", e)))
            }
        })
        .await?;

        tracing::debug!(%kind, bytes = body.len(), "catalog search answered");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport() -> WebOpacTransport {
        WebOpacTransport::new(&Config::default())
    }

    #[test]
    fn test_search_url_per_site() {
        let t = transport();
        assert_eq!(
            t.search_url("12"),
            "https://libopac-c.kosen-k.go.jp/webopac12/ctlsrh.do"
        );
        assert_eq!(
            t.search_url("03"),
            "https://libopac-c.kosen-k.go.jp/webopac03/ctlsrh.do"
        );
    }

    #[test]
    fn test_base_url_keeps_explicit_scheme() {
        let t = WebOpacTransport::with_base_url("http://127.0.0.1:8080/", 50);
        assert_eq!(t.search_url("12"), "http://127.0.0.1:8080/webopac12/ctlsrh.do");
    }

    #[test]
    fn test_isbn_params_use_advanced_search_field() {
        let t = transport();
        let params = t.form_params(QueryKind::Isbn, "9784000000000", "12");
        assert!(params.contains(&("isbn_issn".into(), "9784000000000".into())));
        assert!(params.contains(&("search_mode".into(), "advanced".into())));
        assert!(!params.iter().any(|(k, _)| k == "words"));
    }

    #[test]
    fn test_keyword_params_carry_site_holdings_filter() {
        let t = transport();
        let params = t.form_params(QueryKind::Keyword, "データ構造", "12");
        assert!(params.contains(&("words".into(), "データ構造".into())));
        assert!(params.contains(&("holar".into(), "12".into())));
    }
}
