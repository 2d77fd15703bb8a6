//! HTTP client utilities.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

/// Shared HTTP client with sensible defaults.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Arc<Client>,
}

impl HttpClient {
    /// Create a new HTTP client identifying as this crate.
    pub fn new() -> Self {
        Self::with_user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
    }

    /// Create a new HTTP client with a custom user agent.
    pub fn with_user_agent(user_agent: &str) -> Self {
        Self::builder(user_agent, Duration::from_secs(30), Duration::from_secs(10))
    }

    /// Create a new HTTP client with explicit timeouts.
    pub fn builder(user_agent: &str, timeout: Duration, connect_timeout: Duration) -> Self {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .expect("reqwest client construction only fails on invalid TLS backends");

        Self {
            client: Arc::new(client),
        }
    }

    /// Get the underlying client.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}
