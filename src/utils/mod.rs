//! Utility modules supporting catalog resolution.
//!
//! - [`HttpClient`]: HTTP client with timeouts and a shared connection pool
//! - [`RetryConfig`] / [`with_retry`]: retry-with-backoff for transient
//!   transport failures
//! - [`truncate_with_ellipsis`]: unicode-width-aware truncation for table
//!   rendering

mod display;
mod http;
mod retry;

pub use display::truncate_with_ellipsis;
pub use http::HttpClient;
pub use retry::{transport_retry_config, with_retry, RetryConfig};
