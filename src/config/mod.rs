//! Configuration management.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Catalog endpoint settings
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,
}

/// Catalog endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Host of the catalog family (one host serves every site)
    #[serde(default = "default_host")]
    pub host: String,

    /// Default catalog site queried when the caller passes none
    #[serde(default = "default_site_id")]
    pub site_id: String,

    /// Result-list size requested per search
    #[serde(default = "default_list_count")]
    pub list_count: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            site_id: default_site_id(),
            list_count: default_list_count(),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Total request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

fn default_host() -> String {
    "libopac-c.kosen-k.go.jp".to_string()
}

fn default_site_id() -> String {
    "12".to_string()
}

fn default_list_count() -> usize {
    50
}

fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

/// Load configuration from a file, overlaid with `OPAC_RESOLVER_*`
/// environment variables.
pub fn load_config(path: &PathBuf) -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path.as_path()))
        .add_source(config::Environment::with_prefix("OPAC_RESOLVER").separator("__"))
        .build()?;

    settings.try_deserialize()
}

/// Get the default configuration.
pub fn get_config() -> Config {
    Config::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.catalog.host, "libopac-c.kosen-k.go.jp");
        assert_eq!(config.catalog.site_id, "12");
        assert_eq!(config.catalog.list_count, 50);
        assert_eq!(config.http.timeout_secs, 30);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str("[catalog]\nsite_id = \"03\"\n").unwrap();
        assert_eq!(config.catalog.site_id, "03");
        assert_eq!(config.catalog.host, "libopac-c.kosen-k.go.jp");
        assert_eq!(config.http.connect_timeout_secs, 10);
    }
}
