//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (MSGSEARCH_*)
//! 2. TOML config file (if MSGSEARCH_CONFIG_FILE set)
//! 3. Built-in defaults

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (MSGSEARCH_*)
/// 2. TOML config file (if MSGSEARCH_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the upstream messages API.
    ///
    /// Set via MSGSEARCH_UPSTREAM_API_URL environment variable. Required.
    #[serde(default)]
    pub upstream_api_url: Option<String>,

    /// Normal freshness window for the cached dataset, in seconds.
    ///
    /// Set via MSGSEARCH_CACHE_TTL_SECONDS environment variable.
    #[serde(default = "default_cache_ttl_seconds")]
    pub cache_ttl_seconds: u64,

    /// Address the HTTP server binds to.
    ///
    /// Set via MSGSEARCH_HOST environment variable.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port the HTTP server listens on.
    ///
    /// Set via MSGSEARCH_PORT environment variable.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Timeout for a whole inbound request, in seconds.
    ///
    /// Set via MSGSEARCH_REQUEST_TIMEOUT environment variable.
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Timeout for each upstream page request, in seconds.
    ///
    /// Set via MSGSEARCH_UPSTREAM_TIMEOUT_SECONDS environment variable.
    #[serde(default = "default_upstream_timeout_seconds")]
    pub upstream_timeout_seconds: f64,

    /// Page width used when paginating the upstream dataset.
    ///
    /// Set via MSGSEARCH_BOOTSTRAP_LIMIT environment variable.
    #[serde(default = "default_bootstrap_limit")]
    pub bootstrap_limit: usize,

    /// Cap on pages fetched per refresh. Unset, zero or negative means unbounded.
    ///
    /// Set via MSGSEARCH_BOOTSTRAP_MAX_PAGES environment variable.
    #[serde(default)]
    pub bootstrap_max_pages: Option<i64>,
}

fn default_cache_ttl_seconds() -> u64 {
    3600
}

fn default_host() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    8000
}

fn default_request_timeout() -> u64 {
    30
}

fn default_upstream_timeout_seconds() -> f64 {
    10.0
}

fn default_bootstrap_limit() -> usize {
    200
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            upstream_api_url: None,
            cache_ttl_seconds: default_cache_ttl_seconds(),
            host: default_host(),
            port: default_port(),
            request_timeout: default_request_timeout(),
            upstream_timeout_seconds: default_upstream_timeout_seconds(),
            bootstrap_limit: default_bootstrap_limit(),
            bootstrap_max_pages: None,
        }
    }
}

impl AppConfig {
    /// Freshness window as Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    /// Upstream page timeout as Duration for use with reqwest.
    ///
    /// Non-finite or negative values fall back to the default; `validate` rejects them anyway.
    pub fn upstream_timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.upstream_timeout_seconds)
            .unwrap_or_else(|_| Duration::from_secs_f64(default_upstream_timeout_seconds()))
    }

    /// Inbound request timeout as Duration for use with tower-http.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Page cap for one refresh, with non-positive values normalized to unbounded.
    pub fn max_pages(&self) -> Option<usize> {
        self.bootstrap_max_pages
            .filter(|pages| *pages > 0)
            .and_then(|pages| usize::try_from(pages).ok())
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `MSGSEARCH_`
    /// 2. TOML file from `MSGSEARCH_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    /// - `upstream_api_url` is not set
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("MSGSEARCH_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("MSGSEARCH_")
                .ignore(&["config_file"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;
        config.require_upstream_api_url()?;

        Ok(config)
    }

    /// Upstream base URL, or `ConfigError::Missing` when it was never configured.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the upstream API URL is not set.
    pub fn require_upstream_api_url(&self) -> Result<&str, ConfigError> {
        self.upstream_api_url.as_deref().ok_or_else(|| ConfigError::Missing {
            field: "upstream_api_url".into(),
            hint: "Set MSGSEARCH_UPSTREAM_API_URL environment variable".into(),
        })
    }
}
