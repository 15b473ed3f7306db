//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;
use url::Url;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `upstream_api_url` is set but is not an http(s) URL
    /// - `cache_ttl_seconds` is 0
    /// - `upstream_timeout_seconds` is not a positive, finite number
    /// - `bootstrap_limit` is 0
    /// - `request_timeout` is 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(raw) = &self.upstream_api_url {
            let url = Url::parse(raw).map_err(|e| ConfigError::Invalid {
                field: "upstream_api_url".into(),
                reason: format!("not a valid URL: {e}"),
            })?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(ConfigError::Invalid {
                    field: "upstream_api_url".into(),
                    reason: format!("unsupported scheme '{}'", url.scheme()),
                });
            }
        }

        if self.cache_ttl_seconds == 0 {
            return Err(ConfigError::Invalid { field: "cache_ttl_seconds".into(), reason: "must be greater than 0".into() });
        }

        if !self.upstream_timeout_seconds.is_finite() || self.upstream_timeout_seconds <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "upstream_timeout_seconds".into(),
                reason: "must be a positive number of seconds".into(),
            });
        }

        if self.bootstrap_limit == 0 {
            return Err(ConfigError::Invalid { field: "bootstrap_limit".into(), reason: "must be greater than 0".into() });
        }

        if self.request_timeout == 0 {
            return Err(ConfigError::Invalid { field: "request_timeout".into(), reason: "must be greater than 0".into() });
        }

        if let Some(pages) = self.bootstrap_max_pages
            && pages <= 0
        {
            tracing::warn!(bootstrap_max_pages = pages, "bootstrap_max_pages is not positive; pagination is unbounded");
        }

        Ok(())
    }
}
