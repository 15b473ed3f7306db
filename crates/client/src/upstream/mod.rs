//! Upstream messages API client.
//!
//! ### Endpoint
//!
//! - `GET {base_url}/messages?skip={skip}&limit={limit}`
//! - Body: JSON object with an `items` array of message records.
//! - A missing or empty `items` array marks the end of the dataset.
//!
//! ### Failure classification
//!
//! - non-2xx status, timeout, transport failure: retryable.
//! - Anything else (malformed body, bad URL, client setup): fatal.

pub mod error;
pub mod request;
pub mod response;

pub use error::{ErrorClass, UpstreamError};
pub use request::PageRequest;
pub use response::MessagesPage;

use async_trait::async_trait;
use msgsearch_core::{AppConfig, Record};
use reqwest::header;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Default upstream request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = concat!("msgsearch/", env!("CARGO_PKG_VERSION"));

/// Source of upstream record pages.
///
/// Implemented over HTTP by [`MessagesClient`]; the refresh pipeline only
/// depends on this trait.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch one page. An empty vector means the dataset is exhausted.
    async fn fetch_page(&self, request: PageRequest) -> Result<Vec<Record>, UpstreamError>;
}

#[async_trait]
impl<T: PageFetcher + ?Sized> PageFetcher for Arc<T> {
    async fn fetch_page(&self, request: PageRequest) -> Result<Vec<Record>, UpstreamError> {
        (**self).fetch_page(request).await
    }
}

/// Messages API client configuration.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Base URL; `/messages` is appended.
    pub base_url: String,
    /// Per-request timeout (default: 10s).
    pub timeout: Duration,
    /// User-agent string (default: msgsearch/<version>).
    pub user_agent: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self { base_url: String::new(), timeout: DEFAULT_TIMEOUT, user_agent: DEFAULT_USER_AGENT.to_string() }
    }
}

impl UpstreamConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), ..Default::default() }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build from application configuration.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, UpstreamError> {
        let base_url =
            config.require_upstream_api_url().map_err(|e| UpstreamError::InvalidUrl(e.to_string()))?;
        Ok(Self::new(base_url).with_timeout(config.upstream_timeout()))
    }

    /// Absolute URL of the messages endpoint.
    pub fn messages_url(&self) -> Result<Url, UpstreamError> {
        let base = self.base_url.trim().trim_end_matches('/');
        if base.is_empty() {
            return Err(UpstreamError::InvalidUrl("base URL is empty".into()));
        }
        Url::parse(&format!("{base}/messages")).map_err(|e| UpstreamError::InvalidUrl(format!("{base}: {e}")))
    }
}

/// HTTP client for the upstream messages API.
#[derive(Debug, Clone)]
pub struct MessagesClient {
    http: reqwest::Client,
    messages_url: Url,
}

impl MessagesClient {
    /// Create a new client with the given configuration.
    pub fn new(config: UpstreamConfig) -> Result<Self, UpstreamError> {
        let messages_url = config.messages_url()?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| UpstreamError::ClientBuild(e.to_string()))?;

        Ok(Self { http, messages_url })
    }

    pub fn messages_url(&self) -> &Url {
        &self.messages_url
    }
}

#[async_trait]
impl PageFetcher for MessagesClient {
    async fn fetch_page(&self, request: PageRequest) -> Result<Vec<Record>, UpstreamError> {
        let start = Instant::now();

        let response = self
            .http
            .get(self.messages_url.clone())
            .header(header::ACCEPT, "application/json")
            .query(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::HttpStatus { status: status.as_u16() });
        }

        let bytes = response.bytes().await?;
        let page: MessagesPage = serde_json::from_slice(&bytes).map_err(|e| UpstreamError::Parse(e.to_string()))?;
        let records = page.into_records();

        tracing::debug!(
            skip = request.skip,
            limit = request.limit,
            records = records.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "fetched upstream page"
        );

        Ok(records)
    }
}
