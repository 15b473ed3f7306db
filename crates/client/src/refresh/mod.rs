//! Single-flight dataset refresh.
//!
//! [`Refresher::refresh`] is the only writer of the shared [`DatasetStore`].
//!
//! - Fast path: a fresh snapshot is returned without taking any lock.
//! - Slow path: callers queue on one async mutex; each rechecks freshness
//!   after acquiring it, so a burst of stale readers triggers one fetch.
//! - `force` skips both freshness checks. Forced refreshes still serialize on
//!   the lock but are not merged: each one fetches.
//! - On success the new snapshot replaces the old one in a single publish; on
//!   a fatal error the store is left untouched.

#[cfg(test)]
pub(crate) mod fake;
pub mod pipeline;
pub mod retry;

pub use pipeline::{PipelineOptions, RefreshOutcome};
pub use retry::{DEFAULT_MAX_RETRIES, PageOutcome, RetryPolicy};

use chrono::Utc;
use msgsearch_core::{AppConfig, DatasetSnapshot, DatasetStore};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::upstream::{MessagesClient, PageFetcher, UpstreamError};

/// Freshness and pagination settings for a [`Refresher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshOptions {
    /// Normal freshness window.
    pub ttl: Duration,
    pub pipeline: PipelineOptions,
}

impl RefreshOptions {
    pub fn new(ttl: Duration, page_size: usize, max_pages: Option<usize>) -> Self {
        Self { ttl, pipeline: PipelineOptions::new(page_size, max_pages) }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.cache_ttl(), config.bootstrap_limit, config.max_pages())
    }
}

/// Keeps a [`DatasetStore`] populated from an upstream [`PageFetcher`].
pub struct Refresher<F = MessagesClient> {
    store: DatasetStore,
    fetcher: F,
    retry: RetryPolicy,
    options: RefreshOptions,
    lock: Mutex<()>,
}

impl<F: PageFetcher> Refresher<F> {
    pub fn new(store: DatasetStore, fetcher: F, options: RefreshOptions) -> Self {
        Self { store, fetcher, retry: RetryPolicy::default(), options, lock: Mutex::new(()) }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn store(&self) -> &DatasetStore {
        &self.store
    }

    /// Whether the current snapshot may be served without refreshing.
    pub fn is_fresh(&self) -> bool {
        self.store.is_fresh(self.options.ttl)
    }

    /// Return a snapshot fresh enough to serve, refreshing from upstream if needed.
    ///
    /// # Errors
    ///
    /// Returns the fatal [`UpstreamError`] that aborted the refresh. The
    /// previously published snapshot stays in the store.
    pub async fn refresh(&self, force: bool) -> Result<Arc<DatasetSnapshot>, UpstreamError> {
        if !force {
            let current = self.store.snapshot();
            if current.is_fresh(self.options.ttl) {
                tracing::debug!(records = current.len(), "dataset is fresh, using cached data");
                return Ok(current);
            }
        }

        let _guard = self.lock.lock().await;

        if !force {
            let current = self.store.snapshot();
            if current.is_fresh(self.options.ttl) {
                tracing::debug!(records = current.len(), "dataset refreshed while waiting, using cached data");
                return Ok(current);
            }
        }

        tracing::info!(force, page_size = self.options.pipeline.page_size, "fetching messages from upstream");
        let start = Instant::now();

        let outcome = pipeline::run(&self.fetcher, &self.retry, self.options.pipeline).await.inspect_err(|err| {
            tracing::error!(error = %err, "refresh aborted, keeping previous dataset");
        })?;

        let snapshot = DatasetSnapshot::new(outcome.records, Utc::now(), outcome.incomplete);
        let published = self.store.publish(snapshot);

        if outcome.incomplete {
            tracing::warn!(
                records = published.len(),
                pages = outcome.pages_fetched,
                skipped = outcome.pages_skipped,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "loaded messages from upstream (incomplete, will retry in 5 min)"
            );
        } else {
            tracing::info!(
                records = published.len(),
                pages = outcome.pages_fetched,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "loaded messages from upstream"
            );
        }

        Ok(published)
    }
}
