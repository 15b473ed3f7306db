//! Bounded per-page retry with linear backoff.

use std::time::Duration;

use msgsearch_core::Record;

use crate::upstream::{ErrorClass, PageFetcher, PageRequest, UpstreamError};

/// Additional attempts after the first failure of a page.
pub const DEFAULT_MAX_RETRIES: u32 = 10;

const DEFAULT_BACKOFF_STEP: Duration = Duration::from_secs(2);
const DEFAULT_BACKOFF_CAP: Duration = Duration::from_secs(10);

/// Result of fetching one page under a [`RetryPolicy`].
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    /// The page answered; an empty vector is the end of the dataset.
    Fetched(Vec<Record>),
    /// Every attempt hit a retryable error. The caller moves past the page.
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    backoff_step: Duration,
    backoff_cap: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_retries: DEFAULT_MAX_RETRIES, backoff_step: DEFAULT_BACKOFF_STEP, backoff_cap: DEFAULT_BACKOFF_CAP }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff_step: Duration, backoff_cap: Duration) -> Self {
        Self { max_retries, backoff_step, backoff_cap }
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Delay before retry number `retry` (1-based): `min(retry * step, cap)`.
    pub fn backoff(&self, retry: u32) -> Duration {
        self.backoff_step.saturating_mul(retry).min(self.backoff_cap)
    }

    /// Fetch `request`, retrying retryable failures up to `max_retries` times.
    ///
    /// Returns `Ok(PageOutcome::Skipped)` once retries are exhausted. A fatal
    /// error is returned on first sight, without retrying.
    pub async fn fetch_page<F>(&self, fetcher: &F, request: PageRequest) -> Result<PageOutcome, UpstreamError>
    where
        F: PageFetcher + ?Sized,
    {
        let page = request.page_number();
        let mut retries = 0u32;

        loop {
            let err = match fetcher.fetch_page(request).await {
                Ok(records) => return Ok(PageOutcome::Fetched(records)),
                Err(err) => err,
            };

            if err.class() == ErrorClass::Fatal {
                tracing::error!(page, skip = request.skip, kind = err.kind(), error = %err, "unexpected upstream error");
                return Err(err);
            }

            retries += 1;
            if retries > self.max_retries {
                tracing::error!(
                    page,
                    skip = request.skip,
                    max_retries = self.max_retries,
                    error = %err,
                    "page failed after all retries, skipping"
                );
                return Ok(PageOutcome::Skipped);
            }

            let wait = self.backoff(retries);
            tracing::warn!(
                page,
                retry = retries,
                max_retries = self.max_retries,
                wait_secs = wait.as_secs_f64(),
                kind = err.kind(),
                error = %err,
                "upstream page failed, retrying"
            );
            tokio::time::sleep(wait).await;
        }
    }
}
