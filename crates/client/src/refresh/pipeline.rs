//! Full-dataset pagination loop.
//!
//! Walks the upstream with offset/limit windows until an empty page or the
//! page cap, collecting every record into a local buffer. Nothing is shared
//! until the caller publishes the finished [`RefreshOutcome`].

use msgsearch_core::Record;

use super::retry::{PageOutcome, RetryPolicy};
use crate::upstream::{PageFetcher, PageRequest, UpstreamError};

/// Pagination parameters for one full refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Records requested per page.
    pub page_size: usize,
    /// Stop after this many pages, skipped ones included. `None` means unbounded.
    pub max_pages: Option<usize>,
}

impl PipelineOptions {
    pub fn new(page_size: usize, max_pages: Option<usize>) -> Self {
        Self { page_size: page_size.max(1), max_pages: max_pages.filter(|pages| *pages > 0) }
    }
}

/// Everything one full refresh collected.
#[derive(Debug, Clone, Default)]
pub struct RefreshOutcome {
    pub records: Vec<Record>,
    /// True if any page was skipped after exhausting its retries.
    pub incomplete: bool,
    pub pages_fetched: usize,
    pub pages_skipped: usize,
}

/// Fetch the whole upstream dataset.
///
/// A fatal error returns `Err` and drops whatever was collected so far.
pub async fn run<F>(fetcher: &F, retry: &RetryPolicy, options: PipelineOptions) -> Result<RefreshOutcome, UpstreamError>
where
    F: PageFetcher + ?Sized,
{
    let mut outcome = RefreshOutcome::default();
    let mut request = PageRequest::new(0, options.page_size);

    loop {
        match retry.fetch_page(fetcher, request).await? {
            PageOutcome::Skipped => {
                outcome.incomplete = true;
                outcome.pages_skipped += 1;
            }
            PageOutcome::Fetched(records) if records.is_empty() => break,
            PageOutcome::Fetched(records) => {
                outcome.records.extend(records);
                outcome.pages_fetched += 1;
            }
        }

        let attempted = outcome.pages_fetched + outcome.pages_skipped;
        if options.max_pages.is_some_and(|max| attempted >= max) {
            tracing::debug!(pages = attempted, skipped = outcome.pages_skipped, "reached bootstrap page cap");
            break;
        }

        request = request.next();
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refresh::fake::{FakeUpstream, Script, records};
    use std::time::Duration;

    fn fast_retry() -> RetryPolicy {
        RetryPolicy::new(10, Duration::from_millis(1), Duration::from_millis(5))
    }

    #[test]
    fn test_options_normalization() {
        assert_eq!(PipelineOptions::new(0, Some(0)), PipelineOptions { page_size: 1, max_pages: None });
        assert_eq!(PipelineOptions::new(50, Some(4)).max_pages, Some(4));
    }

    #[tokio::test]
    async fn test_collects_until_empty_page() {
        let upstream = FakeUpstream::new(vec![records("p1", 2), records("p2", 2), records("p3", 1)]);

        let outcome = run(&upstream, &fast_retry(), PipelineOptions::new(2, None)).await.unwrap();

        assert_eq!(outcome.records.len(), 5);
        assert_eq!(outcome.pages_fetched, 3);
        assert!(!outcome.incomplete);
        // three data pages plus the empty terminator
        assert_eq!(upstream.total_calls(), 4);
        assert_eq!(outcome.records[0].id.as_deref(), Some("p1-0"));
        assert_eq!(outcome.records[4].id.as_deref(), Some("p3-0"));
    }

    #[tokio::test]
    async fn test_empty_upstream() {
        let upstream = FakeUpstream::new(Vec::new());
        let outcome = run(&upstream, &fast_retry(), PipelineOptions::new(200, None)).await.unwrap();
        assert!(outcome.records.is_empty());
        assert_eq!(upstream.total_calls(), 1);
    }

    #[tokio::test]
    async fn test_max_pages_bounds_fetch() {
        let pages: Vec<_> = (0..10).map(|i| records(&format!("p{i}"), 3)).collect();
        let upstream = FakeUpstream::new(pages);

        let outcome = run(&upstream, &fast_retry(), PipelineOptions::new(3, Some(4))).await.unwrap();

        assert_eq!(outcome.pages_fetched, 4);
        assert_eq!(outcome.records.len(), 12);
        assert_eq!(upstream.total_calls(), 4);
    }

    #[tokio::test]
    async fn test_skipped_page_marks_incomplete_and_continues() {
        let upstream = FakeUpstream::new(vec![records("p1", 2), records("p2", 2), records("p3", 2)])
            .with_script(1, Script::AlwaysFail);

        let outcome = run(&upstream, &fast_retry(), PipelineOptions::new(2, None)).await.unwrap();

        assert!(outcome.incomplete);
        assert_eq!(outcome.pages_skipped, 1);
        assert_eq!(outcome.pages_fetched, 2);
        let ids: Vec<_> = outcome.records.iter().map(|r| r.id.as_deref().unwrap()).collect();
        assert_eq!(ids, vec!["p1-0", "p1-1", "p3-0", "p3-1"]);
        assert_eq!(upstream.calls_for_page(1), 11);
    }

    #[tokio::test]
    async fn test_skipped_pages_count_toward_cap() {
        let upstream = FakeUpstream::new(vec![records("p1", 1), records("p2", 1), records("p3", 1)])
            .with_script(0, Script::AlwaysFail);

        let outcome = run(&upstream, &fast_retry(), PipelineOptions::new(1, Some(2))).await.unwrap();

        assert_eq!(outcome.pages_skipped, 1);
        assert_eq!(outcome.pages_fetched, 1);
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(upstream.calls_for_page(2), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cap_bounds_refresh_when_every_page_fails() {
        let pages: Vec<_> = (0..10).map(|i| records(&format!("p{i}"), 1)).collect();
        let mut upstream = FakeUpstream::new(pages);
        for page in 0..10 {
            upstream = upstream.with_script(page, Script::AlwaysFail);
        }

        let outcome = tokio::time::timeout(
            Duration::from_secs(3600),
            run(&upstream, &RetryPolicy::default(), PipelineOptions::new(1, Some(2))),
        )
        .await
        .expect("capped refresh should finish")
        .unwrap();

        assert!(outcome.incomplete);
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.pages_skipped, 2);
        assert_eq!(upstream.calls_for_page(0), 11);
        assert_eq!(upstream.calls_for_page(1), 11);
        assert_eq!(upstream.calls_for_page(2), 0);
        assert_eq!(upstream.total_calls(), 22);
    }

    #[tokio::test]
    async fn test_recovered_page_is_complete() {
        let upstream = FakeUpstream::new(vec![records("p1", 2), records("p2", 2)]).with_script(1, Script::FailTimes(3));

        let outcome = run(&upstream, &fast_retry(), PipelineOptions::new(2, None)).await.unwrap();

        assert!(!outcome.incomplete);
        assert_eq!(outcome.records.len(), 4);
    }

    #[tokio::test]
    async fn test_fatal_error_aborts_pipeline() {
        let upstream = FakeUpstream::new(vec![records("p1", 2), records("p2", 2), records("p3", 2)])
            .with_script(1, Script::Fatal);

        let result = run(&upstream, &fast_retry(), PipelineOptions::new(2, None)).await;

        assert!(matches!(result, Err(UpstreamError::Parse(_))));
        assert_eq!(upstream.calls_for_page(2), 0);
    }
}
