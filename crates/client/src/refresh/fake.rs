//! Scripted in-memory upstream for refresh tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use msgsearch_core::Record;

use crate::upstream::{PageFetcher, PageRequest, UpstreamError};

/// Per-page failure behavior.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Script {
    /// Answer with HTTP 500 for the first `n` calls.
    FailTimes(usize),
    /// Time out for the first `n` calls.
    TimeoutTimes(usize),
    /// Answer with HTTP 500 forever.
    AlwaysFail,
    /// Return a malformed body.
    Fatal,
}

pub(crate) fn records(prefix: &str, n: usize) -> Vec<Record> {
    (0..n)
        .map(|i| Record {
            id: Some(format!("{prefix}-{i}")),
            message: Some(format!("message {i} from {prefix}")),
            ..Default::default()
        })
        .collect()
}

/// Serves `pages[i]` for `skip = i * limit`; past the end it serves empty pages.
pub(crate) struct FakeUpstream {
    pages: Vec<Vec<Record>>,
    scripts: HashMap<usize, Script>,
    calls: Mutex<HashMap<usize, usize>>,
    total_calls: AtomicUsize,
    delay: Duration,
}

impl FakeUpstream {
    pub(crate) fn new(pages: Vec<Vec<Record>>) -> Self {
        Self {
            pages,
            scripts: HashMap::new(),
            calls: Mutex::new(HashMap::new()),
            total_calls: AtomicUsize::new(0),
            delay: Duration::ZERO,
        }
    }

    pub(crate) fn with_script(mut self, page_index: usize, script: Script) -> Self {
        self.scripts.insert(page_index, script);
        self
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) fn calls_for_page(&self, page_index: usize) -> usize {
        self.calls.lock().unwrap().get(&page_index).copied().unwrap_or(0)
    }

    pub(crate) fn total_calls(&self) -> usize {
        self.total_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher for FakeUpstream {
    async fn fetch_page(&self, request: PageRequest) -> Result<Vec<Record>, UpstreamError> {
        self.total_calls.fetch_add(1, Ordering::SeqCst);
        let index = request.skip / request.limit;
        let previous_calls = {
            let mut calls = self.calls.lock().unwrap();
            let count = calls.entry(index).or_insert(0);
            *count += 1;
            *count - 1
        };

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match self.scripts.get(&index) {
            Some(Script::FailTimes(n)) if previous_calls < *n => Err(UpstreamError::HttpStatus { status: 500 }),
            Some(Script::TimeoutTimes(n)) if previous_calls < *n => Err(UpstreamError::Timeout),
            Some(Script::AlwaysFail) => Err(UpstreamError::HttpStatus { status: 500 }),
            Some(Script::Fatal) => Err(UpstreamError::Parse("expected value at line 1 column 1".into())),
            _ => Ok(self.pages.get(index).cloned().unwrap_or_default()),
        }
    }
}
