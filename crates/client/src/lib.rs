//! Client code for msgsearch.
//!
//! This crate provides the upstream messages API client and the refresh
//! machinery that keeps the shared dataset snapshot current: per-page retry,
//! the full pagination pipeline and the single-flight refresher.

pub mod refresh;
pub mod upstream;

pub use refresh::{PageOutcome, PipelineOptions, RefreshOptions, RefreshOutcome, Refresher, RetryPolicy};
pub use upstream::{ErrorClass, MessagesClient, PageFetcher, PageRequest, UpstreamConfig, UpstreamError};
