//! Core types and shared functionality for msgsearch.
//!
//! This crate provides:
//! - The upstream `Record` model
//! - The in-memory dataset snapshot, its freshness policy and the store that publishes it
//! - Substring search over cached records
//! - Unified error types
//! - Configuration structures

pub mod config;
pub mod dataset;
pub mod error;
pub mod record;
pub mod search;

pub use config::{AppConfig, ConfigError};
pub use dataset::{DatasetSnapshot, DatasetStore, INCOMPLETE_FRESHNESS_WINDOW};
pub use error::Error;
pub use record::Record;
pub use search::search_records;
