//! In-memory copy of the upstream dataset.
//!
//! A [`DatasetSnapshot`] is immutable once built. The [`DatasetStore`] holds
//! the current one behind an `Arc` and replaces it whole, so readers see
//! either the previous dataset or the next one, never a mix.

mod snapshot;
mod store;

pub use snapshot::{DatasetSnapshot, INCOMPLETE_FRESHNESS_WINDOW};
pub use store::DatasetStore;
