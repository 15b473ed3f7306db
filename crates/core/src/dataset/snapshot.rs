use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

use crate::Record;

/// Freshness window applied after a refresh that skipped pages.
///
/// Shorter than any sensible TTL so a degraded dataset is retried soon.
pub const INCOMPLETE_FRESHNESS_WINDOW: Duration = Duration::from_secs(300);

/// The records from one completed refresh, plus when and how well it went.
#[derive(Debug, Clone)]
pub struct DatasetSnapshot {
    records: Vec<Record>,
    refreshed_at: DateTime<Utc>,
    fetch_incomplete: bool,
}

impl Default for DatasetSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

impl DatasetSnapshot {
    /// The snapshot a process starts with: no records, refreshed at the Unix epoch.
    pub fn empty() -> Self {
        Self { records: Vec::new(), refreshed_at: DateTime::<Utc>::UNIX_EPOCH, fetch_incomplete: false }
    }

    pub fn new(records: Vec<Record>, refreshed_at: DateTime<Utc>, fetch_incomplete: bool) -> Self {
        Self { records, refreshed_at, fetch_incomplete }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn refreshed_at(&self) -> DateTime<Utc> {
        self.refreshed_at
    }

    /// `refreshed_at` as fractional seconds since the Unix epoch; 0.0 before the first refresh.
    pub fn refreshed_at_epoch_secs(&self) -> f64 {
        self.refreshed_at.timestamp_micros() as f64 / 1_000_000.0
    }

    /// True if the refresh that produced this snapshot skipped one or more pages.
    pub fn fetch_incomplete(&self) -> bool {
        self.fetch_incomplete
    }

    /// How long this snapshot may be served before a refresh is due.
    pub fn freshness_window(&self, ttl: Duration) -> Duration {
        if self.fetch_incomplete { INCOMPLETE_FRESHNESS_WINDOW } else { ttl }
    }

    /// Whether this snapshot may be served without refreshing, as of now.
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.is_fresh_at(ttl, Utc::now())
    }

    /// Whether this snapshot may be served without refreshing, as of `now`.
    ///
    /// An empty snapshot is never fresh.
    pub fn is_fresh_at(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        if self.records.is_empty() {
            return false;
        }

        let Ok(window) = TimeDelta::from_std(self.freshness_window(ttl)) else {
            return true;
        };

        now.signed_duration_since(self.refreshed_at) < window
    }
}
