//! Messages API response types.

use msgsearch_core::Record;
use serde::Deserialize;

/// Raw body of `GET /messages`.
///
/// Extra top-level keys (totals, cursors) are ignored. A missing or null
/// `items` is treated the same as an empty page.
#[derive(Debug, Deserialize)]
pub struct MessagesPage {
    #[serde(default)]
    pub items: Option<Vec<Record>>,
}

impl MessagesPage {
    pub fn into_records(self) -> Vec<Record> {
        self.items.unwrap_or_default()
    }
}
