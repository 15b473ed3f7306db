//! Case-insensitive substring search over cached records.
//!
//! A linear scan; the dataset is small enough to hold in memory so it is
//! small enough to scan per request.

use crate::Record;

/// Return every record with a known text field containing `query`.
///
/// The query is trimmed and compared case-insensitively. A blank query
/// matches nothing. Hits keep the order of `records`.
pub fn search_records<'a>(records: &'a [Record], query: &str) -> Vec<&'a Record> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    records
        .iter()
        .filter(|record| record.searchable_fields().any(|field| field.to_lowercase().contains(&needle)))
        .collect()
}
