//! Upstream message record.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single message as returned by the upstream API.
///
/// The five well-known fields are typed; anything else the upstream sends is
/// kept verbatim in `extra` and written back out on serialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record {
    /// Known text fields in match order for search.
    pub fn searchable_fields(&self) -> impl Iterator<Item = &str> {
        [&self.message, &self.user_name, &self.user_id, &self.id, &self.timestamp]
            .into_iter()
            .filter_map(|field| field.as_deref())
    }
}
