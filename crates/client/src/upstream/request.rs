//! Messages API request parameters.

use serde::Serialize;

/// One offset/limit window over the upstream dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    /// Number of records to skip.
    pub skip: usize,
    /// Maximum number of records to return.
    pub limit: usize,
}

impl PageRequest {
    pub fn new(skip: usize, limit: usize) -> Self {
        Self { skip, limit }
    }

    /// The window immediately after this one.
    pub fn next(self) -> Self {
        Self { skip: self.skip + self.limit, limit: self.limit }
    }

    /// 1-based page number, for logs.
    pub fn page_number(&self) -> usize {
        if self.limit == 0 { 1 } else { self.skip / self.limit + 1 }
    }
}
