//! Pagination
//!
//! Offset and limit extracted from `$skip`/`$limit`, carried outside the
//! filter tree.

/// Optional offset and limit for a translated query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageSpec {
    /// Number of rows to skip, from `$skip`.
    pub offset: Option<u64>,
    /// Maximum number of rows to return, from `$limit`.
    pub limit: Option<u64>,
}

impl PageSpec {
    /// Whether neither offset nor limit is set.
    pub fn is_unbounded(&self) -> bool {
        self.offset.is_none() && self.limit.is_none()
    }
}
