//! Limit/offset window shared by song listing and verse paging

use serde::{Deserialize, Serialize};

/// Pagination parameters.
///
/// For listing this bounds the number of songs; for a single song it bounds
/// the number of verses returned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Pagination {
    /// Maximum number of items; zero or negative means no bound
    pub limit: i32,
    /// Items to skip; never negative once constructed
    pub offset: i32,
}

impl Pagination {
    /// Create pagination, clamping a negative offset to 0.
    pub fn new(limit: i32, offset: i32) -> Self {
        Self {
            limit,
            offset: offset.max(0),
        }
    }

    /// SQL `LIMIT` value, `None` when unbounded (`LIMIT NULL`).
    pub fn limit(&self) -> Option<i64> {
        (self.limit > 0).then_some(self.limit as i64)
    }

    /// SQL `OFFSET` value.
    pub fn offset(&self) -> i64 {
        self.offset.max(0) as i64
    }
}

/// Query parameters for pagination
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i32>,
    pub offset: Option<i32>,
}

impl From<PaginationParams> for Pagination {
    fn from(params: PaginationParams) -> Self {
        Self::new(params.limit.unwrap_or(0), params.offset.unwrap_or(0))
    }
}
