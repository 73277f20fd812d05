//! Page/limit parsing for list queries.

use crate::error::{AppError, Result};

// == Page Request ==
/// A validated page selection: `page >= 1`, `1 <= limit <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    /// Builds a page request from raw query values.
    ///
    /// Missing values fall back to page 1 and `default_limit`. Values below
    /// 1 are rejected; a limit above `max_limit` is clamped to it so that
    /// oversized requests share one cache entry.
    pub fn from_query(
        page: Option<i64>,
        limit: Option<i64>,
        default_limit: u32,
        max_limit: u32,
    ) -> Result<Self> {
        let page = page.unwrap_or(1);
        if page < 1 || page > i64::from(u32::MAX) {
            return Err(AppError::InvalidRequest(format!(
                "page must be a positive integer, got {}",
                page
            )));
        }

        let limit = limit.unwrap_or_else(|| i64::from(default_limit));
        if limit < 1 {
            return Err(AppError::InvalidRequest(format!(
                "limit must be a positive integer, got {}",
                limit
            )));
        }
        let max_limit = max_limit.max(1);
        let limit = limit.min(i64::from(max_limit)) as u32;

        Ok(Self {
            page: page as u32,
            limit,
        })
    }

    /// Number of rows skipped before this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}
