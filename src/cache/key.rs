//! Cache key construction for paginated list queries.

use std::fmt;

// == List Key ==
/// Key of one cached list page: `list:{kind}:{page}:{limit}`.
///
/// Page and limit are always the last two segments, so the string form is
/// injective even when `kind` itself contains `:`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListKey {
    kind: String,
    page: u32,
    limit: u32,
}

impl ListKey {
    pub fn new(kind: impl Into<String>, page: u32, limit: u32) -> Self {
        Self {
            kind: kind.into(),
            page,
            limit,
        }
    }
}

impl fmt::Display for ListKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "list:{}:{}:{}", self.kind, self.page, self.limit)
    }
}
