//! Paging value objects shared by every list operation

use serde::Serialize;

/// Normalized page request
///
/// `page` is zero based. A non-positive `per_page` falls back to the default
/// and anything above [`PageRequest::MAX_PER_PAGE`] is capped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub per_page: i64,
}

impl PageRequest {
    pub const DEFAULT_PER_PAGE: i64 = 10;
    pub const MAX_PER_PAGE: i64 = 100;

    pub fn new(page: Option<i64>, per_page: Option<i64>) -> Self {
        let page = page.unwrap_or(0).max(0);
        let per_page = match per_page {
            Some(n) if n > 0 => n.min(Self::MAX_PER_PAGE),
            _ => Self::DEFAULT_PER_PAGE,
        };
        Self { page, per_page }
    }

    /// Row offset of the first item on this page
    #[inline]
    pub fn offset(&self) -> i64 {
        self.page.saturating_mul(self.per_page)
    }

    #[inline]
    pub fn limit(&self) -> i64 {
        self.per_page
    }

    /// Index of the last page for `total` items (0 when empty)
    pub fn last_page(&self, total: i64) -> i64 {
        if total <= 0 {
            0
        } else {
            (total + self.per_page - 1) / self.per_page - 1
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of results plus the total number of matching rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64) -> Self {
        Self { items, total }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}
