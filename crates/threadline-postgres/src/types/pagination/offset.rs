//! Page-number based pagination for comment listings.

use crate::types::constants::database::MAX_PAGE_SIZE;

/// Window of a listing query, addressed by limit and offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetPagination {
    /// Maximum number of records to return, `1..=MAX_PAGE_SIZE`.
    pub limit: i64,
    /// Number of records to skip.
    pub offset: i64,
    /// Whether to count every matching record alongside the page.
    pub include_count: bool,
}

impl OffsetPagination {
    /// Window of the 1-based `page` of `page_size` records.
    ///
    /// Pages below 1 select the first page. The page size is clamped to
    /// `1..=MAX_PAGE_SIZE`.
    pub fn from_page(page: i64, page_size: i64) -> Self {
        let limit = page_size.clamp(1, MAX_PAGE_SIZE);
        let skipped_pages = page.max(1) - 1;

        Self {
            limit,
            offset: skipped_pages.saturating_mul(limit),
            include_count: false,
        }
    }

    /// Requests the total count of matching records.
    pub fn with_count(self) -> Self {
        Self {
            include_count: true,
            ..self
        }
    }
}

/// One window of records, with the total when it was requested.
#[derive(Debug, Clone)]
pub struct OffsetPage<T> {
    /// Records inside the window.
    pub items: Vec<T>,
    /// Number of matching records across every page, if counted.
    pub total: Option<i64>,
}

impl<T> OffsetPage<T> {
    /// Wraps the records of one window.
    pub fn new(items: Vec<T>, total: Option<i64>) -> Self {
        Self { items, total }
    }

    /// Number of pages of `pagination.limit` records needed for the total.
    pub fn total_pages(&self, pagination: &OffsetPagination) -> Option<i64> {
        let limit = pagination.limit.max(1);
        self.total.map(|total| total.saturating_add(limit - 1) / limit)
    }
}
