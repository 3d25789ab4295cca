//! Page-number pagination for the item listing.

use serde::Serialize;

use crate::query_params::{parse_integer_param, RawQuery};

/// Page-size bounds, supplied from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_page_size: i64,
    pub max_page_size: i64,
}

/// A validated page request: `page >= 1`, `1 <= page_size <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
}

impl PageRequest {
    /// Clamp a requested page and page size.
    ///
    /// Pages below 1 become 1. A page size below 1 falls back to the
    /// configured default, and anything above the maximum is capped.
    pub fn new(page: i64, page_size: i64, limits: PageLimits) -> Self {
        let page_size = if page_size < 1 {
            limits.default_page_size
        } else {
            page_size
        };

        Self {
            page: page.max(1),
            page_size: page_size.clamp(1, limits.max_page_size.max(1)),
        }
    }

    /// Read `page` and `pageSize` from the query string.
    pub fn from_query(query: &RawQuery, limits: PageLimits) -> Self {
        let page = parse_integer_param(&query.get("page"), 1);
        let page_size = parse_integer_param(&query.get("pageSize"), limits.default_page_size);
        Self::new(page, page_size, limits)
    }

    /// Rows to skip: `(page - 1) * page_size`.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }
}

/// Pagination metadata returned alongside a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl PageInfo {
    pub fn new(request: PageRequest, total: i64) -> Self {
        let total = total.max(0);
        Self {
            page: request.page,
            page_size: request.page_size,
            total,
            total_pages: (total + request.page_size - 1) / request.page_size,
        }
    }
}
