//! Paginated response envelope.

use serde::Serialize;

/// Total-count header sent by WordPress.
pub const HEADER_TOTAL: &str = "X-WP-Total";

/// Total-pages header sent by WordPress.
pub const HEADER_TOTAL_PAGES: &str = "X-WP-TotalPages";

/// Pagination metadata read from response headers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PaginationHeaders {
    pub total: u64,
    pub total_pages: u64,
    /// Both headers were present and numeric
    pub present: bool,
}

impl PaginationHeaders {
    /// Build from raw header values; missing or unparseable values read as `0`.
    pub fn from_values(total: Option<&str>, total_pages: Option<&str>) -> Self {
        let total = total.and_then(|v| v.trim().parse::<u64>().ok());
        let total_pages = total_pages.and_then(|v| v.trim().parse::<u64>().ok());

        Self {
            present: total.is_some() && total_pages.is_some(),
            total: total.unwrap_or(0),
            total_pages: total_pages.unwrap_or(0),
        }
    }
}

/// A page of records plus the collection's pagination headers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaginationEnvelope<T> {
    pub data: Vec<T>,
    pub headers: PaginationHeaders,
}

/// `ceil(total / per_page)`, zero when `per_page` is zero.
pub fn page_count(total: usize, per_page: usize) -> usize {
    if per_page == 0 {
        0
    } else {
        total.div_ceil(per_page)
    }
}
