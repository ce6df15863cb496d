//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

/// Default page size.
pub const DEFAULT_PAGE_SIZE: u64 = 20;
/// Maximum page size.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-based).
    #[serde(default = "default_page")]
    pub page: u64,
    /// Number of items per page.
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

impl PageRequest {
    /// Create a new page request, clamping out-of-range values.
    pub fn new(page: u64, page_size: u64) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Calculate the SQL `OFFSET` value. Saturates for absurd page numbers.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }

    /// Return the SQL `LIMIT` value.
    pub fn limit(&self) -> u64 {
        self.page_size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Paginated response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Current page number (1-based).
    pub page: u64,
    /// Number of items per page.
    pub page_size: u64,
    /// Total number of items across all pages.
    pub total_items: u64,
    /// Total number of pages.
    pub total_pages: u64,
    /// Whether there is a next page.
    pub has_next: bool,
    /// Whether there is a previous page.
    pub has_previous: bool,
}

impl<T> PageResponse<T> {
    /// Create a new paginated response.
    pub fn new(items: Vec<T>, page: u64, page_size: u64, total_items: u64) -> Self {
        let total_pages = total_pages(total_items, page_size);
        Self {
            items,
            page,
            page_size,
            total_items,
            total_pages,
            has_next: page < total_pages,
            has_previous: page > 1,
        }
    }

    /// Create an empty response.
    pub fn empty(page_request: &PageRequest) -> Self {
        Self::new(Vec::new(), page_request.page, page_request.page_size, 0)
    }
}

/// Number of pages needed for `total_items` at `page_size` per page.
///
/// An empty collection still has one (empty) page.
pub fn total_pages(total_items: u64, page_size: u64) -> u64 {
    if total_items == 0 {
        1
    } else {
        total_items.div_ceil(page_size.max(1))
    }
}

fn default_page() -> u64 {
    1
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_clamps() {
        let req = PageRequest::new(0, 5000);
        assert_eq!(req.page, 1);
        assert_eq!(req.page_size, MAX_PAGE_SIZE);
        assert_eq!(PageRequest::new(3, 0).page_size, 1);
    }

    #[test]
    fn test_offset() {
        assert_eq!(PageRequest::new(1, 20).offset(), 0);
        assert_eq!(PageRequest::new(3, 20).offset(), 40);
    }

    #[test]
    fn test_offset_saturates_for_huge_page() {
        assert_eq!(PageRequest::new(u64::MAX, 20).offset(), u64::MAX);
    }

    #[test]
    fn test_total_pages_for_45_items() {
        let page: PageResponse<u8> = PageResponse::new(vec![0; 20], 1, 20, 45);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next);
        assert!(!page.has_previous);

        let last: PageResponse<u8> = PageResponse::new(vec![0; 5], 3, 20, 45);
        assert!(!last.has_next);
    }

    #[test]
    fn test_empty_has_single_page() {
        let page: PageResponse<u8> = PageResponse::empty(&PageRequest::default());
        assert_eq!(page.total_pages, 1);
        assert!(!page.has_next);
    }
}
