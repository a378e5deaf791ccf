//! Offset pagination for list endpoints.
//!
//! Mirrors the page-number style of the JSON API: pages are 1-based, a
//! requested page below 1 clamps to the first page and a page past the
//! end clamps to the last page (an empty result set still reports one
//! page).

use serde::Serialize;

/// Pagination block included next to `items` in list payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    /// 1-based page number actually served.
    pub page: u32,
    /// Total number of pages (at least 1).
    pub pages: u32,
    /// Total number of matching rows.
    pub total: u64,
}

/// A page of items plus its pagination block.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pagination: PageInfo,
}

impl PageInfo {
    /// Resolve a requested page against a row count.
    #[must_use]
    pub fn resolve(requested_page: i64, total: u64, per_page: u32) -> Self {
        let pages = total
            .div_ceil(u64::from(per_page.max(1)))
            .max(1)
            .min(u64::from(u32::MAX)) as u32;
        let page = requested_page.clamp(1, i64::from(pages)) as u32;

        Self { page, pages, total }
    }

    /// SQL OFFSET for this page.
    #[must_use]
    pub const fn offset(&self, per_page: u32) -> i64 {
        (self.page as i64 - 1) * per_page as i64
    }
}

/// Parse a raw `page` query value the way the original API does: empty or
/// unparsable input falls back to page 1.
#[must_use]
pub fn parse_page(raw: Option<&str>) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .map_or(1, |p| p.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_basic() {
        let info = PageInfo::resolve(2, 35, 10);
        assert_eq!(info.page, 2);
        assert_eq!(info.pages, 4);
        assert_eq!(info.total, 35);
        assert_eq!(info.offset(10), 10);
    }

    #[test]
    fn test_page_below_one_clamps_to_first() {
        let info = PageInfo::resolve(-3, 35, 10);
        assert_eq!(info.page, 1);
        assert_eq!(info.offset(10), 0);
    }

    #[test]
    fn test_page_past_end_clamps_to_last() {
        let info = PageInfo::resolve(99, 35, 10);
        assert_eq!(info.page, 4);
        assert_eq!(info.offset(10), 30);
    }

    #[test]
    fn test_empty_result_still_one_page() {
        let info = PageInfo::resolve(1, 0, 10);
        assert_eq!(info.page, 1);
        assert_eq!(info.pages, 1);
        assert_eq!(info.total, 0);
    }

    #[test]
    fn test_exact_multiple() {
        let info = PageInfo::resolve(3, 30, 10);
        assert_eq!(info.pages, 3);
        assert_eq!(info.page, 3);
    }

    #[test]
    fn test_parse_page() {
        assert_eq!(parse_page(None), 1);
        assert_eq!(parse_page(Some("")), 1);
        assert_eq!(parse_page(Some("abc")), 1);
        assert_eq!(parse_page(Some("0")), 1);
        assert_eq!(parse_page(Some("7")), 7);
        assert_eq!(parse_page(Some(" 7 ")), 7);
    }
}
