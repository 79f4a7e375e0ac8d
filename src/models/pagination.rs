//! Pagination envelope shared by the listing endpoint and the listing client.

use serde::{Deserialize, Serialize};

/// Position of a result page within the full result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: u64,
    pub items_per_page: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    /// Build the envelope for `page` of size `limit` over `total_items` matches.
    ///
    /// `total_pages` is never below 1, so an empty result is still "page 1 of 1".
    pub fn new(current_page: u32, items_per_page: u32, total_items: u64) -> Self {
        let per_page = u64::from(items_per_page.max(1));
        let total_pages = total_items.div_ceil(per_page).max(1);
        let total_pages = u32::try_from(total_pages).unwrap_or(u32::MAX);

        Self {
            current_page,
            total_pages,
            total_items,
            items_per_page,
            has_next: current_page < total_pages,
            has_prev: current_page > 1,
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, 10, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_result_is_single_page() {
        let p = Pagination::new(1, 10, 0);
        assert_eq!(p.total_pages, 1);
        assert!(!p.has_next);
        assert!(!p.has_prev);
    }

    #[test]
    fn test_twenty_five_items_by_ten() {
        let first = Pagination::new(1, 10, 25);
        assert_eq!(first.total_pages, 3);
        assert!(first.has_next);
        assert!(!first.has_prev);

        let last = Pagination::new(3, 10, 25);
        assert!(!last.has_next);
        assert!(last.has_prev);
    }

    #[test]
    fn test_total_pages_is_ceiling() {
        for (total, limit, expected) in [(1, 10, 1), (10, 10, 1), (11, 10, 2), (7, 3, 3), (100, 1, 100)] {
            assert_eq!(Pagination::new(1, limit, total).total_pages, expected);
        }
    }

    #[test]
    fn test_page_past_the_end() {
        let p = Pagination::new(9, 10, 25);
        assert!(!p.has_next);
        assert!(p.has_prev);
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_value(Pagination::new(2, 5, 12)).unwrap();
        assert_eq!(json["current_page"], 2);
        assert_eq!(json["total_pages"], 3);
        assert_eq!(json["total_items"], 12);
        assert_eq!(json["items_per_page"], 5);
        assert_eq!(json["has_next"], true);
        assert_eq!(json["has_prev"], true);
    }
}
