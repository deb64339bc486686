//! Pagination and filter engine tests
//!
//! Covers the query-shaping contract shared by every list endpoint:
//! - page/take defaults and lenient coercion
//! - total_pages == ceil(count / take)
//! - inclusive UTC day boundaries and from/to swapping
//! - malformed date strings ignored rather than rejected

use chrono::{Datelike, Timelike};
use proptest::prelude::*;

use shared::{day_bounds, total_pages, ListQuery, SortOrder};

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let query = ListQuery::default();

        assert_eq!(query.page(), 1);
        assert_eq!(query.take(), 6);
        assert_eq!(query.skip(), 0);
        assert_eq!(query.sort_order(), SortOrder::Desc);
    }

    #[test]
    fn test_skip_math() {
        let query = ListQuery {
            page: Some("4".into()),
            take: Some("25".into()),
            ..Default::default()
        };

        assert_eq!(query.skip(), 75);
    }

    #[test]
    fn test_malformed_numbers_coerced_to_defaults() {
        for bad in ["0", "-3", "abc", "1.5", ""] {
            let query = ListQuery {
                page: Some(bad.into()),
                take: Some(bad.into()),
                ..Default::default()
            };

            assert_eq!(query.page(), 1, "page {:?}", bad);
            assert_eq!(query.take(), 6, "take {:?}", bad);
        }
    }

    #[test]
    fn test_sort_order_restricted() {
        assert_eq!(SortOrder::parse("ASC"), Some(SortOrder::Asc));
        assert_eq!(SortOrder::parse("desc"), Some(SortOrder::Desc));
        assert_eq!(SortOrder::parse("DELETE"), None);
    }

    #[test]
    fn test_total_pages_ceiling() {
        assert_eq!(total_pages(0, 6), 0);
        assert_eq!(total_pages(1, 6), 1);
        assert_eq!(total_pages(6, 6), 1);
        assert_eq!(total_pages(7, 6), 2);
        assert_eq!(total_pages(100, 7), 15);
    }

    #[test]
    fn test_day_bounds_inclusive() {
        let (from, to) = day_bounds(Some("2025-09-01"), Some("2025-10-01"));
        let from = from.unwrap();
        let to = to.unwrap();

        assert_eq!((from.hour(), from.minute(), from.second()), (0, 0, 0));
        assert_eq!(from.timestamp_subsec_millis(), 0);
        assert_eq!((to.hour(), to.minute(), to.second()), (23, 59, 59));
        assert_eq!(to.timestamp_subsec_millis(), 999);
        assert_eq!((to.year(), to.month(), to.day()), (2025, 10, 1));
    }

    /// createdFrom = 2025-10-01, createdTo = 2025-09-01 behaves like the
    /// straight range
    #[test]
    fn test_reversed_range_swapped() {
        assert_eq!(
            day_bounds(Some("2025-10-01"), Some("2025-09-01")),
            day_bounds(Some("2025-09-01"), Some("2025-10-01")),
        );
    }

    #[test]
    fn test_malformed_dates_ignored() {
        let (from, to) = day_bounds(Some("10/01/2025"), Some("2025-02-30"));

        assert_eq!(from, None);
        assert_eq!(to, None);
    }

    #[test]
    fn test_one_sided_ranges() {
        let (from, to) = day_bounds(Some("2025-09-01"), None);
        assert!(from.is_some());
        assert_eq!(to, None);

        let (from, to) = day_bounds(None, Some("2025-09-01"));
        assert_eq!(from, None);
        assert!(to.is_some());
    }

    #[test]
    fn test_search_pair_requires_both() {
        let query = ListQuery {
            search_field: Some("name".into()),
            ..Default::default()
        };
        assert_eq!(query.search_pair(), None);

        let query = ListQuery {
            search: Some("flour".into()),
            search_field: Some("name".into()),
            ..Default::default()
        };
        assert_eq!(query.search_pair(), Some(("flour", "name")));
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// total_pages is the exact ceiling division for any count/take
    #[test]
    fn prop_total_pages_is_ceiling(count in 0i64..1_000_000, take in 1i64..1_000) {
        let pages = total_pages(count, take);

        prop_assert!(pages * take >= count);
        prop_assert!((pages - 1) * take < count || pages == 0);
    }

    /// A page beyond the last one starts past every row
    #[test]
    fn prop_page_beyond_last_is_empty(count in 0i64..10_000, take in 1i64..100) {
        let pages = total_pages(count, take);
        let beyond = pages + 1;
        let skip = (beyond - 1) * take;

        prop_assert!(skip >= count);
    }

    /// Swapping from/to never changes the resulting bounds
    #[test]
    fn prop_day_bounds_order_insensitive(
        y1 in 2000i32..2100, m1 in 1u32..=12, d1 in 1u32..=28,
        y2 in 2000i32..2100, m2 in 1u32..=12, d2 in 1u32..=28,
    ) {
        let a = format!("{:04}-{:02}-{:02}", y1, m1, d1);
        let b = format!("{:04}-{:02}-{:02}", y2, m2, d2);

        prop_assert_eq!(
            day_bounds(Some(&a), Some(&b)),
            day_bounds(Some(&b), Some(&a))
        );
    }

    /// Lenient coercion never panics and always lands on a positive page
    #[test]
    fn prop_coercion_total(page in ".*", take in ".*") {
        let query = ListQuery {
            page: Some(page),
            take: Some(take),
            ..Default::default()
        };

        prop_assert!(query.page() >= 1);
        prop_assert!(query.take() >= 1);
        prop_assert!(query.skip() >= 0);
    }
}
