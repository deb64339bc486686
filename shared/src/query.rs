//! Generic list-query shaping
//!
//! Every list endpoint accepts the same query shape and returns the same
//! paginated envelope. Parsing here is deliberately lenient: malformed page
//! or take values fall back to defaults and malformed dates are ignored,
//! never rejected.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_TAKE: i64 = 6;

/// Sort direction, restricted to the two SQL keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "ASC" => Some(SortOrder::Asc),
            "DESC" => Some(SortOrder::Desc),
            _ => None,
        }
    }
}

/// Raw list-query parameters as they arrive on the wire
///
/// Numeric fields are kept as strings so that malformed values can be
/// coerced to defaults instead of failing extraction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub take: Option<String>,
    pub search: Option<String>,
    pub search_field: Option<String>,
    pub sort_field: Option<String>,
    pub sort_order: Option<String>,
    pub created_from: Option<String>,
    pub created_to: Option<String>,
}

impl ListQuery {
    /// Current page, coerced to a positive integer (default 1)
    pub fn page(&self) -> i64 {
        coerce_positive(self.page.as_deref(), DEFAULT_PAGE)
    }

    /// Page size, coerced to a positive integer (default 6)
    pub fn take(&self) -> i64 {
        coerce_positive(self.take.as_deref(), DEFAULT_TAKE)
    }

    /// Rows to skip before the current page
    pub fn skip(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.take())
    }

    /// Sort direction, defaulting to descending (newest first)
    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
            .as_deref()
            .and_then(SortOrder::parse)
            .unwrap_or_default()
    }

    /// Search term and field, present only when both were supplied
    pub fn search_pair(&self) -> Option<(&str, &str)> {
        match (self.search.as_deref(), self.search_field.as_deref()) {
            (Some(s), Some(f)) if !s.is_empty() && !f.is_empty() => Some((s, f)),
            _ => None,
        }
    }

    /// Inclusive UTC day bounds for the created_from/created_to filters
    pub fn created_bounds(&self) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        day_bounds(self.created_from.as_deref(), self.created_to.as_deref())
    }
}

fn coerce_positive(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|n| *n >= 1)
        .unwrap_or(default)
}

/// Convert calendar-date filter strings into inclusive UTC day boundaries
///
/// `from` maps to 00:00:00.000 and `to` to 23:59:59.999 of the named day.
/// If both parse and `from > to` the dates are swapped so the range is
/// never empty by accident. Strings that do not match `YYYY-MM-DD` are
/// treated as absent.
pub fn day_bounds(
    from: Option<&str>,
    to: Option<&str>,
) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    let mut from_date = from.and_then(parse_day);
    let mut to_date = to.and_then(parse_day);

    if let (Some(f), Some(t)) = (from_date, to_date) {
        if f > t {
            from_date = Some(t);
            to_date = Some(f);
        }
    }

    (
        from_date.map(start_of_day),
        to_date.map(end_of_day),
    )
}

fn parse_day(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

fn start_of_day(d: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&d.and_hms_milli_opt(0, 0, 0, 0).unwrap())
}

fn end_of_day(d: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&d.and_hms_milli_opt(23, 59, 59, 999).unwrap())
}

/// Paginated response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub results: Vec<T>,
    pub count: i64,
    pub total_pages: i64,
    pub page: i64,
    pub take: i64,
}

impl<T> Page<T> {
    pub fn new(results: Vec<T>, count: i64, page: i64, take: i64) -> Self {
        Self {
            results,
            count,
            total_pages: total_pages(count, take),
            page,
            take,
        }
    }

    /// Convert row types into response models without touching the meta
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            results: self.results.into_iter().map(f).collect(),
            count: self.count,
            total_pages: self.total_pages,
            page: self.page,
            take: self.take,
        }
    }

    /// Fallible variant of [`Page::map`]
    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<Page<U>, E> {
        Ok(Page {
            results: self
                .results
                .into_iter()
                .map(f)
                .collect::<Result<Vec<_>, E>>()?,
            count: self.count,
            total_pages: self.total_pages,
            page: self.page,
            take: self.take,
        })
    }
}

/// `ceil(count / take)` without going through floats
pub fn total_pages(count: i64, take: i64) -> i64 {
    if take <= 0 {
        return 0;
    }
    (count + take - 1) / take
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_and_take_default_and_coerce() {
        let q = ListQuery::default();
        assert_eq!(q.page(), 1);
        assert_eq!(q.take(), 6);

        let q = ListQuery {
            page: Some("3".into()),
            take: Some("10".into()),
            ..Default::default()
        };
        assert_eq!(q.page(), 3);
        assert_eq!(q.take(), 10);
        assert_eq!(q.skip(), 20);

        let q = ListQuery {
            page: Some("zero".into()),
            take: Some("-4".into()),
            ..Default::default()
        };
        assert_eq!(q.page(), 1);
        assert_eq!(q.take(), 6);
    }

    #[test]
    fn total_pages_is_ceiling() {
        assert_eq!(total_pages(0, 6), 0);
        assert_eq!(total_pages(6, 6), 1);
        assert_eq!(total_pages(7, 6), 2);
        assert_eq!(total_pages(13, 6), 3);
    }

    #[test]
    fn day_bounds_are_inclusive_utc() {
        let (from, to) = day_bounds(Some("2025-09-01"), Some("2025-10-01"));
        assert_eq!(from.unwrap().to_rfc3339(), "2025-09-01T00:00:00+00:00");
        assert_eq!(
            to.unwrap().timestamp_millis(),
            end_of_day(NaiveDate::from_ymd_opt(2025, 10, 1).unwrap()).timestamp_millis()
        );
    }

    #[test]
    fn reversed_range_is_swapped() {
        let straight = day_bounds(Some("2025-09-01"), Some("2025-10-01"));
        let reversed = day_bounds(Some("2025-10-01"), Some("2025-09-01"));
        assert_eq!(straight, reversed);
    }

    #[test]
    fn malformed_dates_are_ignored() {
        let (from, to) = day_bounds(Some("not-a-date"), Some("2025-13-40"));
        assert_eq!(from, None);
        assert_eq!(to, None);

        let (from, _) = day_bounds(Some("2025-01-15"), Some("soon"));
        assert!(from.is_some());
    }

    #[test]
    fn search_pair_requires_both_parts() {
        let q = ListQuery {
            search: Some("widget".into()),
            ..Default::default()
        };
        assert_eq!(q.search_pair(), None);

        let q = ListQuery {
            search: Some("widget".into()),
            search_field: Some("name".into()),
            ..Default::default()
        };
        assert_eq!(q.search_pair(), Some(("widget", "name")));
    }
}
