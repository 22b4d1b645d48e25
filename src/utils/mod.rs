//! Utility functions and helpers.

pub mod http;

use chrono::{Datelike, NaiveDate};
use url::Url;

use crate::error::{AppError, Result};

/// Date format used by the cache file and the public API.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Parse a `YYYY-MM-DD` date string.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
        .map_err(|_| AppError::invalid_date(input))
}

/// Every day from `start` to `end` inclusive, in either argument order.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let (from, to) = if start <= end {
        (start, end)
    } else {
        (end, start)
    };
    from.iter_days().take_while(|d| *d <= to).collect()
}

/// Every calendar year touched by `[start, end]`.
pub fn years_between(start: NaiveDate, end: NaiveDate) -> Vec<i32> {
    (start.year()..=end.year()).collect()
}
