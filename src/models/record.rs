//! Per-year holiday records and query listings.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Holidays and make-up workdays announced for one year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRecord {
    pub year: i32,

    /// Days off, in announcement order
    pub holidays: Vec<NaiveDate>,

    /// Weekend days reassigned as working days
    pub workdays: Vec<NaiveDate>,
}

impl YearRecord {
    /// Create an empty record for a year.
    pub fn new(year: i32) -> Self {
        Self {
            year,
            ..Self::default()
        }
    }

    /// A record without holidays never came from a real announcement.
    pub fn is_complete(&self) -> bool {
        !self.holidays.is_empty()
    }

    /// Append workdays that are not already present. Holidays stay holidays.
    pub fn merge_workdays(&mut self, dates: &[NaiveDate]) {
        for date in dates {
            if !self.holidays.contains(date) {
                push_unique(&mut self.workdays, *date);
            }
        }
    }

    pub fn is_holiday(&self, date: &NaiveDate) -> bool {
        self.holidays.contains(date)
    }

    pub fn is_workday(&self, date: &NaiveDate) -> bool {
        self.workdays.contains(date)
    }
}

/// Holidays and workdays gathered by a list or range query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Listing {
    pub holidays: Vec<NaiveDate>,
    pub workdays: Vec<NaiveDate>,
}

impl Listing {
    /// Append a year's dates after the ones already collected.
    pub fn extend(&mut self, record: &YearRecord) {
        self.holidays.extend_from_slice(&record.holidays);
        self.workdays.extend_from_slice(&record.workdays);
    }

    /// Keep only dates strictly between `start` and `end`.
    pub fn between(self, start: NaiveDate, end: NaiveDate) -> Self {
        let inside = |d: &NaiveDate| start < *d && *d < end;
        Self {
            holidays: self.holidays.into_iter().filter(inside).collect(),
            workdays: self.workdays.into_iter().filter(inside).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.holidays.is_empty() && self.workdays.is_empty()
    }
}

/// Push `date` unless it is already in `dates`.
pub(crate) fn push_unique(dates: &mut Vec<NaiveDate>, date: NaiveDate) {
    if !dates.contains(&date) {
        dates.push(date);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_merge_workdays_dedups() {
        let mut record = YearRecord::new(2023);
        record.workdays = vec![ymd(2023, 10, 7)];
        record.merge_workdays(&[ymd(2023, 10, 7), ymd(2023, 12, 31)]);
        assert_eq!(record.workdays, vec![ymd(2023, 10, 7), ymd(2023, 12, 31)]);
    }

    #[test]
    fn test_between_excludes_bounds() {
        let listing = Listing {
            holidays: vec![ymd(2024, 5, 1), ymd(2024, 5, 2), ymd(2024, 5, 5)],
            workdays: vec![ymd(2024, 4, 28), ymd(2024, 5, 11)],
        };
        let filtered = listing.between(ymd(2024, 5, 1), ymd(2024, 5, 5));
        assert_eq!(filtered.holidays, vec![ymd(2024, 5, 2)]);
        assert!(filtered.workdays.is_empty());
    }

    #[test]
    fn test_listing_serializes_iso_dates() {
        let listing = Listing {
            holidays: vec![ymd(2024, 1, 1)],
            workdays: vec![],
        };
        let json = serde_json::to_string(&listing).unwrap();
        assert_eq!(json, r#"{"holidays":["2024-01-01"],"workdays":[]}"#);
    }
}
