// src/holiday.rs

//! Public query API.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::error::Result;
use crate::models::{Config, Listing};
use crate::pipeline::Resolver;
use crate::services::{HttpSource, Retriever, WebSource};
use crate::storage::CacheStore;
use crate::utils::{parse_date, years_between};

/// China's holiday calendar, resolved from State Council announcements.
///
/// ```no_run
/// # async fn demo() -> china_holiday::error::Result<()> {
/// use china_holiday::{ChinaHoliday, models::Config};
///
/// let calendar = ChinaHoliday::new(Config::default())?;
/// assert!(calendar.check("2024-10-01").await?);
/// # Ok(())
/// # }
/// ```
pub struct ChinaHoliday {
    resolver: Resolver,
}

impl ChinaHoliday {
    /// Build a calendar that fetches announcements over HTTP.
    pub fn new(config: Config) -> Result<Self> {
        let source = HttpSource::new(&config.retriever)?;
        Ok(Self::with_source(config, Arc::new(source)))
    }

    /// Build a calendar on top of any web source.
    ///
    /// An unusable cache path is logged and the calendar runs without
    /// persistence.
    pub fn with_source(config: Config, source: Arc<dyn WebSource>) -> Self {
        let store = match config.cache.path() {
            Some(path) => CacheStore::open(path).unwrap_or_else(|e| {
                log::warn!("Cache disabled: {}", e);
                CacheStore::disabled()
            }),
            None => CacheStore::disabled(),
        };
        let retriever = Retriever::new(source, config.retriever);
        Self {
            resolver: Resolver::new(retriever, store),
        }
    }

    /// Whether a `YYYY-MM-DD` date is a day off.
    pub async fn check(&self, date: &str) -> Result<bool> {
        let date = parse_date(date)?;
        Ok(self.check_date(date).await)
    }

    /// Whether `date` is a day off.
    ///
    /// Announced holidays are days off. Saturdays and Sundays are days off
    /// unless the announcement reassigns them as workdays.
    pub async fn check_date(&self, date: NaiveDate) -> bool {
        let record = self.resolver.resolve_one(date.year()).await;
        if record.is_holiday(&date) {
            return true;
        }
        is_weekend(date) && !record.is_workday(&date)
    }

    /// Holidays and workdays of the given years, in input order.
    pub async fn list(&self, years: &[i32]) -> Listing {
        self.resolver.resolve(years).await
    }

    /// Holidays and workdays strictly between two `YYYY-MM-DD` dates.
    pub async fn range(&self, start: &str, end: &str) -> Result<Listing> {
        let start = parse_date(start)?;
        let end = parse_date(end)?;
        Ok(self.range_dates(start, end).await)
    }

    /// Holidays and workdays strictly between `start` and `end`.
    pub async fn range_dates(&self, start: NaiveDate, end: NaiveDate) -> Listing {
        if end <= start {
            return Listing::default();
        }
        self.resolver
            .resolve(&years_between(start, end))
            .await
            .between(start, end)
    }

    pub fn is_persistent(&self) -> bool {
        self.resolver.store().is_enabled()
    }
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}
