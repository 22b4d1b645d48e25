// src/pipeline/resolve.rs

//! Year resolution: cache first, then the announcement.

use std::collections::{BTreeMap, BTreeSet};
use std::future::Future;
use std::pin::Pin;

use chrono::NaiveDate;

use crate::models::{Listing, YearRecord};
use crate::services::{Extractor, Retriever};
use crate::storage::CacheStore;

/// Resolves years to holiday records, one year at a time.
pub struct Resolver {
    retriever: Retriever,
    extractor: Extractor,
    store: CacheStore,
}

impl Resolver {
    pub fn new(retriever: Retriever, store: CacheStore) -> Self {
        Self {
            retriever,
            extractor: Extractor::new(),
            store,
        }
    }

    pub(crate) fn store(&self) -> &CacheStore {
        &self.store
    }

    /// Resolve several years, concatenating their dates in input order.
    ///
    /// Later years are resolved first so that workdays they carry back are
    /// already merged when the earlier year is read.
    pub async fn resolve(&self, years: &[i32]) -> Listing {
        let mut records = BTreeMap::new();
        let unique: BTreeSet<i32> = years.iter().copied().collect();
        for year in unique.into_iter().rev() {
            let record = self.resolve_one(year).await;
            records.insert(year, record);
        }

        let mut listing = Listing::default();
        for year in years {
            if let Some(record) = records.get(year) {
                listing.extend(record);
            }
        }
        listing
    }

    /// Resolve a single year.
    ///
    /// A complete cached record is returned as is. Otherwise the announcement
    /// is fetched and extracted; the result is cached when the fetch
    /// succeeded. Workdays the announcement dates in the previous year are
    /// merged into that year's cached record.
    pub async fn resolve_one(&self, year: i32) -> YearRecord {
        let mut cache = self.store.load().await;
        let stale = match cache.remove(&year) {
            Some(record) if record.is_complete() => {
                log::debug!("Year {} served from cache", year);
                return record;
            }
            other => other,
        };

        let text = match self.retriever.fetch(year).await {
            Ok(text) => text,
            Err(e) => {
                log::warn!("No holiday data for {}: {}", year, e);
                return stale.unwrap_or_else(|| YearRecord::new(year));
            }
        };

        let extraction = self.extractor.extract(&text, year);
        if extraction.holidays.is_empty() {
            log::warn!("Announcement for {} matched no holiday clause", year);
        }
        log::info!(
            "Year {}: {} holidays, {} workdays",
            year,
            extraction.holidays.len(),
            extraction.workdays.len()
        );

        let mut record = YearRecord {
            year,
            holidays: extraction.holidays,
            workdays: extraction.workdays,
        };
        if let Some(stale) = &stale {
            record.merge_workdays(&stale.workdays);
        }

        if !self.store.is_enabled() {
            return record;
        }

        if !extraction.carryover_workdays.is_empty() {
            match year.checked_sub(1) {
                Some(previous) => {
                    self.carry_over(previous, &extraction.carryover_workdays)
                        .await
                }
                None => log::warn!("No year before {} to carry workdays into", year),
            }
        }

        let saved = match stale {
            Some(_) => self.store.rewrite(&record).await,
            None => self.store.append(&record).await,
        };
        if let Err(e) = saved {
            log::warn!("Failed to cache year {}: {}", year, e);
        }
        record
    }

    /// Merge `workdays` into the cached record of `year`.
    fn carry_over<'a>(
        &'a self,
        year: i32,
        workdays: &'a [NaiveDate],
    ) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(async move {
            log::info!("Carrying {} workday(s) over to {}", workdays.len(), year);
            let mut previous = self.resolve_one(year).await;
            previous.merge_workdays(workdays);
            if let Err(e) = self.store.rewrite(&previous).await {
                log::warn!("Failed to update cached year {}: {}", year, e);
            }
        })
    }
}
