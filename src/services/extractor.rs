// src/services/extractor.rs

//! Announcement text extraction.
//!
//! State Council announcements list one numbered clause per festival:
//!
//! ```text
//! 二、春节：2月10日至17日放假调休，共8天。2月4日（星期日）、2月18日（星期日）上班。
//! ```
//!
//! The first sentence of a clause names the days off, the second the weekend
//! days that are worked instead. Workdays carrying an explicit previous year
//! (`2023年12月31日`) belong to the previous year's calendar.

use chrono::{Datelike, NaiveDate};
use regex::{Captures, Regex};

use crate::models::push_unique;
use crate::utils::days_between;

/// Clause markers, in the order they appear in an announcement.
const ORDINAL_LABELS: [&str; 15] = [
    "一", "二", "三", "四", "五", "六", "七", "八", "九", "十", "十一", "十二", "十三", "十四",
    "十五",
];

/// Separates an ordinal label from the clause text.
const LABEL_DELIMITER: char = '、';

/// Ends a sentence inside a clause.
const SENTENCE_DELIMITER: char = '。';

/// Separates the dates of a workday sentence.
const LIST_DELIMITER: char = '、';

/// The seven legal holidays an announcement can schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Festival {
    NewYear,
    SpringFestival,
    TombSweeping,
    LabourDay,
    DragonBoat,
    MidAutumn,
    NationalDay,
}

impl Festival {
    pub const ALL: [Festival; 7] = [
        Festival::NewYear,
        Festival::SpringFestival,
        Festival::TombSweeping,
        Festival::LabourDay,
        Festival::DragonBoat,
        Festival::MidAutumn,
        Festival::NationalDay,
    ];

    /// Canonical name as printed in announcements.
    pub fn name(self) -> &'static str {
        match self {
            Festival::NewYear => "元旦",
            Festival::SpringFestival => "春节",
            Festival::TombSweeping => "清明节",
            Festival::LabourDay => "劳动节",
            Festival::DragonBoat => "端午节",
            Festival::MidAutumn => "中秋节",
            Festival::NationalDay => "国庆节",
        }
    }

    /// First festival whose name occurs in `text`.
    pub fn find_in(text: &str) -> Option<Festival> {
        Self::ALL.into_iter().find(|f| text.contains(f.name()))
    }
}

/// Dates pulled out of one announcement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub holidays: Vec<NaiveDate>,
    pub workdays: Vec<NaiveDate>,
    /// Workdays dated in the year before the announcement's year
    pub carryover_workdays: Vec<NaiveDate>,
}

#[cfg(test)]
impl Extraction {
    fn is_empty(&self) -> bool {
        self.holidays.is_empty() && self.workdays.is_empty() && self.carryover_workdays.is_empty()
    }
}

/// Pattern matcher for announcement text.
pub struct Extractor {
    dated_range: Regex,
    cross_month_range: Regex,
    same_month_range: Regex,
    single_day: Regex,
    dated_day: Regex,
}

impl Extractor {
    pub fn new() -> Self {
        Self {
            dated_range: compile(
                r"([0-9]{4})年([0-9]{1,2})月([0-9]{1,2})日至([0-9]{4})年([0-9]{1,2})月([0-9]{1,2})日",
            ),
            cross_month_range: compile(
                r"([0-9]{1,2})月([0-9]{1,2})日至([0-9]{1,2})月([0-9]{1,2})日",
            ),
            same_month_range: compile(r"([0-9]{1,2})月([0-9]{1,2})日至([0-9]{1,2})日"),
            single_day: compile(r"([0-9]{1,2})月([0-9]{1,2})日"),
            dated_day: compile(r"([0-9]{4})年([0-9]{1,2})月([0-9]{1,2})日"),
        }
    }

    /// Extract the holidays and workdays `text` announces for `year`.
    pub fn extract(&self, text: &str, year: i32) -> Extraction {
        let mut out = Extraction::default();

        for clause in split_clauses(text) {
            let Some(festival) = Festival::find_in(clause) else {
                continue;
            };
            log::debug!("Clause for {}: {}", festival.name(), clause.trim());

            let sentences: Vec<&str> = clause.split(SENTENCE_DELIMITER).collect();
            for date in self.holiday_dates(sentences[0], year) {
                push_unique(&mut out.holidays, date);
            }

            // The workday sentence only counts when it is itself terminated.
            if sentences.len() > 2 {
                self.collect_workdays(sentences[1], year, &mut out);
            }
        }

        out.workdays.retain(|d| !out.holidays.contains(d));
        out
    }

    /// Days off named by a holiday sentence; the most specific pattern wins.
    fn holiday_dates(&self, sentence: &str, year: i32) -> Vec<NaiveDate> {
        if let Some(caps) = self.dated_range.captures(sentence) {
            let start = date_from(&caps, Some(1), 2, 3, year);
            let end = date_from(&caps, Some(4), 5, 6, year);
            return match (start, end) {
                (Some(start), Some(end)) => days_between(start, end)
                    .into_iter()
                    .filter(|d| d.year() == year)
                    .collect(),
                _ => Vec::new(),
            };
        }

        if let Some(caps) = self.cross_month_range.captures(sentence) {
            return expand(
                date_from(&caps, None, 1, 2, year),
                date_from(&caps, None, 3, 4, year),
            );
        }

        if let Some(caps) = self.same_month_range.captures(sentence) {
            return expand(
                date_from(&caps, None, 1, 2, year),
                date_from(&caps, None, 1, 3, year),
            );
        }

        self.single_day
            .captures(sentence)
            .and_then(|caps| date_from(&caps, None, 1, 2, year))
            .into_iter()
            .collect()
    }

    /// Sort each fragment of a workday sentence into this or last year's list.
    fn collect_workdays(&self, sentence: &str, year: i32, out: &mut Extraction) {
        for fragment in sentence.split(LIST_DELIMITER) {
            if let Some(caps) = self.dated_day.captures(fragment) {
                // An explicit year only ever points back at the previous year.
                if let Some(date) = date_from(&caps, Some(1), 2, 3, year) {
                    if year.checked_sub(1) == Some(date.year()) {
                        push_unique(&mut out.carryover_workdays, date);
                    }
                }
            } else if let Some(caps) = self.single_day.captures(fragment) {
                if let Some(date) = date_from(&caps, None, 1, 2, year) {
                    push_unique(&mut out.workdays, date);
                }
            }
        }
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Cut `text` into numbered clauses.
///
/// A clause starts at `<label>、` and stops at the next label's marker or the
/// next line break, whichever comes first.
fn split_clauses(text: &str) -> Vec<&str> {
    let mut clauses = Vec::new();

    for (i, label) in ORDINAL_LABELS.iter().enumerate() {
        let marker = format!("{label}{LABEL_DELIMITER}");
        let Some(start) = text.find(&marker) else {
            continue;
        };

        let body = &text[start..];
        let mut end = body.find('\n').unwrap_or(body.len());
        if let Some(next) = ORDINAL_LABELS.get(i + 1) {
            let next_marker = format!("{next}{LABEL_DELIMITER}");
            if let Some(pos) = body[marker.len()..].find(&next_marker) {
                end = end.min(marker.len() + pos);
            }
        }
        clauses.push(&body[..end]);
    }

    clauses
}

fn expand(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Vec<NaiveDate> {
    match (start, end) {
        (Some(start), Some(end)) => days_between(start, end),
        _ => Vec::new(),
    }
}

/// Build a date from capture groups, defaulting the year to `year`.
fn date_from(
    caps: &Captures<'_>,
    year_group: Option<usize>,
    month_group: usize,
    day_group: usize,
    year: i32,
) -> Option<NaiveDate> {
    let year = match year_group {
        Some(group) => caps.get(group)?.as_str().parse().ok()?,
        None => year,
    };
    let month = caps.get(month_group)?.as_str().parse().ok()?;
    let day = caps.get(day_group)?.as_str().parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in date pattern must compile")
}
