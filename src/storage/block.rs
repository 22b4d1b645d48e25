//! Line format of the cache file.
//!
//! Each year is one block of exactly four lines:
//!
//! ```text
//! 2024
//! 2024-01-01,2024-02-10,2024-02-11
//! 2024-02-04,2024-02-18
//! ---------------
//! ```

use chrono::NaiveDate;

use crate::error::{AppError, Result};
use crate::models::YearRecord;
use crate::utils::{DATE_FORMAT, parse_date};

/// Line that terminates every block.
pub const RECORD_SEPARATOR: &str = "---------------";

/// Serialize one record as a separator-terminated block.
pub fn encode(record: &YearRecord) -> String {
    format!(
        "{}\n{}\n{}\n{}\n",
        record.year,
        join_dates(&record.holidays),
        join_dates(&record.workdays),
        RECORD_SEPARATOR
    )
}

/// Read every well-formed block in file order.
///
/// Malformed blocks are skipped with a warning. Lines after the last
/// separator form an unfinished block and are ignored.
pub fn decode(content: &str) -> Vec<YearRecord> {
    let mut records = Vec::new();
    let mut lines: Vec<&str> = Vec::with_capacity(3);

    for line in content.lines() {
        if line != RECORD_SEPARATOR {
            lines.push(line);
            continue;
        }
        match parse_block(&lines) {
            Ok(record) => records.push(record),
            Err(e) => log::warn!("Skipping malformed cache block: {}", e),
        }
        lines.clear();
    }

    if lines.iter().any(|l| !l.trim().is_empty()) {
        log::warn!("Ignoring unterminated cache block ({} lines)", lines.len());
    }
    records
}

/// Split content into raw separator-terminated blocks, bytes untouched.
///
/// Lines after the last separator are not returned.
pub fn raw_blocks(content: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut start = 0;
    let mut end = 0;

    for line in content.split_inclusive('\n') {
        end += line.len();
        if line.trim_end_matches(['\r', '\n']) == RECORD_SEPARATOR {
            blocks.push(&content[start..end]);
            start = end;
        }
    }
    blocks
}

/// Year named on the first line of a raw block, if it parses.
pub fn block_year(raw: &str) -> Option<i32> {
    raw.lines().next()?.trim().parse().ok()
}

fn parse_block(lines: &[&str]) -> Result<YearRecord> {
    let [year, holidays, workdays] = lines else {
        return Err(AppError::validation(format!(
            "expected 3 lines before separator, found {}",
            lines.len()
        )));
    };

    let year = year
        .trim()
        .parse()
        .map_err(|_| AppError::validation(format!("bad year line '{year}'")))?;

    Ok(YearRecord {
        year,
        holidays: split_dates(holidays)?,
        workdays: split_dates(workdays)?,
    })
}

fn split_dates(line: &str) -> Result<Vec<NaiveDate>> {
    line.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_date)
        .collect()
}

fn join_dates(dates: &[NaiveDate]) -> String {
    dates
        .iter()
        .map(|d| d.format(DATE_FORMAT).to_string())
        .collect::<Vec<_>>()
        .join(",")
}
