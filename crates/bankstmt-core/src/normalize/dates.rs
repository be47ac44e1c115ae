//! Date normalization to `YYYY-MM-DD`.

use chrono::NaiveDate;

use super::patterns::{DATE_DAY_FIRST, DATE_MONTH_FIRST, DATE_NUMERIC, DATE_TOKEN, DATE_YMD, ISO_DATE, MONTHS};
use crate::models::statement::UNKNOWN;

/// Normalize a date fragment to `YYYY-MM-DD`, or `"unknown"`.
///
/// Forms are tried in a fixed order: `YYYY-M-D`, a numeric `A-B-Y` triple,
/// then `Mon D, YYYY` and `D Mon YYYY`. A form that matches but does not name
/// a real calendar day falls through to the next one.
pub fn to_iso_date(raw: &str) -> String {
    let s = raw.trim();
    if s.is_empty() {
        return UNKNOWN.to_string();
    }

    parse_ymd(s)
        .or_else(|| parse_numeric_triple(s))
        .or_else(|| parse_month_first(s))
        .or_else(|| parse_day_first(s))
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// Whether a value is a real `YYYY-MM-DD` date.
pub fn is_iso_date(value: &str) -> bool {
    ISO_DATE.is_match(value) && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

/// Every date-shaped token in `text`, normalized, skipping ones that do not
/// resolve.
pub fn find_iso_dates(text: &str) -> Vec<String> {
    DATE_TOKEN
        .find_iter(text)
        .map(|m| to_iso_date(m.as_str()))
        .filter(|d| d != UNKNOWN)
        .collect()
}

fn parse_ymd(s: &str) -> Option<NaiveDate> {
    let caps = DATE_YMD.captures(s)?;
    let year: i32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let day: u32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// `A-B-Y`: a first component above 12 can only be a day (D-M-Y). In every
/// other case, including both components being 12 or less, the triple is
/// read month first (M-D-Y).
fn parse_numeric_triple(s: &str) -> Option<NaiveDate> {
    let caps = DATE_NUMERIC.captures(s)?;
    let first: u32 = caps[1].parse().ok()?;
    let second: u32 = caps[2].parse().ok()?;
    let year = expand_year(&caps[3])?;

    let (month, day) = if first > 12 {
        (second, first)
    } else {
        (first, second)
    };

    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_month_first(s: &str) -> Option<NaiveDate> {
    let caps = DATE_MONTH_FIRST.captures(s)?;
    let month = month_number(&caps[1])?;
    let day: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_day_first(s: &str) -> Option<NaiveDate> {
    let caps = DATE_DAY_FIRST.captures(s)?;
    let day: u32 = caps[1].parse().ok()?;
    let month = month_number(&caps[2])?;
    let year: i32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Two-digit years are always read as 20YY.
fn expand_year(s: &str) -> Option<i32> {
    let year: i32 = s.parse().ok()?;
    if s.len() == 2 {
        Some(2000 + year)
    } else {
        Some(year)
    }
}

fn month_number(name: &str) -> Option<u32> {
    let name = name.to_lowercase();
    MONTHS
        .iter()
        .find(|(abbr, _)| name.starts_with(abbr))
        .map(|(_, number)| *number)
}
