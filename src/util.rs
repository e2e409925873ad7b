// Utility helpers for parsing and basic statistics.
//
// This module centralizes all the "dirty" CSV string/date handling so the
// rest of the code can assume clean, typed values.
use std::collections::HashSet;

use chrono::NaiveDate;
use num_format::{Locale, ToFormattedString};
use once_cell::sync::Lazy;

/// Tokens accepted as "true" for the assignment flag, compared
/// case-insensitively. Anything else is falsy.
pub static TRUTHY_FLAGS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| HashSet::from(["yes", "y", "true", "1"]));

/// Date formats we accept, tried in order. ISO is the documented format;
/// the slash variants show up in spreadsheet exports often enough to keep.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// Trim an optional CSV field into a plain `String`.
///
/// Missing and empty input both become `""`: the string fields of a claim
/// are never null, only empty (the validator decides whether empty is a
/// problem).
pub fn clean_str(s: Option<&str>) -> String {
    s.unwrap_or("").trim().to_string()
}

/// Parse a calendar date, returning `None` for empty or unparsable input.
///
/// Tolerant by design: a bad date never fails the batch, it produces a
/// null field that the window filter and validator handle downstream.
pub fn parse_date_safe(s: Option<&str>) -> Option<NaiveDate> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Normalize a boolean-like flag token into an actual `bool`, once, at
/// ingestion.
pub fn is_truthy_flag(s: &str) -> bool {
    TRUTHY_FLAGS.contains(s.trim().to_ascii_lowercase().as_str())
}

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Mean of a slice of day counts, rounded to 2 decimal places.
///
/// Returns `None` for an empty slice; the caller renders that as an
/// explicit "undefined" metric instead of dividing by zero.
pub fn average_days(v: &[i64]) -> Option<f64> {
    if v.is_empty() {
        return None;
    }
    let sum: i64 = v.iter().copied().sum();
    Some(round2(sum as f64 / v.len() as f64))
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Thin wrapper around `num-format` for integer-like values, used for
    // counts in console messages (e.g., `9,855 rows loaded`).
    n.to_formatted_string(&Locale::en)
}
