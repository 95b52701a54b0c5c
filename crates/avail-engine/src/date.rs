//! Calendar date parsing and canonical `YYYY-MM-DD` normalization.
//!
//! Dates are held as [`NaiveDate`] everywhere in the engine. Its ordering is the
//! same as the lexicographic ordering of the canonical string, which only holds
//! because the canonical form is fixed-width and big-endian, so years outside
//! `1000..=9999` are rejected at the parsing boundary.

use crate::error::{AvailError, Result};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

/// Canonical storage and comparison format.
pub const CANONICAL_FORMAT: &str = "%Y-%m-%d";

/// Month-name layouts, tried after the numeric ones. chrono's `%b` also
/// accepts full month names when parsing.
const NAMED_MONTH_FORMATS: &[&str] = &["%b %d, %Y", "%b %d %Y", "%d %b %Y", "%d %b, %Y"];

/// Zone-less ISO datetimes. `%.f` also matches no fraction at all.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a calendar date from any of the accepted input layouts.
///
/// Accepted:
/// - `2026-02-01`, `2026/2/1` (year first)
/// - `02/01/2026`, `2-1-2026`, `02/01/26` (US month-day-year; two-digit years are 20xx)
/// - `2026-02-01T10:00:00Z`, `2026-02-01 10:00` and other ISO datetimes
///   (the time must be valid but is otherwise ignored; with an offset, the
///   date as written is kept)
/// - `Feb 1, 2026`, `February 1 2026`, `1 Feb 2026`
///
/// Returns `None` for anything else, including impossible dates like `2026-02-30`.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    let date = if looks_like_iso_datetime(s) {
        parse_iso_datetime(s)
    } else {
        parse_numeric(s).or_else(|| {
            NAMED_MONTH_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        })
    };
    date.filter(|d| (1000..=9999).contains(&d.year()))
}

/// Normalize any accepted date string to canonical `YYYY-MM-DD`.
///
/// `normalize_date(normalize_date(x)) == normalize_date(x)` for every input.
pub fn normalize_date(input: &str) -> Option<String> {
    parse_date(input).map(format_date)
}

/// Render a date in canonical form.
pub fn format_date(date: NaiveDate) -> String {
    date.format(CANONICAL_FORMAT).to_string()
}

/// Parse a date supplied as a query argument, where a bad value is the
/// caller's mistake rather than data to report.
pub fn require_date(input: &str) -> Result<NaiveDate> {
    parse_date(input).ok_or_else(|| AvailError::InvalidDate(input.to_string()))
}

/// `YYYY-MM-DD` followed by `T` or a space.
fn looks_like_iso_datetime(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() > 10 && b[4] == b'-' && b[7] == b'-' && matches!(b[10], b'T' | b' ')
}

fn parse_iso_datetime(s: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
}

/// Three all-digit parts separated by `-` or `/`.
fn parse_numeric(s: &str) -> Option<NaiveDate> {
    let sep = if s.contains('/') { '/' } else { '-' };
    let parts: Vec<&str> = s.split(sep).collect();
    if parts.len() != 3
        || parts
            .iter()
            .any(|p| p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit()))
    {
        return None;
    }

    let (year, month, day) = if parts[0].len() == 4 {
        (parts[0], parts[1], parts[2])
    } else {
        (parts[2], parts[0], parts[1])
    };

    if month.len() > 2 || day.len() > 2 {
        return None;
    }

    let year: i32 = match year.len() {
        4 => year.parse().ok()?,
        2 => 2000 + year.parse::<i32>().ok()?,
        _ => return None,
    };

    NaiveDate::from_ymd_opt(year, month.parse().ok()?, day.parse().ok()?)
}
