//! Next open booking window search.
//!
//! Only blocking periods (`sold`, `hold`) obstruct a new proposal. They are
//! walked in start-date order with a cursor that only ever moves forward, so a
//! short period nested inside a longer one cannot pull the cursor back into
//! the longer period.
//!
//! Windows never run past 9999-12-31, the last day with a canonical
//! `YYYY-MM-DD` rendering. When no window fits before then the search fails
//! with [`AvailError::NoWindow`].

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::date::format_date;
use crate::error::{AvailError, Result};
use crate::period::Registry;

/// Length of a standard booking flight.
pub const STANDARD_WINDOW_DAYS: u32 = 28;

/// Longest window [`next_window_of`] will search for (about ten years).
pub const MAX_WINDOW_DAYS: u32 = 3650;

const LAST_CANONICAL_YEAR: i32 = 9999;

/// An inclusive `[start_date, end_date]` booking window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingWindow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl BookingWindow {
    /// `days` consecutive days from `start_date`, if they all fall on or
    /// before 9999-12-31.
    fn starting_at(start_date: NaiveDate, days: u32) -> Result<Self> {
        start_date
            .checked_add_days(Days::new(u64::from(days) - 1))
            .filter(|end| end.year() <= LAST_CANONICAL_YEAR)
            .map(|end_date| Self {
                start_date,
                end_date,
            })
            .ok_or_else(|| past_last_day(start_date, days))
    }
}

fn past_last_day(start: NaiveDate, days: u32) -> AvailError {
    AvailError::NoWindow(format!(
        "a {}-day window from {} would run past 9999-12-31",
        days,
        format_date(start)
    ))
}

/// Earliest standard 28-day window on or after `search_from` that does not
/// overlap any sold or held period.
///
/// Fails only when the open days left before 9999-12-31 are too few.
pub fn next_available_window(
    registry: &Registry,
    unit_id: &str,
    search_from: NaiveDate,
) -> Result<BookingWindow> {
    next_window_of(registry, unit_id, search_from, STANDARD_WINDOW_DAYS)
}

/// Like [`next_available_window`] for a window of `days` days.
///
/// `0` is read as a one-day window. Lengths above [`MAX_WINDOW_DAYS`] are
/// rejected.
pub fn next_window_of(
    registry: &Registry,
    unit_id: &str,
    search_from: NaiveDate,
    days: u32,
) -> Result<BookingWindow> {
    if days > MAX_WINDOW_DAYS {
        return Err(AvailError::NoWindow(format!(
            "window length {} exceeds {} days",
            days, MAX_WINDOW_DAYS
        )));
    }
    let days = days.max(1);

    let mut blocking: Vec<(NaiveDate, NaiveDate)> = registry
        .periods(unit_id)
        .iter()
        .filter(|p| p.status.is_blocking())
        .map(|p| (p.start_date, p.end_date))
        .collect();

    if blocking.is_empty() {
        return BookingWindow::starting_at(search_from, days);
    }

    blocking.sort_by_key(|&(start, end)| (start, end));

    let mut cursor = search_from;
    for (start, end) in blocking {
        if cursor < start {
            let candidate = BookingWindow::starting_at(cursor, days)?;
            if candidate.end_date < start {
                return Ok(candidate);
            }
        }
        // Skip past the obstruction. Periods already behind the cursor leave it alone.
        if cursor <= end {
            cursor = end.succ_opt().ok_or_else(|| past_last_day(end, days))?;
        }
    }

    BookingWindow::starting_at(cursor, days)
}
