//! Point-in-time and range status queries over a unit's period list.
//!
//! Units without a registry entry have no data. The point query reports that
//! as `None` so callers can show a "no data" badge; the range query folds it
//! into `available`.

use chrono::NaiveDate;

use crate::period::{AvailabilityPeriod, Registry, Status};

/// Status of `unit_id` on `as_of`.
///
/// - `None` when the unit has no registry entry.
/// - The status of the first period in list order that contains `as_of`.
///   Overlapping periods are NOT ranked by severity here, unlike
///   [`range_status`].
/// - `Some(Status::Available)` when the unit has data but no period covers the date.
pub fn current_status(registry: &Registry, unit_id: &str, as_of: NaiveDate) -> Option<Status> {
    let entry = registry.get(unit_id)?;

    // TODO: decide with product whether this should rank by severity like range_status.
    let status = entry
        .periods
        .iter()
        .find(|p| p.contains(as_of))
        .map(|p| p.status)
        .unwrap_or(Status::Available);

    Some(status)
}

/// Worst status among the periods overlapping `[start, end]` (inclusive).
///
/// Returns `available` when the unit has no entry, no periods, or nothing
/// overlaps. Reversed bounds are swapped rather than treated as empty.
pub fn range_status(registry: &Registry, unit_id: &str, start: NaiveDate, end: NaiveDate) -> Status {
    let (start, end) = ordered(start, end);

    registry
        .periods(unit_id)
        .iter()
        .filter(|p| p.overlaps(start, end))
        .map(|p| p.status)
        .max()
        .unwrap_or(Status::Available)
}

/// Periods containing `date`, in list order.
pub fn periods_on<'a>(
    registry: &'a Registry,
    unit_id: &str,
    date: NaiveDate,
) -> Vec<&'a AvailabilityPeriod> {
    registry
        .periods(unit_id)
        .iter()
        .filter(|p| p.contains(date))
        .collect()
}

/// Periods overlapping `[start, end]`, in list order.
pub fn periods_overlapping<'a>(
    registry: &'a Registry,
    unit_id: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<&'a AvailabilityPeriod> {
    let (start, end) = ordered(start, end);
    registry
        .periods(unit_id)
        .iter()
        .filter(|p| p.overlaps(start, end))
        .collect()
}

fn ordered(a: NaiveDate, b: NaiveDate) -> (NaiveDate, NaiveDate) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
