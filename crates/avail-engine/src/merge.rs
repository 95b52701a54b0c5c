//! Merging imported periods into a registry.

use chrono::{DateTime, Utc};

use crate::import::PeriodsByUnit;
use crate::period::{Registry, UnitAvailability};

/// Return a new registry with `incoming` appended to each unit's periods.
///
/// Existing periods are never replaced or deduplicated: a unit's period count
/// after the merge is its old count plus the number of incoming periods.
/// Touched units get `last_updated = updated_at`; a unit seen for the first
/// time gets a new entry. The input registry is left as it was.
///
/// Whether to merge a partially failed import is the caller's decision; see
/// [`ImportReport::clean_subset`](crate::import::ImportReport::clean_subset)
/// and [`ImportReport::all_or_nothing`](crate::import::ImportReport::all_or_nothing).
pub fn merge_periods(registry: &Registry, incoming: PeriodsByUnit, updated_at: DateTime<Utc>) -> Registry {
    let mut merged = registry.clone();
    let mut appended = 0usize;
    let mut touched = 0usize;

    for (unit_id, periods) in incoming {
        if periods.is_empty() {
            continue;
        }
        appended += periods.len();
        touched += 1;

        let entry = match registry.get(&unit_id) {
            Some(existing) => {
                let mut all = existing.periods.clone();
                all.extend(periods);
                UnitAvailability {
                    unit_id,
                    periods: all,
                    last_updated: updated_at,
                }
            }
            None => UnitAvailability {
                unit_id,
                periods,
                last_updated: updated_at,
            },
        };
        merged = merged.with_entry(entry);
    }

    tracing::debug!("merged {appended} periods into {touched} units");
    merged
}
