//! Catalog filtering by market, unit type and booking availability.

use chrono::NaiveDate;

use crate::catalog::{Unit, UnitCatalog};
use crate::period::{Registry, Status};
use crate::resolver::range_status;

/// Keep units whose worst status over `[start, end]` is one of `statuses`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityConstraint {
    pub statuses: Vec<Status>,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Unset fields match everything. Market and type compare case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitFilter {
    pub market: Option<String>,
    pub unit_type: Option<String>,
    pub availability: Option<AvailabilityConstraint>,
}

impl UnitFilter {
    pub fn matches(&self, unit: &Unit, registry: &Registry) -> bool {
        let text_matches = |wanted: &Option<String>, actual: &str| {
            wanted
                .as_deref()
                .is_none_or(|w| w.trim().eq_ignore_ascii_case(actual.trim()))
        };

        text_matches(&self.market, &unit.market)
            && text_matches(&self.unit_type, &unit.unit_type)
            && self.availability.as_ref().is_none_or(|c| {
                c.statuses
                    .contains(&range_status(registry, &unit.id, c.start, c.end))
            })
    }
}

/// Catalog units matching `filter`, in catalog order.
pub fn filter_units<'a>(catalog: &'a UnitCatalog, registry: &Registry, filter: &UnitFilter) -> Vec<&'a Unit> {
    catalog
        .iter()
        .filter(|unit| filter.matches(unit, registry))
        .collect()
}
