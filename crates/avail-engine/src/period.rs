//! Booking periods, per-unit period lists, and the session registry.
//!
//! Periods are immutable value records. A unit's period list is a set in
//! practice: nothing may assume it is sorted or that its periods are disjoint,
//! since a `pending` hold can legitimately sit on top of a `sold` flight.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AvailError;

/// Booking status of a unit over a period.
///
/// Ordered by severity: `available < pending < hold < sold`. When periods
/// overlap, the greatest status is the worst case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Available,
    Sold,
    Hold,
    Pending,
}

impl Status {
    pub const ALL: [Status; 4] = [Status::Available, Status::Sold, Status::Hold, Status::Pending];

    /// Fixed severity table: sold(4) > hold(3) > pending(2) > available(1).
    pub fn severity(self) -> u8 {
        match self {
            Status::Sold => 4,
            Status::Hold => 3,
            Status::Pending => 2,
            Status::Available => 1,
        }
    }

    /// Sold and held inventory blocks a new proposal; pending and available do not.
    pub fn is_blocking(self) -> bool {
        matches!(self, Status::Sold | Status::Hold)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Available => "available",
            Status::Sold => "sold",
            Status::Hold => "hold",
            Status::Pending => "pending",
        }
    }
}

impl Ord for Status {
    fn cmp(&self, other: &Self) -> Ordering {
        self.severity().cmp(&other.severity())
    }
}

impl PartialOrd for Status {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = AvailError;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == lowered)
            .ok_or_else(|| AvailError::InvalidStatus(s.to_string()))
    }
}

/// One booking interval for one unit. Both ends are inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityPeriod {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: Status,
    /// Only meaningful for `sold` and `hold`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl AvailabilityPeriod {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate, status: Status) -> Self {
        Self {
            start_date,
            end_date,
            status,
            client: None,
            notes: None,
        }
    }

    pub fn with_client(self, client: impl Into<String>) -> Self {
        Self {
            client: Some(client.into()),
            ..self
        }
    }

    pub fn with_notes(self, notes: impl Into<String>) -> Self {
        Self {
            notes: Some(notes.into()),
            ..self
        }
    }

    /// `start_date <= date <= end_date`.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Inclusive-interval overlap with `[start, end]`.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start_date <= end && self.end_date >= start
    }
}

/// Every known period for one unit, plus when the list last changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitAvailability {
    pub unit_id: String,
    pub periods: Vec<AvailabilityPeriod>,
    pub last_updated: DateTime<Utc>,
}

/// Session-lifetime mapping from unit id to its availability.
///
/// A unit with no entry has no data, which display code treats as open
/// inventory. Merges build a new registry instead of mutating this one
/// (see [`merge_periods`](crate::merge::merge_periods)).
///
/// Serialized as a plain object keyed by unit id. Deserializing rejects an
/// entry whose key differs from its `unitId`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, UnitAvailability>",
    into = "BTreeMap<String, UnitAvailability>"
)]
pub struct Registry {
    units: BTreeMap<String, UnitAvailability>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, unit_id: &str) -> Option<&UnitAvailability> {
        self.units.get(unit_id)
    }

    /// The unit's periods, or an empty slice when it has no entry.
    pub fn periods(&self, unit_id: &str) -> &[AvailabilityPeriod] {
        self.units
            .get(unit_id)
            .map(|u| u.periods.as_slice())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Entries in unit-id order.
    pub fn iter(&self) -> impl Iterator<Item = &UnitAvailability> {
        self.units.values()
    }

    /// Parse a registry snapshot previously produced by [`Registry::to_json`].
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub(crate) fn with_entry(mut self, entry: UnitAvailability) -> Self {
        self.units.insert(entry.unit_id.clone(), entry);
        self
    }
}

impl TryFrom<BTreeMap<String, UnitAvailability>> for Registry {
    type Error = AvailError;

    fn try_from(units: BTreeMap<String, UnitAvailability>) -> Result<Self, Self::Error> {
        if let Some((key, entry)) = units.iter().find(|(key, entry)| key.as_str() != entry.unit_id) {
            return Err(AvailError::InvalidRegistry(format!(
                "entry stored under \"{}\" has unitId \"{}\"",
                key, entry.unit_id
            )));
        }
        Ok(Self { units })
    }
}

impl From<Registry> for BTreeMap<String, UnitAvailability> {
    fn from(registry: Registry) -> Self {
        registry.units
    }
}

impl FromIterator<UnitAvailability> for Registry {
    fn from_iter<I: IntoIterator<Item = UnitAvailability>>(iter: I) -> Self {
        Self {
            units: iter.into_iter().map(|u| (u.unit_id.clone(), u)).collect(),
        }
    }
}
