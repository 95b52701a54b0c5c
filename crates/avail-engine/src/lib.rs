//! # avail-engine
//!
//! Booking availability for a catalog of out-of-home advertising units.
//!
//! Each unit carries a list of possibly overlapping, date-bounded periods
//! (`available`, `pending`, `hold`, `sold`). The engine answers what a unit's
//! status is on a date or across a range, finds the next open booking window,
//! and turns user-supplied CSV into validated periods that are merged into a
//! registry without discarding what was already known.
//!
//! All operations are pure: the registry is passed in explicitly and merges
//! return a new one.
//!
//! ## Modules
//!
//! - [`period`] — `Status`, `AvailabilityPeriod`, `UnitAvailability`, `Registry`
//! - [`date`] — Date parsing and canonical `YYYY-MM-DD` normalization
//! - [`resolver`] — Point-in-time and worst-case range status
//! - [`gaps`] — Next open 28-day window search
//! - [`import`] — CSV validation into periods and per-row issues
//! - [`merge`] — Append validated periods to a registry
//! - [`catalog`] — Unit inventory and the known-id set
//! - [`filter`] — Market / type / availability filtering
//! - [`export`] — Registry → CSV and the import template
//! - [`error`] — Error types

pub mod catalog;
pub mod date;
pub mod error;
pub mod export;
pub mod filter;
pub mod gaps;
pub mod import;
pub mod merge;
pub mod period;
pub mod resolver;

pub use catalog::{Unit, UnitCatalog};
pub use date::{normalize_date, parse_date};
pub use error::AvailError;
pub use gaps::{next_available_window, BookingWindow, MAX_WINDOW_DAYS, STANDARD_WINDOW_DAYS};
pub use import::{parse_import, ImportIssue, ImportReport, PeriodsByUnit};
pub use merge::merge_periods;
pub use period::{AvailabilityPeriod, Registry, Status, UnitAvailability};
pub use resolver::{current_status, range_status};
