//! WASM bindings for avail-engine.
//!
//! Exposes status resolution, next-window search and CSV import to the map
//! viewer via `wasm-bindgen`. The registry and import reports cross the
//! boundary as JSON strings, so the browser keeps owning application state
//! and hands a snapshot in on every call.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p avail-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir web/wasm/ \
//!   target/wasm32-unknown-unknown/release/avail_engine_wasm.wasm
//! ```

use std::collections::HashSet;

use avail_engine::date::require_date;
use avail_engine::{ImportReport, Registry};
use chrono::{DateTime, Utc};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Helpers: JSON in, JSON out
// ---------------------------------------------------------------------------

/// An empty string stands for a session with no imported data yet.
fn parse_registry(json: &str) -> Result<Registry, String> {
    if json.trim().is_empty() {
        return Ok(Registry::new());
    }
    Registry::from_json(json).map_err(|e| format!("Invalid registry JSON: {}", e))
}

fn parse_day(s: &str) -> Result<chrono::NaiveDate, String> {
    require_date(s).map_err(|e| e.to_string())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

fn validate_import_json(csv: &str, known_ids_json: &str) -> Result<String, String> {
    let known: HashSet<String> = serde_json::from_str(known_ids_json)
        .map_err(|e| format!("Invalid unit id list: {}", e))?;
    to_json(&avail_engine::parse_import(csv, &known))
}

fn merge_import_json(
    registry_json: &str,
    report_json: &str,
    updated_at: &str,
    partial: bool,
) -> Result<String, String> {
    let registry = parse_registry(registry_json)?;
    let report: ImportReport =
        serde_json::from_str(report_json).map_err(|e| format!("Invalid import report: {}", e))?;
    let updated_at = DateTime::parse_from_rfc3339(updated_at)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("Invalid timestamp '{}': {}", updated_at, e))?;

    let incoming = if partial {
        report.clean_subset()
    } else {
        report
            .all_or_nothing()
            .ok_or_else(|| format!("Import has {} unresolved issues", report.issues.len()))?
    };

    let merged = avail_engine::merge_periods(&registry, incoming, updated_at);
    to_json(&merged)
}

fn current_status_of(registry_json: &str, unit_id: &str, as_of: &str) -> Result<Option<String>, String> {
    let registry = parse_registry(registry_json)?;
    let status = avail_engine::current_status(&registry, unit_id, parse_day(as_of)?);
    Ok(status.map(|s| s.to_string()))
}

fn range_status_of(registry_json: &str, unit_id: &str, start: &str, end: &str) -> Result<String, String> {
    let registry = parse_registry(registry_json)?;
    let status = avail_engine::range_status(&registry, unit_id, parse_day(start)?, parse_day(end)?);
    Ok(status.to_string())
}

fn next_window_json(registry_json: &str, unit_id: &str, search_from: &str) -> Result<String, String> {
    let registry = parse_registry(registry_json)?;
    let window = avail_engine::next_available_window(&registry, unit_id, parse_day(search_from)?)
        .map_err(|e| e.to_string())?;
    to_json(&window)
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Validate import CSV against a JSON array of known unit ids.
///
/// Returns the import report as JSON: `{rows: [{row, unitId, period}], issues: [{row, message}]}`.
/// Bad rows are reported in `issues`, never thrown.
#[wasm_bindgen(js_name = "validateImport")]
pub fn validate_import(csv: &str, known_ids_json: &str) -> Result<String, JsValue> {
    validate_import_json(csv, known_ids_json).map_err(|e| JsValue::from_str(&e))
}

/// Merge a report from [`validate_import`] into a registry snapshot.
///
/// Returns the new registry as JSON. Unless `partial` is set, a report with
/// any issue is refused.
#[wasm_bindgen(js_name = "mergeImport")]
pub fn merge_import(
    registry_json: &str,
    report_json: &str,
    updated_at: &str,
    partial: bool,
) -> Result<String, JsValue> {
    merge_import_json(registry_json, report_json, updated_at, partial).map_err(|e| JsValue::from_str(&e))
}

/// Status on `as_of`, or `undefined` when the unit has no data.
#[wasm_bindgen(js_name = "currentStatus")]
pub fn current_status(registry_json: &str, unit_id: &str, as_of: &str) -> Result<Option<String>, JsValue> {
    current_status_of(registry_json, unit_id, as_of).map_err(|e| JsValue::from_str(&e))
}

/// Worst status across `[start, end]`.
#[wasm_bindgen(js_name = "rangeStatus")]
pub fn range_status(registry_json: &str, unit_id: &str, start: &str, end: &str) -> Result<String, JsValue> {
    range_status_of(registry_json, unit_id, start, end).map_err(|e| JsValue::from_str(&e))
}

/// Next open 28-day window as JSON `{startDate, endDate}`.
///
/// Throws when no window fits before 9999-12-31.
#[wasm_bindgen(js_name = "nextAvailableWindow")]
pub fn next_available_window(registry_json: &str, unit_id: &str, search_from: &str) -> Result<String, JsValue> {
    next_window_json(registry_json, unit_id, search_from).map_err(|e| JsValue::from_str(&e))
}

/// Canonical `YYYY-MM-DD`, or `undefined` when the input is not a date.
#[wasm_bindgen(js_name = "normalizeDate")]
pub fn normalize_date(input: &str) -> Option<String> {
    avail_engine::normalize_date(input)
}

#[wasm_bindgen(js_name = "importTemplate")]
pub fn import_template() -> String {
    avail_engine::export::template_csv()
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDS: &str = r#"["AC-10D", "BB-2"]"#;
    const CSV: &str = "unit_id,start_date,end_date,status\n\
                       AC-10D,2026-01-01,2026-01-28,sold\n\
                       BB-2,2026-02-01,2026-02-07,pending\n";

    fn merged() -> String {
        let report = validate_import_json(CSV, IDS).unwrap();
        merge_import_json("", &report, "2026-01-01T00:00:00Z", false).unwrap()
    }

    #[test]
    fn report_json_uses_camel_case_and_canonical_dates() {
        let report = validate_import_json(CSV, IDS).unwrap();
        assert!(report.contains(r#""unitId":"AC-10D""#));
        assert!(report.contains(r#""startDate":"2026-01-01""#));
        assert!(report.contains(r#""issues":[]"#));
    }

    #[test]
    fn bad_known_id_list_is_an_error() {
        assert!(validate_import_json(CSV, "not json").is_err());
    }

    #[test]
    fn merge_refuses_reports_with_issues_unless_partial() {
        let csv = format!("{CSV}ZZ-99,2026-01-01,2026-01-28,sold\n");
        let report = validate_import_json(&csv, IDS).unwrap();

        let err = merge_import_json("", &report, "2026-01-01T00:00:00Z", false).unwrap_err();
        assert!(err.contains("1 unresolved issues"));

        let registry = merge_import_json("", &report, "2026-01-01T00:00:00Z", true).unwrap();
        assert_eq!(Registry::from_json(&registry).unwrap().len(), 2);
    }

    #[test]
    fn merge_rejects_bad_timestamp() {
        let report = validate_import_json(CSV, IDS).unwrap();
        assert!(merge_import_json("", &report, "yesterday", false).is_err());
    }

    #[test]
    fn queries_run_against_merged_snapshot() {
        let registry = merged();

        assert_eq!(
            current_status_of(&registry, "AC-10D", "01/15/2026").unwrap().as_deref(),
            Some("sold")
        );
        assert_eq!(current_status_of(&registry, "NY-7", "2026-01-15").unwrap(), None);
        assert_eq!(range_status_of(&registry, "BB-2", "2026-01-20", "2026-02-03").unwrap(), "pending");
        assert_eq!(
            next_window_json(&registry, "AC-10D", "2026-01-01").unwrap(),
            r#"{"startDate":"2026-01-29","endDate":"2026-02-25"}"#
        );
    }

    #[test]
    fn window_search_past_the_calendar_is_an_error() {
        let registry = r#"{"AC-10D": {
            "unitId": "AC-10D",
            "periods": [{"startDate": "2026-01-01", "endDate": "+262142-12-31", "status": "sold"}],
            "lastUpdated": "2026-01-01T00:00:00Z"
        }}"#;
        let err = next_window_json(registry, "AC-10D", "2026-01-01").unwrap_err();
        assert!(err.starts_with("No booking window"), "{err}");

        assert!(next_window_json("", "AC-10D", "9999-12-20").is_err());
    }

    #[test]
    fn registry_with_mismatched_key_is_an_error() {
        let registry = r#"{"NY-7": {"unitId": "AC-10D", "periods": [], "lastUpdated": "2026-01-01T00:00:00Z"}}"#;
        let err = current_status_of(registry, "NY-7", "2026-01-01").unwrap_err();
        assert!(err.starts_with("Invalid registry JSON"), "{err}");
    }

    #[test]
    fn bad_query_date_is_an_error() {
        assert!(current_status_of("", "AC-10D", "soon").is_err());
        assert!(range_status_of("{not json", "AC-10D", "2026-01-01", "2026-01-02").is_err());
    }

    #[test]
    fn normalize_and_template_pass_through() {
        assert_eq!(normalize_date("2/1/2026").as_deref(), Some("2026-02-01"));
        assert_eq!(normalize_date("nope"), None);
        assert!(import_template().starts_with("unit_id,"));
    }
}
