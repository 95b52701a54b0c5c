//! CSV output in the layout [`parse_import`](crate::import::parse_import) reads.

use crate::date::format_date;
use crate::period::Registry;

/// Canonical header, in column order.
pub const HEADER: &str = "unit_id,start_date,end_date,status,client,notes";

/// Header plus one sample row, for users preparing an import by hand.
pub fn template_csv() -> String {
    format!("{HEADER}\nAC-10D,2026-02-01,2026-02-28,sold,Acme Co,\"Q1 flight, digital\"\n")
}

/// Every period in the registry, units in id order, periods in list order.
pub fn export_csv(registry: &Registry) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');

    for unit in registry.iter() {
        for period in &unit.periods {
            let fields = [
                quote(&unit.unit_id),
                format_date(period.start_date),
                format_date(period.end_date),
                period.status.to_string(),
                quote(period.client.as_deref().unwrap_or("")),
                quote(period.notes.as_deref().unwrap_or("")),
            ];
            out.push_str(&fields.join(","));
            out.push('\n');
        }
    }

    out
}

fn quote(value: &str) -> String {
    if value.contains([',', '"']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
