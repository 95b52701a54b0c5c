//! Availability import: comma-separated text → validated periods + issues.
//!
//! Bad input never aborts the parse. Each rejected row yields exactly one
//! [`ImportIssue`] (the first check it fails) and the remaining rows carry
//! on independently. The only whole-file failure is a header that lacks a
//! required column, reported once as row 0.
//!
//! Row numbers are physical line numbers: the header is row 1, so the first
//! data row is row 2. Blank lines are skipped without renumbering.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::date::parse_date;
use crate::period::{AvailabilityPeriod, Status};

/// Validated periods grouped by unit id, ready for
/// [`merge_periods`](crate::merge::merge_periods).
pub type PeriodsByUnit = BTreeMap<String, Vec<AvailabilityPeriod>>;

/// One problem found while importing. `row` 0 means the file as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportIssue {
    pub row: usize,
    pub message: String,
}

impl ImportIssue {
    /// A file-level issue (missing columns, unreadable file).
    pub fn file_level(message: impl Into<String>) -> Self {
        Self {
            row: 0,
            message: message.into(),
        }
    }

    fn at(row: usize, message: impl Into<String>) -> Self {
        Self {
            row,
            message: message.into(),
        }
    }
}

impl fmt::Display for ImportIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.row == 0 {
            write!(f, "file: {}", self.message)
        } else {
            write!(f, "row {}: {}", self.row, self.message)
        }
    }
}

/// A row that passed validation, with dates already normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportedRow {
    pub row: usize,
    pub unit_id: String,
    pub period: AvailabilityPeriod,
}

/// Outcome of [`parse_import`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportReport {
    pub rows: Vec<ImportedRow>,
    pub issues: Vec<ImportIssue>,
}

impl ImportReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Every validated row, whatever else failed.
    pub fn clean_subset(&self) -> PeriodsByUnit {
        group_by_unit(&self.rows)
    }

    /// Validated rows only if no issue was found anywhere.
    pub fn all_or_nothing(&self) -> Option<PeriodsByUnit> {
        self.is_clean().then(|| group_by_unit(&self.rows))
    }
}

/// Import columns and the header spellings that select them.
///
/// Header cells are compared after lowercasing and dropping spaces,
/// underscores and hyphens, so `Unit ID`, `unit_id` and `unit-id` all match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    UnitId,
    StartDate,
    EndDate,
    Status,
    Client,
    Notes,
}

impl Column {
    const REQUIRED: [Column; 4] = [
        Column::UnitId,
        Column::StartDate,
        Column::EndDate,
        Column::Status,
    ];

    fn synonyms(self) -> &'static [&'static str] {
        match self {
            Column::UnitId => &["unitid", "id", "unit", "unitcode"],
            Column::StartDate => &["startdate", "start", "from", "flightstart"],
            Column::EndDate => &["enddate", "end", "to", "flightend"],
            Column::Status => &["status", "availability", "state"],
            Column::Client => &["client", "advertiser", "brand"],
            Column::Notes => &["notes", "note", "comments", "comment"],
        }
    }

    fn label(self) -> &'static str {
        match self {
            Column::UnitId => "unit id",
            Column::StartDate => "start date",
            Column::EndDate => "end date",
            Column::Status => "status",
            Column::Client => "client",
            Column::Notes => "notes",
        }
    }
}

/// Resolved header positions.
struct ColumnMap {
    unit_id: usize,
    start_date: usize,
    end_date: usize,
    status: usize,
    client: Option<usize>,
    notes: Option<usize>,
}

impl ColumnMap {
    fn resolve(header: &[String]) -> Result<Self, ImportIssue> {
        let keys: Vec<String> = header.iter().map(|h| header_key(h)).collect();
        let find = |column: Column| {
            keys.iter()
                .position(|k| column.synonyms().contains(&k.as_str()))
        };

        let missing: Vec<&str> = Column::REQUIRED
            .into_iter()
            .filter(|c| find(*c).is_none())
            .map(Column::label)
            .collect();
        if !missing.is_empty() {
            return Err(ImportIssue::file_level(format!(
                "missing required columns: {}",
                missing.join(", ")
            )));
        }

        Ok(Self {
            unit_id: find(Column::UnitId).unwrap_or_default(),
            start_date: find(Column::StartDate).unwrap_or_default(),
            end_date: find(Column::EndDate).unwrap_or_default(),
            status: find(Column::Status).unwrap_or_default(),
            client: find(Column::Client),
            notes: find(Column::Notes),
        })
    }
}

fn header_key(cell: &str) -> String {
    cell.chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Parse and validate import text against the set of known unit ids.
///
/// Per row, checks run in order and stop at the first failure:
/// unit id present, unit id known, start date, end date, status, and
/// finally that the end date is not before the start date.
pub fn parse_import(text: &str, known_ids: &HashSet<String>) -> ImportReport {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut lines = text
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line))
        .filter(|(_, line)| !line.trim().is_empty());

    let Some((_, header_line)) = lines.next() else {
        tracing::debug!("import rejected: no header row");
        return ImportReport {
            rows: Vec::new(),
            issues: vec![ImportIssue::file_level("file is empty")],
        };
    };

    let columns = match ColumnMap::resolve(&split_fields(header_line)) {
        Ok(columns) => columns,
        Err(issue) => {
            tracing::debug!("import rejected: {}", issue.message);
            return ImportReport {
                rows: Vec::new(),
                issues: vec![issue],
            };
        }
    };

    let mut report = ImportReport::default();
    for (row, line) in lines {
        let fields = split_fields(line);
        match validate_row(row, &fields, &columns, known_ids) {
            Ok(imported) => report.rows.push(imported),
            Err(message) => {
                tracing::trace!("row {row} rejected: {message}");
                report.issues.push(ImportIssue::at(row, message));
            }
        }
    }

    tracing::debug!(
        "import parsed: {} rows accepted, {} issues",
        report.rows.len(),
        report.issues.len()
    );
    report
}

fn validate_row(
    row: usize,
    fields: &[String],
    columns: &ColumnMap,
    known_ids: &HashSet<String>,
) -> Result<ImportedRow, String> {
    let get = |idx: usize| fields.get(idx).map(String::as_str).unwrap_or("");
    let optional = |idx: Option<usize>| {
        idx.map(get)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    let unit_id = get(columns.unit_id);
    if unit_id.is_empty() {
        return Err("missing unit ID".to_string());
    }
    if !known_ids.contains(unit_id) {
        return Err(format!("unknown unit ID: {unit_id}"));
    }
    let start_date = parse_date(get(columns.start_date)).ok_or("invalid start date")?;
    let end_date = parse_date(get(columns.end_date)).ok_or("invalid end date")?;
    let status: Status = get(columns.status)
        .parse()
        .map_err(|_| "invalid status".to_string())?;
    if end_date < start_date {
        return Err("end date before start date".to_string());
    }

    Ok(ImportedRow {
        row,
        unit_id: unit_id.to_string(),
        period: AvailabilityPeriod {
            start_date,
            end_date,
            status,
            client: optional(columns.client),
            notes: optional(columns.notes),
        },
    })
}

/// Split one line on unquoted commas.
///
/// A `"` toggles quoting and is dropped from the value; inside quotes, `""`
/// is a literal quote. Values are trimmed.
pub fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    fields.push(current.trim().to_string());

    fields
}

/// Group validated rows by unit id, keeping file order within each unit.
pub fn group_by_unit(rows: &[ImportedRow]) -> PeriodsByUnit {
    let mut grouped = PeriodsByUnit::new();
    for row in rows {
        grouped
            .entry(row.unit_id.clone())
            .or_default()
            .push(row.period.clone());
    }
    grouped
}
