//! `avail` CLI — validate availability imports and query unit status from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Validate an import file against the inventory
//! avail --catalog inventory.json import -i bookings.csv
//!
//! # Validate and merge into a registry snapshot (blocked while any row is bad)
//! avail --catalog inventory.json --registry registry.json import -i bookings.csv --merge
//!
//! # Merge only the rows that passed
//! avail --catalog inventory.json --registry registry.json import -i bookings.csv --merge --partial
//!
//! # Status today, worst status over a flight, next open 4-week window
//! avail --registry registry.json status AC-10D
//! avail --registry registry.json range AC-10D 2026-02-01 2026-02-28
//! avail --registry registry.json next-window AC-10D --from 2026-02-01
//!
//! # Units in a market that are open for a flight
//! avail --catalog inventory.json --registry registry.json list --market Atlanta \
//!     --status available --start 2026-03-01 --end 2026-03-28
//! ```
//!
//! `--catalog` and `--registry` fall back to `AVAIL_CATALOG` and `AVAIL_REGISTRY`.
//! Logs go to stderr; set `RUST_LOG` or pass `-v` for more detail.

use std::io::{self, Read};
use std::path::Path;
use std::process;

use anyhow::{Context, Result};
use avail_engine::date::{format_date, require_date};
use avail_engine::export::{export_csv, template_csv};
use avail_engine::filter::{filter_units, AvailabilityConstraint, UnitFilter};
use avail_engine::gaps::next_window_of;
use avail_engine::{
    current_status, merge_periods, parse_import, range_status, ImportIssue, Registry, Status,
    UnitCatalog, STANDARD_WINDOW_DAYS,
};
use chrono::{Local, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "avail",
    version,
    about = "Booking availability for out-of-home advertising inventory"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Inventory JSON listing the known units [env: AVAIL_CATALOG]
    #[arg(long, global = true)]
    catalog: Option<String>,

    /// Registry snapshot JSON to read (and, for merges, write) [env: AVAIL_REGISTRY]
    #[arg(long, global = true)]
    registry: Option<String>,

    /// Log engine activity at debug level
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate availability CSV against the catalog, optionally merging it
    Import {
        /// Input CSV (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Merge the validated rows into the registry
        #[arg(long)]
        merge: bool,
        /// With --merge, merge the valid rows even when other rows failed
        #[arg(long, requires = "merge")]
        partial: bool,
        /// Where to write the merged registry (defaults to --registry, else stdout,
        /// with the report moved to stderr)
        #[arg(short, long, requires = "merge")]
        output: Option<String>,
    },
    /// Status of a unit on a date ("no data" when the unit has no entry)
    Status {
        unit: String,
        /// Date to check (defaults to today)
        #[arg(long)]
        as_of: Option<String>,
    },
    /// Worst-case status of a unit across a date range
    Range {
        unit: String,
        start: String,
        end: String,
    },
    /// Next open booking window that avoids sold and held periods
    NextWindow {
        unit: String,
        /// Earliest start date (defaults to today)
        #[arg(long)]
        from: Option<String>,
        /// Window length in days (at most 3650)
        #[arg(long, default_value_t = STANDARD_WINDOW_DAYS)]
        days: u32,
    },
    /// Print an import template
    Template,
    /// Print every period in the registry as importable CSV
    Export {
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// List catalog units matching market, type and availability filters
    List {
        #[arg(long)]
        market: Option<String>,
        #[arg(long = "type")]
        unit_type: Option<String>,
        /// Wanted range status; repeat or comma-separate for several
        #[arg(long, value_delimiter = ',', requires = "start")]
        status: Vec<String>,
        /// First day of the availability range
        #[arg(long)]
        start: Option<String>,
        /// Last day of the availability range (defaults to --start)
        #[arg(long, requires = "start")]
        end: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let catalog_path = setting(cli.catalog, "AVAIL_CATALOG");
    let registry_path = setting(cli.registry, "AVAIL_REGISTRY");

    match cli.command {
        Commands::Import {
            input,
            merge,
            partial,
            output,
        } => {
            let catalog = load_catalog(catalog_path.as_deref())?;

            // The merged snapshot owns stdout when it has nowhere else to go.
            let target = output.or(registry_path.clone());
            let snapshot_on_stdout = merge && target.is_none();
            let report_line = |line: String| {
                if snapshot_on_stdout {
                    eprintln!("{}", line);
                } else {
                    println!("{}", line);
                }
            };

            let text = match read_input(input.as_deref()) {
                Ok(text) => text,
                Err(e) => {
                    report_line(ImportIssue::file_level(format!("{:#}", e)).to_string());
                    process::exit(1);
                }
            };

            let report = parse_import(&text, &catalog.ids());
            for issue in &report.issues {
                report_line(issue.to_string());
            }
            report_line(format!(
                "{} rows valid, {} issues",
                report.rows.len(),
                report.issues.len()
            ));

            if !merge {
                if !report.is_clean() {
                    process::exit(1);
                }
                return Ok(());
            }

            let incoming = if partial {
                report.clean_subset()
            } else {
                match report.all_or_nothing() {
                    Some(incoming) => incoming,
                    None => {
                        eprintln!(
                            "Import blocked: fix the {} issues or pass --partial",
                            report.issues.len()
                        );
                        process::exit(1);
                    }
                }
            };

            let registry = load_registry(registry_path.as_deref())?;
            let merged = merge_periods(&registry, incoming, Utc::now());
            let json = merged.to_json().context("Failed to serialize registry")?;
            write_output(target.as_deref(), &json)?;
            tracing::info!("registry now holds {} units", merged.len());
        }
        Commands::Status { unit, as_of } => {
            let registry = load_registry(registry_path.as_deref())?;
            let as_of = date_or_today(as_of.as_deref())?;
            match current_status(&registry, &unit, as_of) {
                Some(status) => println!("{}", status),
                None => println!("no data"),
            }
        }
        Commands::Range { unit, start, end } => {
            let registry = load_registry(registry_path.as_deref())?;
            let start = require_date(&start)?;
            let end = require_date(&end)?;
            println!("{}", range_status(&registry, &unit, start, end));
        }
        Commands::NextWindow { unit, from, days } => {
            let registry = load_registry(registry_path.as_deref())?;
            let from = date_or_today(from.as_deref())?;
            let window = next_window_of(&registry, &unit, from, days)?;
            println!(
                "{} {}",
                format_date(window.start_date),
                format_date(window.end_date)
            );
        }
        Commands::Template => {
            print!("{}", template_csv());
        }
        Commands::Export { output } => {
            let registry = load_registry(registry_path.as_deref())?;
            write_output(output.as_deref(), &export_csv(&registry))?;
        }
        Commands::List {
            market,
            unit_type,
            status,
            start,
            end,
        } => {
            let catalog = load_catalog(catalog_path.as_deref())?;
            let registry = load_registry(registry_path.as_deref())?;
            let filter = UnitFilter {
                market,
                unit_type,
                availability: build_constraint(&status, start.as_deref(), end.as_deref())?,
            };
            for unit in filter_units(&catalog, &registry, &filter) {
                println!("{}", unit.id);
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// A flag value, else the named environment variable.
fn setting(flag: Option<String>, var: &str) -> Option<String> {
    flag.or_else(|| std::env::var(var).ok().filter(|v| !v.is_empty()))
}

fn load_catalog(path: Option<&str>) -> Result<UnitCatalog> {
    let Some(path) = path else {
        anyhow::bail!("No catalog given: pass --catalog or set AVAIL_CATALOG");
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog: {}", path))?;
    UnitCatalog::from_json(&json).with_context(|| format!("Failed to load catalog: {}", path))
}

/// A missing registry file is an empty session, not an error.
fn load_registry(path: Option<&str>) -> Result<Registry> {
    match path {
        Some(path) if Path::new(path).exists() => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read registry: {}", path))?;
            Registry::from_json(&json).with_context(|| format!("Failed to load registry: {}", path))
        }
        _ => Ok(Registry::new()),
    }
}

fn date_or_today(input: Option<&str>) -> Result<NaiveDate> {
    match input {
        Some(s) => Ok(require_date(s)?),
        None => Ok(Local::now().date_naive()),
    }
}

fn build_constraint(
    statuses: &[String],
    start: Option<&str>,
    end: Option<&str>,
) -> Result<Option<AvailabilityConstraint>> {
    let Some(start) = start else {
        return Ok(None);
    };
    let start = require_date(start)?;
    let end = match end {
        Some(end) => require_date(end)?,
        None => start,
    };
    let statuses = if statuses.is_empty() {
        vec![Status::Available]
    } else {
        statuses
            .iter()
            .map(|s| s.parse::<Status>())
            .collect::<std::result::Result<Vec<_>, _>>()?
    };

    Ok(Some(AvailabilityConstraint {
        statuses,
        start,
        end,
    }))
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
