//! Terminal rendering for catalog commands.
//!
//! Listings and detail views follow the global `--format` flag; status
//! lines are always plain glyph-prefixed text.

use serde::Serialize;
use tabled::{Table, Tabled};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Aligned text columns
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
}

/// Print a page of catalog records in the selected format.
pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table if items.is_empty() => println!("No files found."),
        OutputFormat::Table => println!("{}", Table::new(items)),
        OutputFormat::Json => print_json(items),
    }
}

/// Print a single record: labelled rows in table mode, the full record
/// as JSON otherwise. Detail views share the [`print_row`] layout with
/// `migrate status`.
pub fn print_detail<T: Serialize>(item: &T, rows: &[(&str, String)], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            for (label, value) in rows {
                print_row(label, value);
            }
        }
        OutputFormat::Json => print_json(item),
    }
}

/// Print one aligned `label: value` row.
pub fn print_row(label: &str, value: &str) {
    println!("  {:<24} {}", format!("{label}:"), value);
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {msg}");
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("⚠ {msg}");
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {msg}");
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("✗ Failed to render JSON output: {e}"),
    }
}
