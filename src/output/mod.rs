//! Output formatting for the utilization report.
//!
//! This module handles formatting and outputting the report:
//! - [`csv`] - CSV output, one row per group
//! - [`terminal`] - Text report with colors
//! - JSON through `serde_json`

mod csv;
mod terminal;

use crate::error::BoxError;
use crate::models::UtilizationReport;

pub use csv::{print_csv, render_csv};
pub use terminal::{format_field, print_report, render_text, TextOptions};

/// Report output format.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Csv,
    Json,
}

/// Pretty printed JSON of the report.
pub fn render_json(report: &UtilizationReport) -> Result<String, BoxError> {
    serde_json::to_string_pretty(report).map_err(|e| format!("Error serializing report: {e}").into())
}

/// Write the report to stdout in `format`.
pub fn emit(
    report: &UtilizationReport,
    format: OutputFormat,
    opts: &TextOptions,
) -> Result<(), BoxError> {
    match format {
        OutputFormat::Text => print_report(report, opts),
        OutputFormat::Csv => print_csv(report),
        OutputFormat::Json => println!("{}", render_json(report)?),
    }
    Ok(())
}
