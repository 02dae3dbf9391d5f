//! CSV output formatting for the utilization report.

use crate::models::UtilizationReport;

use super::terminal::format_field;

const HEADER: &str = r#"     "subnet_id",       "kind",                                   "key", "current",     "max",  "ips", "note""#;

/// Render the report as CSV, one row per group.
pub fn render_csv(report: &UtilizationReport) -> String {
    let mut lines = vec![HEADER.to_string()];
    for g in &report.groups {
        lines.push(format!(
            "{subnet_id},{kind},{key},{current},{max},{ips},{note}",
            subnet_id = format_field(&report.subnet.id, 16),
            kind = format_field(&g.kind, 16),
            key = format_field(&g.key, 40),
            current = format_field(g.current, 10),
            max = format_field(&g.maximum, 10),
            ips = format_field(g.addresses.len(), 7),
            note = format_field(g.diagnostic.as_deref().unwrap_or(""), 0),
        ));
    }
    lines.push(format!(
        "{subnet_id},{kind},{key},{current},{max},{ips},{note}",
        subnet_id = format_field(&report.subnet.id, 16),
        kind = format_field("total", 16),
        key = format_field(&report.subnet.cidr, 40),
        current = format_field(report.used, 10),
        max = format_field(report.theoretical_maximum_total, 10),
        ips = format_field(report.total_usable, 7),
        note = format_field(if report.maximum_partial { "partial" } else { "" }, 0),
    ));
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Print the CSV report to stdout.
pub fn print_csv(report: &UtilizationReport) {
    log::info!("#Start print_csv() {} group(s)", report.groups.len());
    print!("{}", render_csv(report));
}
