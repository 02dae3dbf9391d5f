//! Terminal output utilities.
//!
//! Renders a [`UtilizationReport`] as a human readable text report.

use crate::models::{
    Capacity, GroupDetail, GroupKind, ResourceGroup, Tags, UtilizationReport,
    UNAVAILABLE_GROUP_KEY,
};
use chrono::DateTime;
use chrono_tz::Tz;
use colored::Colorize;
use std::fmt::Write;

/// Format a value as a quoted, right-aligned field.
///
/// Embedded double quotes are doubled so the field stays valid CSV.
///
/// # Arguments
/// * `value` - The value to format
/// * `width` - The minimum width of the field
///
/// # Returns
/// A quoted, right-aligned string
pub fn format_field<T: ToString>(value: T, width: usize) -> String {
    let value_str = value.to_string().replace('"', "\"\"");
    let quoted = format!("\"{value_str}\"");
    let quoted_len = quoted.len();

    if quoted_len >= width {
        quoted
    } else {
        format!("{quoted:>width$}")
    }
}

/// Options for the text report.
#[derive(Debug, Clone, Default)]
pub struct TextOptions {
    /// Print tags and kind-specific detail for each group.
    pub show_tags: bool,
    /// Header timestamp; left out when `None`.
    pub generated: Option<DateTime<Tz>>,
}

/// Per-kind totals for the summary lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct KindSummary {
    count: usize,
    current: u64,
    maximum: u64,
    partial: bool,
}

fn summarize(report: &UtilizationReport, kind: GroupKind) -> KindSummary {
    let groups: Vec<&ResourceGroup> = report.groups_of(kind).collect();
    KindSummary {
        count: groups
            .iter()
            .filter(|g| g.key != UNAVAILABLE_GROUP_KEY)
            .count(),
        current: groups.iter().map(|g| g.current).sum(),
        maximum: groups.iter().filter_map(|g| g.maximum.known()).sum(),
        partial: groups.iter().any(|g| g.maximum.is_unknown()),
    }
}

fn max_text(maximum: u64, partial: bool) -> String {
    if partial {
        format!("at least {maximum} (some unknown)")
    } else {
        maximum.to_string()
    }
}

/// Render the report as text lines.
pub fn render_text(report: &UtilizationReport, opts: &TextOptions) -> String {
    let mut out = String::new();
    let s = &report.subnet;

    if let Some(ts) = &opts.generated {
        let _ = writeln!(out, "# aws-subnet-usage {}", ts.format("%Y-%m-%d %H:%M:%S %Z"));
    }
    let _ = writeln!(out, "{}", "=== SUBNET DETAILS ===".bold());
    let _ = writeln!(
        out,
        "Found matching subnet: {} ({}) {} {} ({} IPs available)",
        s.id,
        s.cidr,
        s.availability_zone,
        s.vpc_id.as_deref().unwrap_or(""),
        s.available_ip_count
    );

    let _ = writeln!(out, "\n{}", "=== IP UTILIZATION ===".bold());
    let _ = writeln!(
        out,
        "{} IP addresses used, out of {} total",
        report.used, report.total_usable
    );
    for kind in GroupKind::ALL {
        let sum = summarize(report, kind);
        let _ = writeln!(
            out,
            "Found {} {} currently using {} IPs; max IP usage is {}",
            sum.count,
            kind.label(),
            sum.current,
            max_text(sum.maximum, sum.partial)
        );
    }
    if report.unattributed > 0 {
        let _ = writeln!(
            out,
            "{} used IPs are not attributed to any group",
            report.unattributed
        );
    }

    if !report.groups.is_empty() {
        let _ = writeln!(out, "\n{}", "=== GROUPS ===".bold());
        let _ = writeln!(
            out,
            "{:<16} {:<40} {:>8} {:>8}  {}",
            "kind", "key", "current", "max", "note"
        );
        for g in &report.groups {
            let max = match g.maximum {
                Capacity::Known(n) => n.to_string(),
                Capacity::Unknown => "unknown".yellow().to_string(),
            };
            let _ = writeln!(
                out,
                "{:<16} {:<40} {:>8} {:>8}  {}",
                g.kind.to_string(),
                g.key,
                g.current,
                max,
                g.diagnostic.as_deref().unwrap_or("")
            );
        }
    }

    if opts.show_tags {
        render_details(&mut out, report);
    }

    if !report.diagnostics.is_empty() {
        let _ = writeln!(out, "\n{}", "=== DIAGNOSTICS ===".bold());
        for d in &report.diagnostics {
            let _ = writeln!(out, "{} {d}", "WARNING:".on_red());
        }
    }

    let _ = writeln!(
        out,
        "\nSubnet has {} usable IPs, {} IPs in use. Theoretical maximum with all \
         ELBs, NLBs, ASGs, and node groups fully scaled: {}",
        report.total_usable,
        report.used,
        max_text(report.theoretical_maximum_total, report.maximum_partial)
    );
    out
}

fn render_details(out: &mut String, report: &UtilizationReport) {
    let _ = writeln!(out, "\n{}", "=== DETAILS ===".bold());
    for g in &report.groups {
        let _ = writeln!(out, "  {} {}", g.kind.label(), g.key.as_str().cyan());
        if !g.addresses.is_empty() {
            let addrs: Vec<String> = g.addresses.iter().map(|a| a.to_string()).collect();
            let _ = writeln!(out, "    IPs in subnet: {}", addrs.join(", "));
        }
        match &g.detail {
            GroupDetail::None => {}
            GroupDetail::LoadBalancer {
                arn,
                tags,
                zone_fallback,
            } => {
                if let Some(arn) = arn {
                    let _ = writeln!(out, "    ARN: {arn}");
                }
                if *zone_fallback {
                    let _ = writeln!(out, "    In subnet by zone only; no interface seen");
                }
                write_tags(out, "    ", tags);
            }
            GroupDetail::AutoScaling {
                max_size,
                current_size,
                instance_ids,
            } => {
                let _ = writeln!(
                    out,
                    "    Size: {current_size} of max {max_size}; instances: {}",
                    instance_ids.join(", ")
                );
            }
            GroupDetail::NodeGroups {
                node_groups,
                instances,
            } => {
                for ng in node_groups {
                    let _ = writeln!(
                        out,
                        "    Node group: {} [{}] {:?}",
                        ng.name,
                        ng.status.as_deref().unwrap_or("unknown"),
                        ng.instance_types
                    );
                    if let Some(sc) = ng.scaling_config {
                        let _ = writeln!(
                            out,
                            "      Scaling: min={} desired={} max={}",
                            sc.min_size, sc.desired_size, sc.max_size
                        );
                    }
                }
                for i in instances {
                    let _ = writeln!(out, "    Instance: {} (IP: {})", i.instance_id, i.address);
                    write_tags(out, "      ", &i.tags);
                }
            }
        }
    }
}

fn write_tags(out: &mut String, indent: &str, tags: &Tags) {
    if tags.is_empty() {
        let _ = writeln!(out, "{indent}Tags: None");
        return;
    }
    let _ = writeln!(out, "{indent}Tags:");
    for (k, v) in tags.iter() {
        let _ = writeln!(out, "{indent}  {k}: {v}");
    }
}

/// Print the text report to stdout.
pub fn print_report(report: &UtilizationReport, opts: &TextOptions) {
    print!("{}", render_text(report, opts));
}
