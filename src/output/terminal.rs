//! Terminal output utilities.

use crate::models::{ParentSummary, Status};
use crate::processing::Report;
use colored::{ColoredString, Colorize};

/// Format a value as a quoted, right-aligned field.
///
/// # Arguments
/// * `value` - The value to format
/// * `width` - The minimum width of the field
///
/// # Returns
/// A quoted, right-aligned string
pub fn format_field<T: ToString>(value: T, width: usize) -> String {
    let value_str = value.to_string();
    let quoted = format!("\"{value_str}\"");
    let quoted_len = quoted.len();

    if quoted_len >= width {
        quoted
    } else {
        format!("{quoted:>width$}")
    }
}

/// Colour a percentage: green when mostly free, red when nearly full.
fn colour_percent(summary: &ParentSummary) -> ColoredString {
    let pct = summary.percent_allocated();
    let text = format!("{pct:5.1}%");
    if pct >= 90.0 {
        text.red()
    } else if pct >= 60.0 {
        text.yellow()
    } else {
        text.green()
    }
}

/// One usage line per parent, e.g. `"10.0.0.0/16"  "Allocated=1728" ...`.
pub fn usage_line(summary: &ParentSummary) -> String {
    let usage = summary.breakdown();
    format!(
        "{parent},{allocated},{unallocated},{total}",
        parent = format_field(summary.parent, 22),
        allocated = format_field(format!("Allocated={}", usage.allocated), 24),
        unallocated = format_field(format!("Unallocated={}", usage.unallocated), 26),
        total = format_field(format!("Total={}", summary.total_address_count), 20),
    )
}

/// Note for used blocks the exclusion engine could not carve out.
pub fn skipped_note(skipped: usize) -> Option<String> {
    (skipped > 0).then(|| {
        format!("{skipped} used blocks not carved (nested, duplicate or overlapping)")
    })
}

/// Print the usage table and row counts of a report to stdout.
pub fn print_report_summary(report: &Report) {
    println!("{}", "# Address space usage".bold());
    for p in &report.parents {
        println!("{} {}", usage_line(&p.summary), colour_percent(&p.summary));
        println!(
            "    {used} used, {unused} unused, {none} without address space",
            used = p.count(Status::Used).to_string().yellow(),
            unused = p.count(Status::Unused).to_string().green(),
            none = p.count(Status::NoAddressSpace).to_string().red(),
        );
    }

    if let Some(note) = skipped_note(report.skipped_count()) {
        println!("#{}# {note}", "NOTE".on_blue());
    }
    if !report.rejected.is_empty() {
        println!(
            "#{}# {} discovered prefixes were invalid and left out:",
            "WARN".on_red(),
            report.rejected.len()
        );
        for e in &report.rejected {
            println!("    {e}");
        }
    }
}
