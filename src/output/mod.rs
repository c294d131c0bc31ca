//! Output formatting for utilization reports.
//!
//! - [`csv`] - CSV files per parent plus usage and address-space overviews
//! - [`json`] - full report as JSON
//! - [`terminal`] - coloured terminal summary

mod csv;
mod json;
mod terminal;

use chrono_tz::Tz;

pub use csv::{
    address_space_csv, escape_csv_field, file_safe_name, parent_csv, usage_csv, write_csv_reports,
};
pub use json::{report_json, write_json_report};
pub use terminal::{format_field, print_report_summary, skipped_note, usage_line};

/// File name prefix of a run, e.g. `ipam_tracking_20260102_150405`.
pub fn report_prefix(timezone: Tz) -> String {
    let now = chrono::Utc::now().with_timezone(&timezone);
    format!("ipam_tracking_{}", now.format("%Y%m%d_%H%M%S"))
}
