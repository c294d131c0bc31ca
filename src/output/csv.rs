//! CSV output for utilization reports.
//!
//! Mirrors the usual IPAM workbook layout as plain files: one usage
//! overview, one address-space overview across parents, and one file per
//! parent range.

use crate::models::{AddressBlock, Row};
use crate::processing::{row_sort_key, ParentReport, Report};
use itertools::Itertools;
use regex::Regex;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Characters not allowed in report file names.
static UNSAFE_NAME_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_unsafe_name_regex() -> &'static Regex {
    UNSAFE_NAME_REGEX.get_or_init(|| Regex::new(r#"[\\/*?:\[\]\s"<>|]"#).expect("Invalid Regex"))
}

/// Quote a field if it contains a comma or a double quote.
pub fn escape_csv_field(input: &str) -> String {
    if input.contains(',') || input.contains('"') {
        // excel does not like spaces after comma between fields, so none are added
        let escaped = input.replace('"', "\"\"");
        format!("\"{}\"", escaped)
    } else {
        input.to_string()
    }
}

/// Turn a parent block into a file-name-safe string, e.g. `10.0.0.0_16`.
pub fn file_safe_name(block: &AddressBlock) -> String {
    get_unsafe_name_regex()
        .replace_all(&block.to_string(), "_")
        .into_owned()
}

fn csv_line<I, S>(fields: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    fields
        .into_iter()
        .map(|f| escape_csv_field(f.as_ref()))
        .join(",")
}

/// Label keys used by any of the rows, in first-seen order.
fn label_keys<'a>(rows: impl Iterator<Item = &'a Row>) -> Vec<String> {
    rows.filter_map(|r| r.owner.as_ref())
        .flat_map(|o| o.labels.keys())
        .unique()
        .cloned()
        .collect()
}

fn header(label_keys: &[String]) -> Vec<String> {
    let mut columns: Vec<String> = ["Address", "CIDR Prefix", "IP Range", "Usable Hosts", "Name", "Scope"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    columns.extend(label_keys.iter().cloned());
    columns.push("Region".to_string());
    columns.push("Status".to_string());
    columns
}

fn row_fields(row: &Row, label_keys: &[String]) -> Vec<String> {
    let na = || "N/A".to_string();
    let mut fields = vec![
        row.address.map(|a| a.to_string()).unwrap_or_else(na),
        row.prefix_len.map(|p| p.to_string()).unwrap_or_else(na),
        row.ip_range(),
        row.block()
            .and_then(|b| b.azure_usable_hosts())
            .map(|h| h.to_string())
            .unwrap_or_else(na),
    ];
    match &row.owner {
        Some(owner) => {
            fields.push(owner.name.clone());
            fields.push(owner.kind.as_str().to_string());
            fields.extend(
                label_keys
                    .iter()
                    .map(|k| owner.labels.get(k).cloned().unwrap_or_default()),
            );
            fields.push(owner.region.clone());
        }
        None => fields.extend(std::iter::repeat(String::new()).take(label_keys.len() + 3)),
    }
    fields.push(row.status.to_string());
    fields
}

/// CSV text for the rows of one parent range.
pub fn parent_csv(report: &ParentReport) -> String {
    let keys = label_keys(report.rows.iter());
    let mut lines = vec![csv_line(header(&keys))];
    lines.extend(report.rows.iter().map(|r| csv_line(row_fields(r, &keys))));
    lines.join("\n") + "\n"
}

/// CSV text with the Allocated / Unallocated split of every parent.
pub fn usage_csv(report: &Report) -> String {
    let mut lines = vec![csv_line(["CIDR Range", "Allocated", "Unallocated", "Total"])];
    for s in report.summaries() {
        let usage = s.breakdown();
        lines.push(csv_line([
            s.parent.to_string(),
            usage.allocated.to_string(),
            usage.unallocated.to_string(),
            s.total_address_count.to_string(),
        ]));
    }
    lines.join("\n") + "\n"
}

/// CSV text of VNet address spaces and free blocks across all parents.
///
/// Rows are ordered by address like a single parent; the leading column
/// names the parent each row belongs to.
pub fn address_space_csv(report: &Report) -> String {
    let mut rows: Vec<(&AddressBlock, &Row)> = report
        .parents
        .iter()
        .flat_map(|p| p.address_space_rows().map(move |r| (&p.parent, r)))
        .collect();
    rows.sort_by_key(|(_, r)| row_sort_key(r));

    let keys = label_keys(rows.iter().map(|(_, r)| *r));
    let mut columns = vec!["CIDR Range".to_string()];
    columns.extend(header(&keys));

    let mut lines = vec![csv_line(columns)];
    for (parent, row) in rows {
        let mut fields = vec![parent.to_string()];
        fields.extend(row_fields(row, &keys));
        lines.push(csv_line(fields));
    }
    lines.join("\n") + "\n"
}

/// Write all CSV files of a report into `dir`, named `<prefix>_*.csv`.
///
/// # Returns
/// The paths written, usage file first.
pub fn write_csv_reports(
    report: &Report,
    dir: &Path,
    prefix: &str,
) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    std::fs::create_dir_all(dir)
        .map_err(|e| format!("Error creating output dir {}: {e}", dir.display()))?;

    let mut files = vec![
        (dir.join(format!("{prefix}_usage.csv")), usage_csv(report)),
        (
            dir.join(format!("{prefix}_address_spaces.csv")),
            address_space_csv(report),
        ),
    ];
    for p in &report.parents {
        files.push((
            dir.join(format!("{prefix}_{}.csv", file_safe_name(&p.parent))),
            parent_csv(p),
        ));
    }

    let mut written = Vec::with_capacity(files.len());
    for (path, content) in files {
        log::info!("Writing {}", path.display());
        std::fs::write(&path, content)
            .map_err(|e| format!("Error writing {}: {e}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Allocation, AllocationKind};
    use crate::processing::build_report;
    use std::collections::BTreeMap;

    fn block(s: &str) -> AddressBlock {
        AddressBlock::parse(s).unwrap()
    }

    fn sample_report() -> Report {
        let labels = BTreeMap::from([
            ("vnet".to_string(), "hub-vnet".to_string()),
            ("subscription".to_string(), "Platform, Prod".to_string()),
        ]);
        let allocations = vec![
            Allocation {
                address_prefix: Some("10.0.0.0/25".to_string()),
                name: "hub-vnet".to_string(),
                region: "eastus".to_string(),
                kind: AllocationKind::AddressSpace,
                labels: labels.clone(),
            },
            Allocation {
                address_prefix: None,
                name: "pending".to_string(),
                region: "eastus".to_string(),
                kind: AllocationKind::Subnet,
                labels,
            },
        ];
        build_report(&[block("10.0.0.0/24")], &allocations)
    }

    #[test]
    fn test_escape_csv_field() {
        assert_eq!(escape_csv_field("plain"), "plain");
        assert_eq!(escape_csv_field("a,b"), "\"a,b\"");
        assert_eq!(escape_csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_file_safe_name() {
        assert_eq!(file_safe_name(&block("10.0.0.0/16")), "10.0.0.0_16");
        assert_eq!(file_safe_name(&block("fd00::/8")), "fd00___8");
    }

    #[test]
    fn test_parent_csv() {
        let report = sample_report();
        let csv = parent_csv(&report.parents[0]);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "Address,CIDR Prefix,IP Range,Usable Hosts,Name,Scope,subscription,vnet,Region,Status"
        );
        assert_eq!(
            lines[1],
            "10.0.0.0,25,10.0.0.0 - 10.0.0.127,123,hub-vnet,vnet-scope,\"Platform, Prod\",hub-vnet,eastus,Used"
        );
        assert_eq!(lines[2], "10.0.0.128,25,10.0.0.128 - 10.0.0.255,123,,,,,,Unused");
        assert_eq!(
            lines[3],
            "N/A,N/A,N/A,N/A,pending,subnet,\"Platform, Prod\",hub-vnet,eastus,No address space assigned"
        );
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_usage_csv() {
        let report = sample_report();
        assert_eq!(
            usage_csv(&report),
            "CIDR Range,Allocated,Unallocated,Total\n10.0.0.0/24,128,128,256\n"
        );
    }

    #[test]
    fn test_address_space_csv() {
        let report = sample_report();
        let csv = address_space_csv(&report);
        let lines: Vec<&str> = csv.lines().collect();
        assert!(lines[0].starts_with("CIDR Range,Address,"));
        assert!(lines[1].starts_with("10.0.0.0/24,10.0.0.0,25,"));
        assert!(lines[2].starts_with("10.0.0.0/24,10.0.0.128,25,"));
        assert_eq!(lines.len(), 3, "no unaddressed rows in the overview");
    }
}
