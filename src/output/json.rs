//! JSON export of a full report.

use crate::processing::Report;
use std::error::Error;
use std::path::{Path, PathBuf};

/// Serialize the report (all parents, ordered rows and summaries).
pub fn report_json(report: &Report) -> Result<String, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| format!("Error serializing report JSON: {e}"))?;
    Ok(json)
}

/// Write `<prefix>.json` into `dir`.
pub fn write_json_report(report: &Report, dir: &Path, prefix: &str) -> Result<PathBuf, Box<dyn Error>> {
    let path = dir.join(format!("{prefix}.json"));
    log::info!("Writing {}", path.display());
    std::fs::write(&path, report_json(report)?)
        .map_err(|e| format!("Error writing {}: {e}", path.display()))?;
    Ok(path)
}
