//! Azure IP address management: used and unused space within parent ranges.
//!
//! Occupied blocks are discovered from Azure (or read from cache), carved out
//! of each user-supplied parent range, and reported as classified rows with
//! per-parent allocation totals.

pub mod azure;
pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod processing;

use config::Config;
use processing::Report;
use std::error::Error;

pub use error::IpamError;

/// Discovery data for a run, converted to allocations.
pub fn get_allocations(config: &Config) -> Result<Vec<models::Allocation>, Box<dyn Error>> {
    let data = azure::read_inventory_cache(config.cache_file.as_deref(), config.timezone)?;
    Ok(data.to_allocations())
}

/// Build the report for every configured parent range.
pub async fn get_report(config: &Config) -> Result<Report, Box<dyn Error>> {
    let allocations = get_allocations(config)?;
    processing::build_report_concurrent(&config.parents, &allocations).await
}
