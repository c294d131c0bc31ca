//! Cache management for discovery data.
//!
//! Keeps one graph snapshot per day so repeated runs skip the Azure calls.

use super::graph::{run_az_cli_graph, Data};
use chrono_tz::Tz;
use std::error::Error;
use std::path::Path;

/// Default cache file name for the current day in `timezone`.
pub fn default_cache_file(timezone: Tz) -> String {
    let now = chrono::Utc::now().with_timezone(&timezone);
    format!("ipam_cache_{}.json", now.format("%Y-%m-%d"))
}

/// Read discovery data from a cache file, or fetch from Azure if there is none.
///
/// # Arguments
/// * `cache_file` - Optional path to a specific cache file. If None, uses the dated default.
/// * `timezone` - Timezone that decides the date in the default name.
///
/// # Returns
/// * `Ok(Data)` - The data from cache or Azure
/// * `Err` - If a given cache file does not exist, or the Azure query fails
pub fn read_inventory_cache(cache_file: Option<&str>, timezone: Tz) -> Result<Data, Box<dyn Error>> {
    let cache_file = match cache_file {
        Some(file) => {
            if !Path::new(file).exists() {
                return Err(format!("Cache file does not exist: {file}").into());
            }
            log::info!("Using provided cache file: {file}");
            file.to_string()
        }
        None => default_cache_file(timezone),
    };

    let data = match std::fs::read_to_string(&cache_file) {
        Ok(json) => {
            log::info!("Reading from cache file: {cache_file}");
            serde_json::from_str(&json).map_err(|e| format!("Error parsing cache JSON: {e}"))?
        }
        Err(_) => {
            log::warn!("Cache file not found: {cache_file}");
            let data = run_az_cli_graph()?;
            log::info!("Parsed JSON data received from Azure CLI");

            let json =
                serde_json::to_string(&data).map_err(|e| format!("Error serializing JSON: {e}"))?;
            log::warn!("Writing data to cache file: {cache_file}");
            std::fs::write(&cache_file, json)
                .map_err(|e| format!("Error writing cache file {cache_file}: {e}"))?;
            data
        }
    };

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_inventory_cache() {
        let data = read_inventory_cache(
            Some("src/tests/test_data/inventory_test_cache_01.json"),
            Tz::UTC,
        )
        .expect("Error reading inventory cache");
        assert_eq!(data.data.len(), 6, "Expected 6 records in test sample");
        assert_eq!(data.data[0].vnet_name, "hub-vnet", "Wrong vnet from test sample.");
        assert_eq!(data.total_records, Some(6));
        assert!(data.count > 0, "Count should be greater than 0");
    }

    #[test]
    fn test_missing_cache_file_is_an_error() {
        let err = read_inventory_cache(Some("src/tests/test_data/no_such_file.json"), Tz::UTC)
            .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_default_cache_file_name() {
        let name = default_cache_file(chrono_tz::Pacific::Auckland);
        assert!(name.starts_with("ipam_cache_20"));
        assert!(name.ends_with(".json"));
        assert_eq!(name.len(), "ipam_cache_YYYY-MM-DD.json".len());
    }
}
