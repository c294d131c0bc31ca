//! Run configuration.
//!
//! Values come from the environment (a `.env` file is loaded in `main.rs`):
//! - `IPAM_CIDRS` - comma separated parent ranges, e.g. `10.0.0.0/8, 192.168.0.0/16`
//! - `IPAM_CACHE_FILE` - use this discovery cache instead of the dated default
//! - `IPAM_OUTPUT_DIR` - where report files go (default `.`)
//! - `IPAM_TIMEZONE` - timezone for cache and report names (default `UTC`)

use crate::error::IpamError;
use crate::models::AddressBlock;
use chrono_tz::Tz;
use std::error::Error;
use std::path::PathBuf;

/// Pause between Resource Graph pages, multiplied per call site.
pub const SLEEP_MSEC: u64 = 100;

/// Records requested per Resource Graph page (the API allows up to 1000).
pub const GRAPH_PAGE_SIZE: u32 = 100;

/// Largest `az` output accepted for a single call.
pub const MAX_RESPONSE_BYTES: usize = 5_000_000;

pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Settings for one reporting run.
#[derive(Debug, Clone)]
pub struct Config {
    pub parents: Vec<AddressBlock>,
    pub cache_file: Option<String>,
    pub output_dir: PathBuf,
    pub timezone: Tz,
}

impl Config {
    /// Read the configuration from the process environment.
    ///
    /// A non-empty `cidrs_arg` (first command line argument) wins over `IPAM_CIDRS`.
    pub fn from_env(cidrs_arg: Option<String>) -> Result<Config, Box<dyn Error>> {
        Config::from_lookup(cidrs_arg, |key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup.
    pub fn from_lookup<F>(cidrs_arg: Option<String>, lookup: F) -> Result<Config, Box<dyn Error>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let cidrs = cidrs_arg
            .filter(|s| !s.trim().is_empty())
            .or_else(|| lookup("IPAM_CIDRS"))
            .unwrap_or_default();
        let parents = parse_parent_ranges(&cidrs)?;

        let cache_file = lookup("IPAM_CACHE_FILE").filter(|s| !s.trim().is_empty());
        let output_dir = PathBuf::from(lookup("IPAM_OUTPUT_DIR").unwrap_or_else(|| ".".to_string()));
        let timezone_name = lookup("IPAM_TIMEZONE").unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());
        let timezone: Tz = timezone_name
            .parse()
            .map_err(|e| format!("Invalid IPAM_TIMEZONE '{timezone_name}': {e}"))?;

        Ok(Config {
            parents,
            cache_file,
            output_dir,
            timezone,
        })
    }
}

/// Parse a comma separated list of parent ranges.
///
/// Empty entries are ignored and a range given twice (in any spelling) is kept
/// once, in first-seen order. Every entry must carry a prefix length.
pub fn parse_parent_ranges(input: &str) -> Result<Vec<AddressBlock>, IpamError> {
    let mut parents: Vec<AddressBlock> = Vec::new();
    for cidr in input.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let block = AddressBlock::parse(cidr)?;
        if parents.contains(&block) {
            log::warn!("Parent range {block} given more than once, using it once");
            continue;
        }
        parents.push(block);
    }
    if parents.is_empty() {
        return Err(IpamError::NoParentRanges);
    }
    Ok(parents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_parse_parent_ranges() {
        let parents = parse_parent_ranges("10.0.0.0/8, 192.168.0.0/16,,").unwrap();
        assert_eq!(parents.len(), 2);
        assert_eq!(parents[1].to_string(), "192.168.0.0/16");
    }

    #[test]
    fn test_parse_parent_ranges_dedup() {
        let parents = parse_parent_ranges("10.0.0.0/24,10.0.0.0/24 , 10.0.1.0/24").unwrap();
        assert_eq!(parents.len(), 2);
    }

    #[test]
    fn test_parse_parent_ranges_errors() {
        assert_eq!(parse_parent_ranges(" , ").unwrap_err(), IpamError::NoParentRanges);
        assert!(matches!(
            parse_parent_ranges("10.0.0.0/8, 192.168.0.0").unwrap_err(),
            IpamError::InvalidAddressBlock { .. }
        ));
    }

    #[test]
    fn test_config_from_lookup() {
        let config = Config::from_lookup(
            None,
            lookup(&[
                ("IPAM_CIDRS", "10.0.0.0/8"),
                ("IPAM_OUTPUT_DIR", "reports"),
                ("IPAM_TIMEZONE", "Pacific/Auckland"),
            ]),
        )
        .unwrap();
        assert_eq!(config.parents.len(), 1);
        assert_eq!(config.output_dir, PathBuf::from("reports"));
        assert_eq!(config.timezone, chrono_tz::Pacific::Auckland);
        assert!(config.cache_file.is_none());
    }

    #[test]
    fn test_config_argument_overrides_env() {
        let config = Config::from_lookup(
            Some("172.16.0.0/12".to_string()),
            lookup(&[("IPAM_CIDRS", "10.0.0.0/8"), ("IPAM_CACHE_FILE", "cache.json")]),
        )
        .unwrap();
        assert_eq!(config.parents[0].to_string(), "172.16.0.0/12");
        assert_eq!(config.cache_file.as_deref(), Some("cache.json"));
        assert_eq!(config.timezone, chrono_tz::Tz::UTC);
    }

    #[test]
    fn test_config_errors() {
        assert!(Config::from_lookup(None, lookup(&[])).is_err());
        assert!(Config::from_lookup(
            None,
            lookup(&[("IPAM_CIDRS", "10.0.0.0/8"), ("IPAM_TIMEZONE", "Mars/Olympus")])
        )
        .is_err());
    }
}
