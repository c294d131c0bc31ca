//! Azure Resource Graph query execution.
//!
//! Fetches every VNet with its subnets and turns the records into
//! [`Allocation`]s for the reporting pipeline.

use super::cli;
use crate::config;
use crate::models::{Allocation, AllocationKind};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::error::Error;

/// Label keys attached to every discovered allocation.
pub const LABEL_VNET: &str = "vnet";
pub const LABEL_RESOURCE_GROUP: &str = "resource_group";
pub const LABEL_SUBSCRIPTION: &str = "subscription";

/// One row per subnet, with the owning VNet's address space repeated.
const SUBNET_QUERY: &str = r#"resources
        | where type == "microsoft.network/virtualnetworks"
        | mv-expand properties.subnets
        | project subscription_id=subscriptionId
                ,resource_group=resourceGroup
                ,vnet_name=name
                ,vnet_cidr=properties.addressSpace.addressPrefixes
                ,subnet_name=properties_subnets.name
                ,subnet_cidr=properties_subnets.properties.addressPrefix
                ,location=location
        | join kind=leftouter (
            resourcecontainers
                | where type == "microsoft.resources/subscriptions"
                | project subscription_id=subscriptionId, subscription_name=name
            ) on subscription_id
        | project subscription_id, subscription_name, resource_group, vnet_name, vnet_cidr, subnet_name, subnet_cidr, location
        | sort by vnet_name asc"#;

/// A VNet/subnet pair as returned by the graph query.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct SubnetRecord {
    pub subscription_id: String,
    #[serde(default)]
    pub subscription_name: Option<String>,
    #[serde(default)]
    pub resource_group: String,
    pub vnet_name: String,
    /// Address prefixes of the VNet.
    #[serde(default)]
    pub vnet_cidr: Option<Vec<String>>,
    /// None for a VNet without subnets.
    #[serde(default)]
    pub subnet_name: Option<String>,
    /// None if the subnet has no address prefix assigned.
    #[serde(default)]
    pub subnet_cidr: Option<String>,
    #[serde(default)]
    pub location: String,
    /// Record index within its page (for tracking/debugging).
    #[serde(default)]
    pub src_index: usize,
    /// Page number the record arrived in.
    #[serde(default)]
    pub block_id: usize,
}

impl SubnetRecord {
    fn labels(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            (LABEL_VNET.to_string(), self.vnet_name.clone()),
            (LABEL_RESOURCE_GROUP.to_string(), self.resource_group.clone()),
            (
                LABEL_SUBSCRIPTION.to_string(),
                self.subscription_name
                    .clone()
                    .unwrap_or_else(|| self.subscription_id.clone()),
            ),
        ])
    }
}

/// Response data from the graph query, all pages merged.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct Data {
    pub data: Vec<SubnetRecord>,
    /// Token for the next page (None on the last one).
    pub skip_token: Option<String>,
    /// Total number of records matching the query.
    pub total_records: Option<u32>,
    /// Count of records in this response.
    pub count: i32,
}

impl Data {
    /// Convert graph records into allocations.
    ///
    /// Each VNet (subscription, resource group, name) contributes one
    /// address-space allocation per prefix, the first time it is seen, and
    /// every subnet row contributes one subnet allocation.
    pub fn to_allocations(&self) -> Vec<Allocation> {
        let mut allocations = Vec::new();
        let mut seen_vnets: HashSet<(&str, &str, &str)> = HashSet::new();

        for record in &self.data {
            let labels = record.labels();
            let vnet_key = (
                record.subscription_id.as_str(),
                record.resource_group.as_str(),
                record.vnet_name.as_str(),
            );
            if seen_vnets.insert(vnet_key) {
                for cidr in record.vnet_cidr.iter().flatten() {
                    allocations.push(Allocation {
                        address_prefix: Some(cidr.clone()),
                        name: record.vnet_name.clone(),
                        region: record.location.clone(),
                        kind: AllocationKind::AddressSpace,
                        labels: labels.clone(),
                    });
                }
            }

            if let Some(subnet_name) = &record.subnet_name {
                allocations.push(Allocation {
                    address_prefix: record.subnet_cidr.clone(),
                    name: subnet_name.clone(),
                    region: record.location.clone(),
                    kind: AllocationKind::Subnet,
                    labels,
                });
            }
        }

        log::info!(
            "{} graph records -> {} allocations from {} VNets",
            self.data.len(),
            allocations.len(),
            seen_vnets.len()
        );
        allocations
    }
}

/// Execute the Resource Graph query for all VNets and subnets.
///
/// Follows skip tokens until the last page.
pub fn run_az_cli_graph() -> Result<Data, Box<dyn Error>> {
    let mut data: Data = Default::default();
    let mut skip_token: Option<String> = None;
    let mut count_blocks_returned = 0;

    loop {
        let mut args: Vec<String> = vec![
            "graph".into(),
            "query".into(),
            "--first".into(),
            config::GRAPH_PAGE_SIZE.to_string(),
        ];
        if let Some(token) = &skip_token {
            args.push("--skip-token".into());
            args.push(token.clone());
        }
        args.extend(["-q".into(), SUBNET_QUERY.into(), "--output".into(), "json".into()]);
        let output = cli::run_az(&args)?;

        let mut json_block_deserializer = serde_json::Deserializer::from_str(&output);
        let json_parsed: Data = serde_path_to_error::deserialize(&mut json_block_deserializer)
            .map_err(|e| {
                log::error!("OUTPUT START:\n\n{}\n\nOUTPUT END\n", output);
                format!(
                    "Error parsing JSON block {}: path={} error={}",
                    count_blocks_returned,
                    e.path(),
                    e
                )
            })?;

        if json_parsed.skip_token.is_some() && json_parsed.skip_token == skip_token {
            return Err("Skip token not unique - possible infinite loop".into());
        }
        skip_token = json_parsed.skip_token.clone();

        data.data
            .extend(json_parsed.data.into_iter().enumerate().map(|(i, mut s)| {
                s.src_index = i;
                s.block_id = count_blocks_returned;
                s
            }));
        data.count += json_parsed.count;
        if let Some(total) = json_parsed.total_records {
            data.total_records = Some(total);
        }

        log::info!(
            "got block#{count_blocks_returned:2} record_count=+{count:3} => {total:3} more={more}",
            count = json_parsed.count,
            total = data.count,
            more = skip_token.is_some(),
        );
        count_blocks_returned += 1;

        if skip_token.is_none() {
            break;
        }
        // Rate limiting pause
        std::thread::sleep(std::time::Duration::from_millis(config::SLEEP_MSEC * 5));
    }

    if let Some(total) = data.total_records {
        if total as usize != data.data.len() {
            log::warn!(
                "Graph reported {total} records but {} were returned",
                data.data.len()
            );
        }
    }
    log::info!(
        "Got data #{} == {} records from az graph query",
        data.count,
        data.data.len()
    );

    Ok(data)
}
