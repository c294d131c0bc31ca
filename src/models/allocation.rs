//! Discovered allocations and the owner metadata they carry.

use super::AddressBlock;
use crate::error::IpamError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What kind of entity holds an allocation.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum AllocationKind {
    /// A virtual network's declared address prefix ("vnet-scope").
    AddressSpace,
    /// A subnet carved out of a virtual network.
    #[default]
    Subnet,
}

impl AllocationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AllocationKind::AddressSpace => "vnet-scope",
            AllocationKind::Subnet => "subnet",
        }
    }
}

/// One record handed over by a discovery source.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    /// CIDR text of the allocation (None if the entity has no address space).
    pub address_prefix: Option<String>,
    /// Name of the owning entity (subnet or VNet name).
    pub name: String,
    /// Region the owner lives in.
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub kind: AllocationKind,
    /// Grouping labels, e.g. vnet, resource group, subscription.
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

impl Allocation {
    /// Split into the parsed block (if any) and the owner metadata.
    ///
    /// `Ok((None, owner))` for an entity without an address prefix.
    pub fn to_parts(&self) -> Result<(Option<AddressBlock>, Owner), IpamError> {
        let block = match self.address_prefix.as_deref() {
            Some(prefix) => Some(AddressBlock::parse(prefix)?),
            None => None,
        };
        Ok((block, Owner::from(self)))
    }
}

/// Metadata describing who owns a row.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    pub name: String,
    pub region: String,
    pub kind: AllocationKind,
    pub labels: BTreeMap<String, String>,
}

impl From<&Allocation> for Owner {
    fn from(a: &Allocation) -> Owner {
        Owner {
            name: a.name.clone(),
            region: a.region.clone(),
            kind: a.kind,
            labels: a.labels.clone(),
        }
    }
}

/// An address block in use, together with its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupiedBlock {
    pub block: AddressBlock,
    pub owner: Owner,
}
