//! The unified output row shared by used, unused and unaddressed space.

use super::{AddressBlock, Owner};
use serde::Serialize;
use std::fmt;
use std::net::IpAddr;

/// Classification of a row.
#[derive(Serialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Status {
    Used,
    Unused,
    NoAddressSpace,
}

impl Status {
    /// Report label, also the final sort tiebreaker.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Used => "Used",
            Status::Unused => "Unused",
            Status::NoAddressSpace => "No address space assigned",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of a utilization report.
///
/// Address fields are `None` only for [`Status::NoAddressSpace`].
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub address: Option<IpAddr>,
    pub prefix_len: Option<u8>,
    pub ip_range_start: Option<IpAddr>,
    pub ip_range_end: Option<IpAddr>,
    pub status: Status,
    pub owner: Option<Owner>,
    #[serde(skip)]
    block: Option<AddressBlock>,
}

impl Row {
    /// A block in use by `owner`.
    pub fn used(block: AddressBlock, owner: Owner) -> Row {
        Row::with_block(block, Status::Used, Some(owner))
    }

    /// A free block; carries no owner.
    pub fn unused(block: AddressBlock) -> Row {
        Row::with_block(block, Status::Unused, None)
    }

    /// An owner that has no address prefix at all.
    pub fn no_address_space(owner: Owner) -> Row {
        Row {
            address: None,
            prefix_len: None,
            ip_range_start: None,
            ip_range_end: None,
            status: Status::NoAddressSpace,
            owner: Some(owner),
            block: None,
        }
    }

    fn with_block(block: AddressBlock, status: Status, owner: Option<Owner>) -> Row {
        Row {
            address: Some(block.network()),
            prefix_len: Some(block.prefix_len()),
            ip_range_start: Some(block.network()),
            ip_range_end: Some(block.last()),
            status,
            owner,
            block: Some(block),
        }
    }

    pub fn block(&self) -> Option<&AddressBlock> {
        self.block.as_ref()
    }

    /// Number of addresses the row covers, 0 without an address.
    pub fn num_addresses(&self) -> u128 {
        self.block.map(|b| b.num_addresses()).unwrap_or(0)
    }

    /// `"first - last"` as shown in reports, `"N/A"` without an address.
    pub fn ip_range(&self) -> String {
        match (self.ip_range_start, self.ip_range_end) {
            (Some(start), Some(end)) => format!("{start} - {end}"),
            _ => "N/A".to_string(),
        }
    }
}
