//! Per-parent allocation totals.

use super::AddressBlock;
use serde::Serialize;

/// Address counts for one parent range.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentSummary {
    pub parent: AddressBlock,
    pub total_address_count: u128,
    pub occupied_address_count: u128,
    pub free_address_count: u128,
}

/// The two-category view handed to charts.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageBreakdown {
    #[serde(rename = "Allocated")]
    pub allocated: u128,
    #[serde(rename = "Unallocated")]
    pub unallocated: u128,
}

impl ParentSummary {
    pub fn breakdown(&self) -> UsageBreakdown {
        UsageBreakdown {
            allocated: self.occupied_address_count,
            unallocated: self.free_address_count,
        }
    }

    /// Share of the parent in use, 0.0 - 100.0.
    pub fn percent_allocated(&self) -> f64 {
        if self.total_address_count == 0 {
            return 0.0;
        }
        let used = self.occupied_address_count.min(self.total_address_count);
        used as f64 * 100.0 / self.total_address_count as f64
    }
}
