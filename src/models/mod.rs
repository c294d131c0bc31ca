//! Domain models for address-space utilization.
//!
//! - [`AddressBlock`] - validated network block for IPv4 and IPv6
//! - [`Allocation`], [`Owner`], [`OccupiedBlock`] - discovered space and who holds it
//! - [`Row`], [`Status`] - unified report rows
//! - [`ParentSummary`] - per-parent address counts

mod allocation;
mod block;
mod row;
mod summary;

// Re-export public types
pub use allocation::{Allocation, AllocationKind, OccupiedBlock, Owner};
pub use block::{host_mask, num_addresses, AddressBlock, Family, AZURE_RESERVED_ADDRESSES};
pub use row::{Row, Status};
pub use summary::{ParentSummary, UsageBreakdown};
