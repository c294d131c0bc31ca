//! Allocation totals per parent.

use crate::models::{AddressBlock, ParentSummary, Row, Status};

/// Sum the `Used` rows of a parent against its capacity.
///
/// Nested or duplicated used rows are counted each time, so the free count
/// is clamped at zero rather than going negative.
pub fn summarize(parent: AddressBlock, rows: &[Row]) -> ParentSummary {
    let total = parent.num_addresses();
    let occupied = rows
        .iter()
        .filter(|r| r.status == Status::Used)
        .fold(0u128, |acc, r| acc.saturating_add(r.num_addresses()));

    ParentSummary {
        parent,
        total_address_count: total,
        occupied_address_count: occupied,
        free_address_count: total.saturating_sub(occupied),
    }
}
