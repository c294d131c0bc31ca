//! Turning occupied, unaddressed and free space into report rows.

use crate::models::{AddressBlock, OccupiedBlock, Owner, Row};

/// Build the rows of one parent.
///
/// One `Used` row per occupied block, one `NoAddressSpace` row per owner
/// without an address prefix, one `Unused` row per free block.
pub fn classify_rows(
    occupied: &[OccupiedBlock],
    unaddressed: &[Owner],
    free: &[AddressBlock],
) -> Vec<Row> {
    let mut rows = Vec::with_capacity(occupied.len() + unaddressed.len() + free.len());
    rows.extend(
        occupied
            .iter()
            .map(|o| Row::used(o.block, o.owner.clone())),
    );
    rows.extend(unaddressed.iter().cloned().map(Row::no_address_space));
    rows.extend(free.iter().copied().map(Row::unused));
    rows
}
