//! Distributing discovered allocations to the parent ranges that hold them.

use crate::error::IpamError;
use crate::models::{AddressBlock, Allocation, OccupiedBlock, Owner};
use std::collections::BTreeMap;

/// Everything one parent range has to report on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParentEntries {
    /// Allocations whose block lies inside the parent.
    pub occupied: Vec<OccupiedBlock>,
    /// Owners without an address prefix, repeated under every parent.
    pub unaddressed: Vec<Owner>,
}

/// Allocations grouped per parent, keyed by the parent block itself.
#[derive(Debug, Default)]
pub struct Attribution {
    pub entries: BTreeMap<AddressBlock, ParentEntries>,
    /// Allocations whose prefix did not parse.
    pub rejected: Vec<IpamError>,
    /// Allocations inside none of the parents.
    pub outside: usize,
}

/// Group `allocations` under each parent that fully contains them.
///
/// A block inside several (overlapping) parents is reported under each.
/// Allocations without a prefix go to every parent as unaddressed owners.
pub fn attribute(parents: &[AddressBlock], allocations: &[Allocation]) -> Attribution {
    let mut result = Attribution {
        entries: parents
            .iter()
            .map(|p| (*p, ParentEntries::default()))
            .collect(),
        ..Default::default()
    };

    for allocation in allocations {
        let (block, owner) = match allocation.to_parts() {
            Ok(parts) => parts,
            Err(e) => {
                log::warn!("Skipping '{}': {e}", allocation.name);
                result.rejected.push(e);
                continue;
            }
        };

        let Some(block) = block else {
            log::debug!("'{}' has no address space assigned", owner.name);
            for entries in result.entries.values_mut() {
                entries.unaddressed.push(owner.clone());
            }
            continue;
        };

        let mut matched = false;
        for (parent, entries) in result.entries.iter_mut() {
            if parent.contains(&block) {
                matched = true;
                entries.occupied.push(OccupiedBlock {
                    block,
                    owner: owner.clone(),
                });
            }
        }
        if !matched {
            log::trace!("{block} ('{}') is outside all parent ranges", owner.name);
            result.outside += 1;
        }
    }

    log::info!(
        "Attributed {} allocations to {} parent ranges ({} outside, {} rejected)",
        allocations.len(),
        parents.len(),
        result.outside,
        result.rejected.len()
    );
    result
}
