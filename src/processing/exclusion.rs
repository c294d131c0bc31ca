//! Carving occupied blocks out of a parent range.
//!
//! Computes the free space of a parent as the minimal set of aligned blocks
//! left after repeatedly halving around each occupied block.

use crate::models::AddressBlock;

/// Outcome of excluding a set of occupied blocks from one parent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Exclusion {
    /// Free blocks left over, in no particular order.
    pub free: Vec<AddressBlock>,
    /// Occupied blocks that were carved out.
    pub excluded: Vec<AddressBlock>,
    /// Occupied blocks not inside any remaining free block when reached.
    pub skipped: Vec<AddressBlock>,
}

/// `available` minus `used` as aligned blocks, or `None` if `used` is not
/// inside `available`.
///
/// Splits `available` in halves, keeps the half without `used` and continues
/// into the other, so the loop runs `used.prefix_len() - available.prefix_len()`
/// times at most.
pub fn exclude_block(available: AddressBlock, used: AddressBlock) -> Option<Vec<AddressBlock>> {
    if !available.contains(&used) {
        return None;
    }
    let mut remainder = Vec::new();
    let mut current = available;
    while current != used {
        // current strictly contains used, so it has more than one address
        let (lo, hi) = current.split()?;
        if lo.contains(&used) {
            remainder.push(hi);
            current = lo;
        } else {
            remainder.push(lo);
            current = hi;
        }
    }
    Some(remainder)
}

/// Find the free blocks of `parent` once every block in `occupied` is removed.
///
/// Occupied blocks are processed in ascending (address, prefix) order. A block
/// that is not fully inside one of the currently available blocks (a duplicate,
/// or one straddling an earlier cut) is skipped and reported in
/// [`Exclusion::skipped`] instead of failing the run.
pub fn find_free_blocks(parent: AddressBlock, occupied: &[AddressBlock]) -> Exclusion {
    let mut used = occupied.to_vec();
    used.sort();

    let mut result = Exclusion {
        free: vec![parent],
        ..Default::default()
    };

    for u in used {
        let mut carved = false;
        let mut next = Vec::with_capacity(result.free.len() + usize::from(u.prefix_len()));
        for a in result.free.drain(..) {
            match exclude_block(a, u) {
                Some(remainder) => {
                    carved = true;
                    next.extend(remainder);
                }
                None => next.push(a),
            }
        }
        result.free = next;

        if carved {
            result.excluded.push(u);
        } else {
            log::debug!("{parent}: skipping {u}, not inside any free block");
            result.skipped.push(u);
        }
    }

    log::trace!(
        "{parent}: {} free blocks, {} excluded, {} skipped",
        result.free.len(),
        result.excluded.len(),
        result.skipped.len()
    );
    result
}
