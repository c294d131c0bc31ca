//! Per-parent report assembly.
//!
//! Runs exclusion, classification, aggregation and normalization for each
//! parent range, either in sequence or on the tokio blocking pool.

use super::{attribute, classify_rows, find_free_blocks, normalize_rows, summarize, ParentEntries};
use crate::error::IpamError;
use crate::models::{AddressBlock, Allocation, AllocationKind, ParentSummary, Row, Status};
use serde::Serialize;
use std::error::Error;

/// Rows, totals and diagnostics for one parent range.
#[derive(Serialize, Debug, Clone)]
pub struct ParentReport {
    pub parent: AddressBlock,
    pub rows: Vec<Row>,
    pub summary: ParentSummary,
    /// Occupied blocks the exclusion engine could not carve out.
    pub skipped: Vec<AddressBlock>,
}

impl ParentReport {
    /// Build the report of one parent from the entries attributed to it.
    pub fn build(parent: AddressBlock, entries: &ParentEntries) -> ParentReport {
        let occupied: Vec<AddressBlock> = entries.occupied.iter().map(|o| o.block).collect();
        let exclusion = find_free_blocks(parent, &occupied);
        if !exclusion.skipped.is_empty() {
            log::debug!(
                "{parent}: {} occupied blocks nested or overlapping, not carved",
                exclusion.skipped.len()
            );
        }

        let mut rows = classify_rows(&entries.occupied, &entries.unaddressed, &exclusion.free);
        let summary = summarize(parent, &rows);
        normalize_rows(&mut rows);

        log::info!(
            "{parent}: {used} used, {unused} unused, {none} without address space",
            used = entries.occupied.len(),
            unused = exclusion.free.len(),
            none = entries.unaddressed.len(),
        );

        ParentReport {
            parent,
            rows,
            summary,
            skipped: exclusion.skipped,
        }
    }

    /// Number of rows with the given status.
    pub fn count(&self, status: Status) -> usize {
        self.rows.iter().filter(|r| r.status == status).count()
    }

    /// VNet address spaces and free blocks, the rows of the address space overview.
    pub fn address_space_rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(|r| match (&r.status, &r.owner) {
            (Status::Unused, _) => true,
            (Status::Used, Some(owner)) => owner.kind == AllocationKind::AddressSpace,
            _ => false,
        })
    }
}

/// Reports for all parent ranges of a run, in the order the parents were given.
#[derive(Serialize, Debug, Default)]
pub struct Report {
    pub parents: Vec<ParentReport>,
    /// Discovered allocations that could not be parsed.
    #[serde(skip)]
    pub rejected: Vec<IpamError>,
}

impl Report {
    /// Look up a parent by its block, independent of how it was written.
    pub fn get(&self, parent: &AddressBlock) -> Option<&ParentReport> {
        self.parents.iter().find(|p| &p.parent == parent)
    }

    pub fn summaries(&self) -> impl Iterator<Item = &ParentSummary> {
        self.parents.iter().map(|p| &p.summary)
    }

    /// Total occupied blocks the engine skipped across all parents.
    pub fn skipped_count(&self) -> usize {
        self.parents.iter().map(|p| p.skipped.len()).sum()
    }
}

/// Build the report for every parent, one after the other.
pub fn build_report(parents: &[AddressBlock], allocations: &[Allocation]) -> Report {
    let attribution = attribute(parents, allocations);
    let parents = parents
        .iter()
        .map(|p| {
            let entries = attribution.entries.get(p).cloned().unwrap_or_default();
            ParentReport::build(*p, &entries)
        })
        .collect();
    Report {
        parents,
        rejected: attribution.rejected,
    }
}

/// Build the report with each parent on its own blocking task.
///
/// Parents share no state, so the result equals [`build_report`].
pub async fn build_report_concurrent(
    parents: &[AddressBlock],
    allocations: &[Allocation],
) -> Result<Report, Box<dyn Error>> {
    let attribution = attribute(parents, allocations);
    let tasks = parents.iter().map(|p| {
        let parent = *p;
        // a parent listed twice gets the same entries both times
        let entries = attribution.entries.get(p).cloned().unwrap_or_default();
        tokio::task::spawn_blocking(move || ParentReport::build(parent, &entries))
    });
    let tasks: Vec<_> = tasks.collect();
    let parents = futures::future::try_join_all(tasks)
        .await
        .map_err(|e| format!("Report task failed: {e}"))?;
    Ok(Report {
        parents,
        rejected: attribution.rejected,
    })
}
