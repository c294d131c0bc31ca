//! Address-space utilization processing.
//!
//! - [`attribute`] - grouping discovered allocations per parent range
//! - [`exclusion`] - carving occupied blocks out of a parent
//! - [`classify`] - used / unused / no-address-space rows
//! - [`aggregate`] - per-parent address counts
//! - [`normalize`] - deterministic row order
//! - [`report`] - the pipeline over all parents

mod aggregate;
mod attribute;
mod classify;
mod exclusion;
mod normalize;
mod report;

// Re-export public functions
pub use aggregate::summarize;
pub use attribute::{attribute, Attribution, ParentEntries};
pub use classify::classify_rows;
pub use exclusion::{exclude_block, find_free_blocks, Exclusion};
pub use normalize::{normalize_rows, row_sort_key};
pub use report::{build_report, build_report_concurrent, ParentReport, Report};
