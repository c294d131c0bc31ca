//! Deterministic row order for reports.

use crate::models::Row;
use std::net::IpAddr;

/// Sort key of a row: rows without an address sort after all others.
///
/// Addresses compare numerically within a family, and every IPv4 address
/// sorts before every IPv6 address, the same order [`AddressBlock`] uses.
///
/// [`AddressBlock`]: crate::models::AddressBlock
pub fn row_sort_key(row: &Row) -> (bool, Option<IpAddr>, Option<u8>, &'static str) {
    (
        row.address.is_none(),
        row.address,
        row.prefix_len,
        row.status.as_str(),
    )
}

/// Stable sort by network address (rows without one last), then prefix
/// length, then status name.
pub fn normalize_rows(rows: &mut [Row]) {
    rows.sort_by_key(row_sort_key);
}
