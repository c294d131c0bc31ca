//! Address blocks in CIDR notation for both address families.
//!
//! Provides [`AddressBlock`], a validated `network/prefix` pair stored as a
//! `u128` so the same arithmetic serves IPv4 (32 bit) and IPv6 (128 bit).

use crate::error::IpamError;
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

/// Addresses Azure reserves in every subnet (network, gateway, 2x DNS, broadcast).
pub const AZURE_RESERVED_ADDRESSES: u128 = 5;

/// Address family of a block.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Family {
    V4,
    V6,
}

impl Family {
    /// Number of bits in an address of this family.
    pub fn width(self) -> u8 {
        match self {
            Family::V4 => 32,
            Family::V6 => 128,
        }
    }

    fn of(addr: &IpAddr) -> Family {
        match addr {
            IpAddr::V4(_) => Family::V4,
            IpAddr::V6(_) => Family::V6,
        }
    }
}

/// Mask covering the host part of a block, e.g. `0xFF` for a /24 in IPv4.
///
/// # Examples
/// ```
/// use azure_ipam::models::{host_mask, Family};
/// assert_eq!(host_mask(24, Family::V4), 0xFF);
/// assert_eq!(host_mask(32, Family::V4), 0);
/// ```
pub fn host_mask(prefix_len: u8, family: Family) -> u128 {
    let host_bits = u32::from(family.width().saturating_sub(prefix_len));
    if host_bits >= 128 {
        u128::MAX
    } else {
        (1u128 << host_bits) - 1
    }
}

/// Number of addresses in a block, `2^(width - prefix_len)`.
///
/// Saturates at `u128::MAX` for the only block that does not fit, `::/0`.
pub fn num_addresses(prefix_len: u8, family: Family) -> u128 {
    host_mask(prefix_len, family).saturating_add(1)
}

fn addr_bits(addr: IpAddr) -> u128 {
    match addr {
        IpAddr::V4(v4) => u128::from(u32::from(v4)),
        IpAddr::V6(v6) => u128::from(v6),
    }
}

fn bits_to_addr(bits: u128, family: Family) -> IpAddr {
    match family {
        // V4 blocks never carry bits above 32
        Family::V4 => IpAddr::V4(Ipv4Addr::from(bits as u32)),
        Family::V6 => IpAddr::V6(Ipv6Addr::from(bits)),
    }
}

/// A network block: masked network address, prefix length and family.
///
/// Ordered by family, then numeric network address, then prefix length, so
/// a wider block sorts before the narrower blocks sharing its base address.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct AddressBlock {
    bits: u128,
    prefix_len: u8,
    family: Family,
}

impl AddressBlock {
    /// Create a block from a network address and prefix length.
    ///
    /// Fails if the prefix is longer than the family allows or if any host
    /// bit of `addr` is set; unmasked input is never silently corrected.
    pub fn new(addr: IpAddr, prefix_len: u8) -> Result<AddressBlock, IpamError> {
        let family = Family::of(&addr);
        let input = format!("{addr}/{prefix_len}");
        if prefix_len > family.width() {
            return Err(IpamError::invalid(
                &input,
                format!("prefix length exceeds {} bits", family.width()),
            ));
        }
        let bits = addr_bits(addr);
        if bits & host_mask(prefix_len, family) != 0 {
            return Err(IpamError::invalid(&input, "host bits set"));
        }
        Ok(AddressBlock {
            bits,
            prefix_len,
            family,
        })
    }

    /// Parse a block from CIDR text, e.g. `"10.0.0.0/24"` or `"fd00::/8"`.
    pub fn parse(cidr: &str) -> Result<AddressBlock, IpamError> {
        let cidr = cidr.trim();
        let (addr, len) = cidr
            .split_once('/')
            .ok_or_else(|| IpamError::invalid(cidr, "missing prefix length"))?;
        let addr: IpAddr = addr
            .parse()
            .map_err(|_| IpamError::invalid(cidr, format!("invalid address {addr}")))?;
        // u8::from_str would also take a leading '+'
        if len.is_empty() || !len.bytes().all(|c| c.is_ascii_digit()) {
            return Err(IpamError::invalid(cidr, format!("invalid prefix length {len}")));
        }
        let len: u8 = len
            .parse()
            .map_err(|_| IpamError::invalid(cidr, format!("invalid prefix length {len}")))?;
        AddressBlock::new(addr, len).map_err(|e| match e {
            IpamError::InvalidAddressBlock { reason, .. } => IpamError::invalid(cidr, reason),
            other => other,
        })
    }

    pub fn family(&self) -> Family {
        self.family
    }

    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// Numeric value of the network address.
    pub fn bits(&self) -> u128 {
        self.bits
    }

    /// The lowest (network) address in the block.
    pub fn network(&self) -> IpAddr {
        bits_to_addr(self.bits, self.family)
    }

    /// The highest (broadcast) address in the block.
    pub fn last(&self) -> IpAddr {
        bits_to_addr(self.bits | host_mask(self.prefix_len, self.family), self.family)
    }

    pub fn num_addresses(&self) -> u128 {
        num_addresses(self.prefix_len, self.family)
    }

    /// Usable host count once Azure takes its 5 reserved addresses.
    ///
    /// `None` for blocks smaller than 8 addresses (/30 and longer in IPv4),
    /// which Azure does not accept as subnets.
    pub fn azure_usable_hosts(&self) -> Option<u128> {
        let size = self.num_addresses();
        if size < 8 {
            None
        } else {
            Some(size - AZURE_RESERVED_ADDRESSES)
        }
    }

    /// True if `other` lies entirely inside this block (equal blocks included).
    pub fn contains(&self, other: &AddressBlock) -> bool {
        self.family == other.family
            && self.prefix_len <= other.prefix_len
            && other.bits & !host_mask(self.prefix_len, self.family) == self.bits
    }

    /// True if the two blocks share at least one address.
    pub fn overlaps(&self, other: &AddressBlock) -> bool {
        self.contains(other) || other.contains(self)
    }

    /// Split into the two aligned halves, lower half first.
    ///
    /// `None` for a single-address block.
    pub fn split(&self) -> Option<(AddressBlock, AddressBlock)> {
        if self.prefix_len >= self.family.width() {
            return None;
        }
        let prefix_len = self.prefix_len + 1;
        let half = host_mask(prefix_len, self.family) + 1;
        let lo = AddressBlock {
            bits: self.bits,
            prefix_len,
            family: self.family,
        };
        let hi = AddressBlock {
            bits: self.bits | half,
            prefix_len,
            family: self.family,
        };
        Some((lo, hi))
    }
}

impl FromStr for AddressBlock {
    type Err = IpamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AddressBlock::parse(s)
    }
}

impl Ord for AddressBlock {
    fn cmp(&self, other: &AddressBlock) -> Ordering {
        (self.family, self.bits, self.prefix_len).cmp(&(other.family, other.bits, other.prefix_len))
    }
}

impl PartialOrd for AddressBlock {
    fn partial_cmp(&self, other: &AddressBlock) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for AddressBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}", self.network(), self.prefix_len)
    }
}

impl Serialize for AddressBlock {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AddressBlock {
    fn deserialize<D>(deserializer: D) -> Result<AddressBlock, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        AddressBlock::parse(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(s: &str) -> AddressBlock {
        AddressBlock::parse(s).unwrap()
    }

    #[test]
    fn test_host_mask() {
        assert_eq!(host_mask(0, Family::V4), 0xFFFF_FFFF);
        assert_eq!(host_mask(8, Family::V4), 0x00FF_FFFF);
        assert_eq!(host_mask(24, Family::V4), 0xFF);
        assert_eq!(host_mask(32, Family::V4), 0);
        assert_eq!(host_mask(0, Family::V6), u128::MAX);
        assert_eq!(host_mask(64, Family::V6), u128::from(u64::MAX));
        assert_eq!(host_mask(128, Family::V6), 0);
    }

    #[test]
    fn test_parse_ipv4() {
        let b = block("10.1.2.0/24");
        assert_eq!(b.family(), Family::V4);
        assert_eq!(b.prefix_len(), 24);
        assert_eq!(b.network(), "10.1.2.0".parse::<IpAddr>().unwrap());
        assert_eq!(b.last(), "10.1.2.255".parse::<IpAddr>().unwrap());
        assert_eq!(b.num_addresses(), 256);
        assert_eq!(b.to_string(), "10.1.2.0/24");
    }

    #[test]
    fn test_parse_ipv6() {
        let b = block("fd00:1::/48");
        assert_eq!(b.family(), Family::V6);
        assert_eq!(b.num_addresses(), 1u128 << 80);
        assert_eq!(
            b.last(),
            "fd00:1:0:ffff:ffff:ffff:ffff:ffff".parse::<IpAddr>().unwrap()
        );
        assert_eq!(block("::/0").num_addresses(), u128::MAX);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(block(" 10.0.0.0/24 "), block("10.0.0.0/24"));
        assert_eq!(block("\t10.0.0.0/24\n"), block("10.0.0.0/24"));
    }

    #[test]
    fn test_parse_errors() {
        for bad in [
            "10.0.0.0",
            "10.0.0.0/",
            "10.0.0/24",
            "10.0.0.0/33",
            "fd00::/129",
            "10.0.0.1/24",
            "hello/8",
            "10.0.0.0 / 24",
            "10.0.0.0 /24",
            "10.0.0.0/ 24",
            "10.0.0.0/+24",
            "10.0.0.0/-0",
            "",
        ] {
            let err = AddressBlock::parse(bad).unwrap_err();
            assert!(
                matches!(err, IpamError::InvalidAddressBlock { .. }),
                "expected InvalidAddressBlock for '{bad}', got {err:?}"
            );
        }
        assert_eq!(
            AddressBlock::parse("10.0.0.1/24").unwrap_err().to_string(),
            "invalid address block '10.0.0.1/24': host bits set"
        );
    }

    #[test]
    fn test_contains() {
        let parent = block("10.0.0.0/16");
        assert!(parent.contains(&block("10.0.0.0/16")));
        assert!(parent.contains(&block("10.0.4.0/22")));
        assert!(parent.contains(&block("10.0.255.255/32")));
        assert!(!parent.contains(&block("10.1.0.0/24")));
        assert!(!parent.contains(&block("10.0.0.0/8")));
        assert!(!block("10.0.4.0/22").contains(&parent));
        assert!(!block("0.0.0.0/0").contains(&block("::/0")));
        assert!(block("0.0.0.0/0").contains(&parent));
    }

    #[test]
    fn test_overlaps() {
        assert!(block("10.0.0.0/8").overlaps(&block("10.2.0.0/16")));
        assert!(block("10.2.0.0/16").overlaps(&block("10.0.0.0/8")));
        assert!(!block("10.0.0.0/25").overlaps(&block("10.0.0.128/25")));
    }

    #[test]
    fn test_split() {
        let (lo, hi) = block("10.0.0.0/24").split().unwrap();
        assert_eq!(lo, block("10.0.0.0/25"));
        assert_eq!(hi, block("10.0.0.128/25"));

        let (lo, hi) = block("::/0").split().unwrap();
        assert_eq!(lo, block("::/1"));
        assert_eq!(hi, block("8000::/1"));

        assert!(block("10.0.0.7/32").split().is_none());
        assert!(block("fd00::1/128").split().is_none());
    }

    #[test]
    fn test_azure_usable_hosts() {
        assert_eq!(block("0.0.0.0/0").azure_usable_hosts(), Some(4294967291));
        assert_eq!(block("10.0.0.0/16").azure_usable_hosts(), Some(65531));
        assert_eq!(block("10.0.0.0/24").azure_usable_hosts(), Some(251));
        assert_eq!(block("10.0.0.0/28").azure_usable_hosts(), Some(11));
        assert_eq!(block("10.0.0.0/29").azure_usable_hosts(), Some(3));
        assert_eq!(block("10.0.0.0/30").azure_usable_hosts(), None);
    }

    #[test]
    fn test_block_cmp() {
        let wide = block("10.0.0.0/8");
        let narrow = block("10.0.0.0/24");
        let later = block("10.0.10.0/24");
        let v6 = block("::/0");

        assert!(wide < narrow);
        assert!(narrow < later);
        assert!(wide < later);
        assert!(later < v6);
        assert_eq!(narrow, block("10.0.0.0/24"));

        let mut blocks = vec![later, v6, narrow, wide];
        blocks.sort();
        assert_eq!(blocks, vec![wide, narrow, later, v6]);
    }

    #[test]
    fn test_serde_roundtrip_as_string() {
        let b = block("192.168.0.0/16");
        let json = serde_json::to_string(&b).unwrap();
        assert_eq!(json, r#""192.168.0.0/16""#);
        let back: AddressBlock = serde_json::from_str(&json).unwrap();
        assert_eq!(back, b);
        assert!(serde_json::from_str::<AddressBlock>(r#""192.168.0.1/16""#).is_err());
    }
}
