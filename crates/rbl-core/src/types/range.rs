use std::net::Ipv4Addr;

use super::Dnsbl;
use crate::error::{RblError, Result};

/// Default cap on the number of addresses a single scan may enumerate (a /16)
pub const DEFAULT_MAX_ADDRESSES: u64 = 1 << 16;

/// Absolute ceiling, applied even when a caller raises the cap (a /8)
pub const HARD_MAX_ADDRESSES: u64 = 1 << 24;

/// A validated range-scan work order: one DNSBL and a block of addresses.
///
/// The base is the address exactly as written in the CIDR string; it is not
/// masked down to the network boundary. Enumeration is `base + i` for
/// `i` in `0..count`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeScan {
    list: Dnsbl,
    base: Ipv4Addr,
    prefix: u8,
    count: u32,
}

impl RangeScan {
    /// Build a scan from a base address and prefix length.
    ///
    /// Rejects prefixes above 32, blocks larger than `max_addresses` (itself
    /// clamped to [`HARD_MAX_ADDRESSES`]), and ranges that would run past
    /// `255.255.255.255`.
    pub fn new(list: Dnsbl, base: Ipv4Addr, prefix: u8, max_addresses: u64) -> Result<Self> {
        if prefix > 32 {
            return Err(RblError::InvalidPrefix(prefix));
        }

        let count = 1u64 << (32 - u32::from(prefix));
        let max = max_addresses.min(HARD_MAX_ADDRESSES);
        if count > max {
            return Err(RblError::RangeTooLarge { prefix, count, max });
        }

        if u64::from(u32::from(base)) + count - 1 > u64::from(u32::MAX) {
            return Err(RblError::AddressOverflow { base, count });
        }

        let count = u32::try_from(count).map_err(|_| RblError::RangeTooLarge { prefix, count, max })?;

        Ok(Self {
            list,
            base,
            prefix,
            count,
        })
    }

    /// Parse `a.b.c.d/p`. A bare address is treated as `/32`.
    pub fn parse(list: Dnsbl, cidr: &str, max_addresses: u64) -> Result<Self> {
        let (base, prefix) = parse_cidr(cidr)?;
        Self::new(list, base, prefix, max_addresses)
    }

    /// The DNSBL to query
    #[must_use]
    pub const fn list(&self) -> &Dnsbl {
        &self.list
    }

    /// First address of the range
    #[must_use]
    pub const fn base(&self) -> Ipv4Addr {
        self.base
    }

    /// Prefix length the range was built from
    #[must_use]
    pub const fn prefix(&self) -> u8 {
        self.prefix
    }

    /// Number of addresses, `2^(32 - prefix)`
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count as usize
    }

    /// Address at enumeration index `index`, or `None` past the end
    #[must_use]
    pub fn address_at(&self, index: usize) -> Option<Ipv4Addr> {
        let offset = u32::try_from(index).ok().filter(|i| *i < self.count)?;
        u32::from(self.base).checked_add(offset).map(Ipv4Addr::from)
    }

    /// All addresses in enumeration order
    pub fn addresses(&self) -> impl Iterator<Item = Ipv4Addr> + '_ {
        (0..self.count()).filter_map(move |i| self.address_at(i))
    }
}

/// Split a CIDR string into base address and prefix length.
pub fn parse_cidr(cidr: &str) -> Result<(Ipv4Addr, u8)> {
    let cidr = cidr.trim();
    let (ip_str, prefix_str) = cidr.split_once('/').unwrap_or((cidr, "32"));

    let base = ip_str
        .parse::<Ipv4Addr>()
        .map_err(|_| RblError::InvalidCidr(format!("{cidr}: {ip_str:?} is not an IPv4 address")))?;

    let prefix = prefix_str
        .parse::<u8>()
        .map_err(|_| RblError::InvalidCidr(format!("{cidr}: {prefix_str:?} is not a prefix length")))?;

    if prefix > 32 {
        return Err(RblError::InvalidPrefix(prefix));
    }

    Ok((base, prefix))
}
