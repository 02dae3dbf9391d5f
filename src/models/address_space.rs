//! Usable address pool of a subnet.

use super::cidr::{num_usable_hosts, CidrBlock, RESERVED_LOW};
use crate::error::UsageError;
use std::net::Ipv4Addr;

/// The addresses AWS lets resources hold in a subnet: the block minus its
/// first four and last address.
///
/// Addresses are produced lazily, so large blocks cost nothing to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressSpace {
    cidr: CidrBlock,
    len: u64,
}

impl AddressSpace {
    pub fn from_cidr(cidr: &str) -> Result<AddressSpace, UsageError> {
        let block = CidrBlock::new(cidr).map_err(|e| {
            log::debug!("CIDR parse failed for {cidr}: {e}");
            UsageError::InvalidCidr(cidr.to_string())
        })?;
        let len = num_usable_hosts(block.prefix)
            .map_err(|_| UsageError::InvalidCidr(cidr.to_string()))?;
        Ok(AddressSpace { cidr: block, len })
    }

    pub fn cidr(&self) -> CidrBlock {
        self.cidr
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// First usable address, if the block has any.
    pub fn first(&self) -> Option<Ipv4Addr> {
        self.iter().next()
    }

    /// Whether `addr` is one of the usable addresses.
    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        if self.is_empty() || !self.cidr.contains(addr) {
            return false;
        }
        let offset = u64::from(u32::from(addr) - u32::from(self.cidr.lo()));
        offset >= RESERVED_LOW && offset < RESERVED_LOW + self.len
    }

    /// Usable addresses in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = Ipv4Addr> {
        let start = u64::from(u32::from(self.cidr.lo())) + RESERVED_LOW;
        (start..start + self.len).map(|bits| Ipv4Addr::from(bits as u32))
    }
}

impl std::fmt::Display for AddressSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} ({} usable)", self.cidr, self.len)
    }
}
