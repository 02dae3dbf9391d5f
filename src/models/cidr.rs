//! IPv4 CIDR block arithmetic.

use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// Maximum length for an IPv4 prefix (32 bits).
pub const MAX_LENGTH: u8 = 32;

/// Addresses AWS reserves at the start of every subnet
/// (network, VPC router, DNS, future use).
pub const RESERVED_LOW: u64 = 4;
/// Addresses AWS reserves at the end of every subnet (broadcast).
pub const RESERVED_HIGH: u64 = 1;

/// Convert a prefix length to a netmask as u32.
///
/// # Examples
/// ```
/// use aws_subnet_usage::models::get_cidr_mask;
/// assert_eq!(get_cidr_mask(24).unwrap(), 0xFFFFFF00);
/// ```
pub fn get_cidr_mask(len: u8) -> Result<u32, Box<dyn Error + Send + Sync>> {
    if len > MAX_LENGTH {
        Err("Network length is too long".into())
    } else {
        let right_len = MAX_LENGTH - len;
        let all_bits = u32::MAX as u64;
        let mask = (all_bits >> right_len) << right_len;
        Ok(mask as u32)
    }
}

/// Network address for a given IP and prefix length.
pub fn cut_addr(addr: Ipv4Addr, len: u8) -> Result<Ipv4Addr, Box<dyn Error + Send + Sync>> {
    let mask = get_cidr_mask(len)?;
    Ok(Ipv4Addr::from(u32::from(addr) & mask))
}

/// Number of addresses AWS lets you assign in a subnet of the given prefix.
///
/// Blocks too small to hold the five reserved addresses have none.
pub fn num_usable_hosts(len: u8) -> Result<u64, Box<dyn Error + Send + Sync>> {
    if len > MAX_LENGTH {
        return Err("Network length is too long".into());
    }
    let block_size = 1u64 << (MAX_LENGTH - len);
    Ok(block_size.saturating_sub(RESERVED_LOW + RESERVED_HIGH))
}

/// An IPv4 block in CIDR notation, always stored at its network address.
#[derive(Eq, Ord, PartialEq, PartialOrd, Debug, Copy, Clone, Hash)]
pub struct CidrBlock {
    /// First address of the block.
    pub network: Ipv4Addr,
    /// Prefix length (0-32).
    pub prefix: u8,
}

impl CidrBlock {
    /// Parse a CIDR string such as `"10.0.1.0/24"`.
    ///
    /// Host bits are masked off, so `"10.0.1.7/24"` gives `10.0.1.0/24`.
    pub fn new(addr_cidr: &str) -> Result<CidrBlock, Box<dyn Error + Send + Sync>> {
        let (addr, prefix) = addr_cidr
            .trim()
            .split_once('/')
            .ok_or_else(|| format!("Missing prefix length in {addr_cidr}"))?;
        let addr: Ipv4Addr = addr
            .parse()
            .map_err(|_| format!("Invalid address {addr}"))?;
        let prefix: u8 = prefix
            .parse()
            .map_err(|_| format!("Invalid prefix length {prefix}"))?;
        if prefix > MAX_LENGTH {
            return Err("Network length is too long".into());
        }
        Ok(CidrBlock {
            network: cut_addr(addr, prefix)?,
            prefix,
        })
    }

    /// Total addresses in the block, reserved ones included.
    pub fn size(&self) -> u64 {
        1u64 << (MAX_LENGTH - self.prefix)
    }

    /// Lowest (network) address.
    pub fn lo(&self) -> Ipv4Addr {
        self.network
    }

    /// Highest (broadcast) address.
    pub fn hi(&self) -> Ipv4Addr {
        let host_bits = (self.size() - 1) as u32;
        Ipv4Addr::from(u32::from(self.network) | host_bits)
    }

    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        self.lo() <= addr && addr <= self.hi()
    }
}

impl FromStr for CidrBlock {
    type Err = Box<dyn Error + Send + Sync>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CidrBlock::new(s)
    }
}

impl Serialize for CidrBlock {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for CidrBlock {
    fn deserialize<D>(deserializer: D) -> Result<CidrBlock, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        CidrBlock::new(&s).map_err(|e| de::Error::custom(format!("invalid CIDR {s}: {e}")))
    }
}

impl std::fmt::Display for CidrBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}", self.network, self.prefix)
    }
}
