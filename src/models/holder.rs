//! Address holders.

use super::Tags;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::Ipv4Addr;

/// Where a holder record came from.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum HolderSource {
    Interface,
    Instance,
}

/// The resource holding one address in the subnet.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct HolderRecord {
    pub address: Ipv4Addr,
    /// Free text used for classification. Interface records carry
    /// `"<interface-id> / <description>"`, instance records their instance id.
    pub descriptor: String,
    /// Interface or instance id.
    pub holder_id: String,
    pub source: HolderSource,
    /// Instance tags; empty for interface records.
    #[serde(default)]
    pub tags: Tags,
}

/// At most one holder per address, ordered by address.
pub type HolderMap = BTreeMap<Ipv4Addr, HolderRecord>;
