//! Resource groups that own addresses in a subnet.

use super::{ScalingConfig, Tags};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;

/// Key used for the stand-in group of a kind whose collector failed.
pub const UNAVAILABLE_GROUP_KEY: &str = "(unavailable)";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupKind {
    ClassicOrALB,
    NetworkLoadBalancer,
    AutoScalingGroup,
    ManagedNodeGroup,
}

impl GroupKind {
    pub const ALL: [GroupKind; 4] = [
        GroupKind::ClassicOrALB,
        GroupKind::NetworkLoadBalancer,
        GroupKind::AutoScalingGroup,
        GroupKind::ManagedNodeGroup,
    ];

    /// Plural label used in summaries.
    pub fn label(&self) -> &'static str {
        match self {
            GroupKind::ClassicOrALB => "Classic/ALBs",
            GroupKind::NetworkLoadBalancer => "NLBs",
            GroupKind::AutoScalingGroup => "ASGs",
            GroupKind::ManagedNodeGroup => "EKS node groups",
        }
    }
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GroupKind::ClassicOrALB => "classic_or_alb",
            GroupKind::NetworkLoadBalancer => "nlb",
            GroupKind::AutoScalingGroup => "asg",
            GroupKind::ManagedNodeGroup => "eks_node_group",
        };
        f.write_str(s)
    }
}

/// Additional addresses a group may still claim.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Capacity {
    Known(u64),
    Unknown,
}

impl Capacity {
    pub fn known(&self) -> Option<u64> {
        match self {
            Capacity::Known(n) => Some(*n),
            Capacity::Unknown => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Capacity::Unknown)
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capacity::Known(n) => write!(f, "{n}"),
            Capacity::Unknown => f.write_str("unknown"),
        }
    }
}

/// Kind-specific facts kept for display.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GroupDetail {
    #[default]
    None,
    LoadBalancer {
        arn: Option<String>,
        tags: Tags,
        /// True when only zone membership, not an interface, placed it here.
        zone_fallback: bool,
    },
    AutoScaling {
        max_size: u64,
        current_size: u64,
        instance_ids: Vec<String>,
    },
    NodeGroups {
        node_groups: Vec<NodeGroupSummary>,
        instances: Vec<NodeInstance>,
    },
}

/// A cluster instance and one of its in-subnet addresses.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NodeInstance {
    pub instance_id: String,
    pub address: Ipv4Addr,
    #[serde(default)]
    pub tags: Tags,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NodeGroupSummary {
    pub name: String,
    pub instance_types: Vec<String>,
    pub scaling_config: Option<ScalingConfig>,
    pub status: Option<String>,
}

/// A logical owner of addresses in the subnet and its demand.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ResourceGroup {
    pub key: String,
    pub kind: GroupKind,
    /// Addresses (or members) currently used in the subnet.
    pub current: u64,
    /// Extra addresses the group can still claim when fully scaled.
    pub maximum: Capacity,
    /// In-subnet addresses attributed to the group.
    #[serde(default)]
    pub addresses: Vec<Ipv4Addr>,
    #[serde(default)]
    pub diagnostic: Option<String>,
    #[serde(default)]
    pub detail: GroupDetail,
}

impl ResourceGroup {
    pub fn new(kind: GroupKind, key: impl Into<String>) -> ResourceGroup {
        ResourceGroup {
            key: key.into(),
            kind,
            current: 0,
            maximum: Capacity::Known(0),
            addresses: vec![],
            diagnostic: None,
            detail: GroupDetail::None,
        }
    }

    /// Stand-in for a kind whose collector failed before any group was seen.
    pub fn unavailable(kind: GroupKind, reason: &str) -> ResourceGroup {
        let mut group = ResourceGroup::new(kind, UNAVAILABLE_GROUP_KEY);
        group.mark_unknown(reason);
        group
    }

    pub fn mark_unknown(&mut self, reason: &str) {
        self.maximum = Capacity::Unknown;
        self.note(reason);
    }

    /// Append to the diagnostic without touching the maximum.
    pub fn note(&mut self, text: &str) {
        self.diagnostic = match self.diagnostic.take() {
            Some(existing) => Some(format!("{existing}; {text}")),
            None => Some(text.to_string()),
        };
    }
}

impl fmt::Display for ResourceGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} current={} max={}",
            self.kind, self.key, self.current, self.maximum
        )
    }
}
