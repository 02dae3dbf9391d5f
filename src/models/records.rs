//! Raw records returned by resource collectors.
//!
//! These are the shapes the engine consumes; how a collector fills them
//! (AWS CLI, snapshot file) is its own business.

use super::Tags;
use serde::{Deserialize, Serialize};

/// Subnet metadata as reported by the provider.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SubnetRecord {
    pub id: String,
    pub cidr: String,
    pub availability_zone: String,
    /// Addresses the provider says are still free.
    pub available_ip_count: u64,
    #[serde(default)]
    pub vpc_id: Option<String>,
}

/// One private address held by a network interface.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct InterfaceRecord {
    pub address: String,
    /// `"<interface-id> / <description>"`.
    pub descriptor: String,
    pub interface_id: String,
}

/// One private address held by an instance.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct InstanceRecord {
    pub address: String,
    pub instance_id: String,
    #[serde(default)]
    pub tags: Tags,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AutoScalingGroupRecord {
    pub name: String,
    pub subnet_ids: Vec<String>,
    pub instance_ids: Vec<String>,
    pub max_size: u64,
    pub current_size: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LoadBalancerZone {
    pub subnet_id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LoadBalancerRecord {
    pub name: String,
    /// `application`, `network` or `gateway`.
    #[serde(rename = "type")]
    pub lb_type: String,
    pub arn: String,
    #[serde(default)]
    pub zones: Vec<LoadBalancerZone>,
    #[serde(default)]
    pub tags: Tags,
}

impl LoadBalancerRecord {
    pub fn is_network(&self) -> bool {
        self.lb_type == "network"
    }

    pub fn in_subnet(&self, subnet_id: &str) -> bool {
        self.zones.iter().any(|z| z.subnet_id == subnet_id)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScalingConfig {
    pub min_size: u64,
    pub max_size: u64,
    pub desired_size: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NodeGroupRecord {
    pub cluster: String,
    pub name: String,
    pub subnet_ids: Vec<String>,
    #[serde(default)]
    pub instance_types: Vec<String>,
    #[serde(default)]
    pub scaling_config: Option<ScalingConfig>,
    #[serde(default)]
    pub status: Option<String>,
}
