//! Domain models for subnet usage reporting.
//!
//! - [`CidrBlock`] and [`AddressSpace`] - the subnet's address pool
//! - collector records ([`SubnetRecord`], [`InterfaceRecord`], ...)
//! - [`HolderRecord`] - who holds each address
//! - [`ResourceGroup`] and [`UtilizationReport`] - the engine's output

mod address_space;
mod cidr;
mod group;
mod holder;
mod records;
mod report;
mod tags;

pub use address_space::AddressSpace;
pub use cidr::{
    cut_addr, get_cidr_mask, num_usable_hosts, CidrBlock, MAX_LENGTH,
    RESERVED_HIGH, RESERVED_LOW,
};
pub use group::{
    Capacity, GroupDetail, GroupKind, NodeGroupSummary, NodeInstance, ResourceGroup, UNAVAILABLE_GROUP_KEY,
};
pub use holder::{HolderMap, HolderRecord, HolderSource};
pub use records::{
    AutoScalingGroupRecord, InstanceRecord, InterfaceRecord, LoadBalancerRecord,
    LoadBalancerZone, NodeGroupRecord, ScalingConfig, SubnetRecord,
};
pub use report::{CollectorKind, Diagnostic, UtilizationReport};
pub use tags::{Tags, ASG_NAME_TAG, EKS_CLUSTER_TAG, K8S_CLUSTER_TAG_PREFIX};
