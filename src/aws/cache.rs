//! Frozen collector outputs.
//!
//! A snapshot holds everything the collectors returned for one subnet, so a
//! report can be replayed offline or in tests without touching AWS.

use super::collector::{Collected, ResourceCollector, SubnetQuery};
use crate::error::BoxError;
use crate::models::{
    AutoScalingGroupRecord, CidrBlock, CollectorKind, InstanceRecord, InterfaceRecord,
    LoadBalancerRecord, NodeGroupRecord, SubnetRecord,
};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct CollectorSnapshot {
    pub subnets: Vec<SubnetRecord>,
    #[serde(default)]
    pub network_interfaces: Vec<InterfaceRecord>,
    #[serde(default)]
    pub instances: Vec<InstanceRecord>,
    #[serde(default)]
    pub autoscaling_groups: Vec<AutoScalingGroupRecord>,
    #[serde(default)]
    pub load_balancers: Vec<LoadBalancerRecord>,
    #[serde(default)]
    pub node_groups: Vec<NodeGroupRecord>,
    /// Collectors that should report an error on replay.
    #[serde(default)]
    pub failures: Vec<CollectorKind>,
}

impl CollectorSnapshot {
    /// Snapshot of a live run for `subnet`.
    pub fn capture(subnet: &SubnetRecord, collected: &Collected) -> CollectorSnapshot {
        CollectorSnapshot {
            subnets: vec![subnet.clone()],
            network_interfaces: collected.interfaces.clone(),
            instances: collected.instances.clone(),
            autoscaling_groups: collected.autoscaling_groups.clone(),
            load_balancers: collected.load_balancers.clone(),
            node_groups: collected.node_groups.clone(),
            failures: collected.failures.iter().map(|(kind, _)| *kind).collect(),
        }
    }
}

/// Default snapshot file name, dated in the configured timezone.
pub fn snapshot_file_name(subnet_id: &str, tz: Tz) -> String {
    let now = chrono::Utc::now().with_timezone(&tz);
    format!("subnet_usage_{subnet_id}_{}.json", now.format("%Y-%m-%d"))
}

pub fn read_snapshot(file: &str) -> Result<CollectorSnapshot, BoxError> {
    if !Path::new(file).exists() {
        return Err(format!("Snapshot file does not exist: {file}").into());
    }
    log::info!("Reading collector snapshot: {file}");
    let json =
        std::fs::read_to_string(file).map_err(|e| format!("Error reading snapshot {file}: {e}"))?;
    super::wire::parse_json(&json, file)
}

pub fn write_snapshot(file: &str, snapshot: &CollectorSnapshot) -> Result<(), BoxError> {
    let json = serde_json::to_string_pretty(snapshot)
        .map_err(|e| format!("Error serializing snapshot: {e}"))?;
    log::warn!("Writing collector snapshot: {file}");
    std::fs::write(file, json).map_err(|e| format!("Error writing snapshot {file}: {e}"))?;
    Ok(())
}

/// Replays a [`CollectorSnapshot`].
///
/// Record lists are returned as stored: the snapshot is assumed to describe
/// one subnet, so the `subnet_id` arguments are not used for filtering.
pub struct SnapshotCollector {
    snapshot: CollectorSnapshot,
}

impl SnapshotCollector {
    pub fn new(snapshot: CollectorSnapshot) -> SnapshotCollector {
        SnapshotCollector { snapshot }
    }

    pub fn from_file(file: &str) -> Result<SnapshotCollector, BoxError> {
        Ok(SnapshotCollector::new(read_snapshot(file)?))
    }

    fn replay<T: Clone>(&self, kind: CollectorKind, records: &[T]) -> Result<Vec<T>, BoxError> {
        if self.snapshot.failures.contains(&kind) {
            return Err(format!("{kind} unavailable in snapshot (recorded failure)").into());
        }
        Ok(records.to_vec())
    }
}

impl ResourceCollector for SnapshotCollector {
    fn find_subnet(&self, query: &SubnetQuery) -> Result<Vec<SubnetRecord>, BoxError> {
        let matches = self
            .snapshot
            .subnets
            .iter()
            .filter(|s| match query {
                SubnetQuery::Id(id) => &s.id == id,
                SubnetQuery::Cidr(cidr) => {
                    match (CidrBlock::new(&s.cidr), CidrBlock::new(cidr)) {
                        (Ok(a), Ok(b)) => a == b,
                        _ => &s.cidr == cidr,
                    }
                }
            })
            .cloned()
            .collect();
        Ok(matches)
    }

    fn list_network_interfaces(&self, _subnet_id: &str) -> Result<Vec<InterfaceRecord>, BoxError> {
        self.replay(CollectorKind::NetworkInterfaces, &self.snapshot.network_interfaces)
    }

    fn list_instances(&self, _subnet_id: &str) -> Result<Vec<InstanceRecord>, BoxError> {
        self.replay(CollectorKind::Instances, &self.snapshot.instances)
    }

    fn list_autoscaling_groups(&self) -> Result<Vec<AutoScalingGroupRecord>, BoxError> {
        self.replay(CollectorKind::AutoScalingGroups, &self.snapshot.autoscaling_groups)
    }

    fn list_load_balancers(&self) -> Result<Vec<LoadBalancerRecord>, BoxError> {
        self.replay(CollectorKind::LoadBalancers, &self.snapshot.load_balancers)
    }

    fn list_managed_node_groups(&self) -> Result<Vec<NodeGroupRecord>, BoxError> {
        self.replay(CollectorKind::NodeGroups, &self.snapshot.node_groups)
    }
}
