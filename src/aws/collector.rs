//! The collector interface and concurrent collection.

use crate::error::BoxError;
use crate::models::{
    AutoScalingGroupRecord, CollectorKind, InstanceRecord, InterfaceRecord, LoadBalancerRecord,
    NodeGroupRecord, SubnetRecord,
};
use std::sync::Arc;

/// How the subnet is looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubnetQuery {
    Id(String),
    Cidr(String),
}

impl std::fmt::Display for SubnetQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubnetQuery::Id(id) => f.write_str(id),
            SubnetQuery::Cidr(cidr) => f.write_str(cidr),
        }
    }
}

/// Read-only source of subnet and resource records.
///
/// Implementations own pagination and retries; a returned error means the
/// record set is unavailable for this run.
pub trait ResourceCollector: Send + Sync {
    /// All subnets matching the query; zero or many is the caller's problem.
    fn find_subnet(&self, query: &SubnetQuery) -> Result<Vec<SubnetRecord>, BoxError>;

    fn list_network_interfaces(&self, subnet_id: &str) -> Result<Vec<InterfaceRecord>, BoxError>;

    fn list_instances(&self, subnet_id: &str) -> Result<Vec<InstanceRecord>, BoxError>;

    fn list_autoscaling_groups(&self) -> Result<Vec<AutoScalingGroupRecord>, BoxError>;

    fn list_load_balancers(&self) -> Result<Vec<LoadBalancerRecord>, BoxError>;

    fn list_managed_node_groups(&self) -> Result<Vec<NodeGroupRecord>, BoxError>;
}

/// Output of the five collector calls for one subnet.
///
/// A failed collector leaves its list empty and shows up in `failures`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collected {
    pub interfaces: Vec<InterfaceRecord>,
    pub instances: Vec<InstanceRecord>,
    pub autoscaling_groups: Vec<AutoScalingGroupRecord>,
    pub load_balancers: Vec<LoadBalancerRecord>,
    pub node_groups: Vec<NodeGroupRecord>,
    pub failures: Vec<(CollectorKind, String)>,
}

impl Collected {
    pub fn failed(&self, kind: CollectorKind) -> bool {
        self.failures.iter().any(|(k, _)| *k == kind)
    }

    fn absorb<T>(&mut self, kind: CollectorKind, result: Result<Vec<T>, String>) -> Vec<T> {
        match result {
            Ok(records) => {
                log::info!("collected {} {kind} record(s)", records.len());
                records
            }
            Err(message) => {
                log::warn!("{kind} collector degraded: {message}");
                self.failures.push((kind, message));
                vec![]
            }
        }
    }
}

async fn call<T, F>(collector: Arc<dyn ResourceCollector>, f: F) -> Result<Vec<T>, String>
where
    T: Send + 'static,
    F: FnOnce(&dyn ResourceCollector) -> Result<Vec<T>, BoxError> + Send + 'static,
{
    match tokio::task::spawn_blocking(move || f(collector.as_ref()).map_err(|e| e.to_string()))
        .await
    {
        Ok(result) => result,
        Err(join_error) => Err(format!("collector task aborted: {join_error}")),
    }
}

/// Run the five collector calls for `subnet_id` concurrently.
///
/// Never fails: each failed call is recorded in [`Collected::failures`].
pub async fn collect_all(collector: Arc<dyn ResourceCollector>, subnet_id: &str) -> Collected {
    let eni_subnet = subnet_id.to_string();
    let ec2_subnet = subnet_id.to_string();

    let (interfaces, instances, asgs, lbs, node_groups) = futures::join!(
        call(collector.clone(), move |c| c.list_network_interfaces(&eni_subnet)),
        call(collector.clone(), move |c| c.list_instances(&ec2_subnet)),
        call(collector.clone(), |c| c.list_autoscaling_groups()),
        call(collector.clone(), |c| c.list_load_balancers()),
        call(collector, |c| c.list_managed_node_groups()),
    );

    let mut collected = Collected::default();
    collected.interfaces = collected.absorb(CollectorKind::NetworkInterfaces, interfaces);
    collected.instances = collected.absorb(CollectorKind::Instances, instances);
    collected.autoscaling_groups = collected.absorb(CollectorKind::AutoScalingGroups, asgs);
    collected.load_balancers = collected.absorb(CollectorKind::LoadBalancers, lbs);
    collected.node_groups = collected.absorb(CollectorKind::NodeGroups, node_groups);
    collected
}
