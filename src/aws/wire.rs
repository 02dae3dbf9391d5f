//! JSON shapes printed by `aws ... --output json` and their conversion to
//! collector records.

use crate::error::BoxError;
use crate::models::{
    AutoScalingGroupRecord, InstanceRecord, InterfaceRecord, LoadBalancerRecord,
    LoadBalancerZone, NodeGroupRecord, ScalingConfig, SubnetRecord, Tags,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Parse CLI output, reporting the JSON path of any mismatch.
pub fn parse_json<T: DeserializeOwned>(output: &str, what: &str) -> Result<T, BoxError> {
    let mut deserializer = serde_json::Deserializer::from_str(output);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        log::trace!("OUTPUT START:\n\n{}\n\nOUTPUT END\n", output);
        format!("Error parsing {what}: path={} error={}", e.path(), e).into()
    })
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeSubnets {
    pub subnets: Vec<Subnet>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct Subnet {
    pub subnet_id: String,
    pub cidr_block: String,
    pub availability_zone: String,
    pub available_ip_address_count: u64,
    #[serde(default)]
    pub vpc_id: Option<String>,
}

impl From<Subnet> for SubnetRecord {
    fn from(s: Subnet) -> Self {
        SubnetRecord {
            id: s.subnet_id,
            cidr: s.cidr_block,
            availability_zone: s.availability_zone,
            available_ip_count: s.available_ip_address_count,
            vpc_id: s.vpc_id,
        }
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct PrivateIp {
    pub private_ip_address: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeNetworkInterfaces {
    pub network_interfaces: Vec<NetworkInterface>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct NetworkInterface {
    pub network_interface_id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub private_ip_addresses: Vec<PrivateIp>,
}

impl NetworkInterface {
    /// One record per private address.
    pub fn into_records(self) -> Vec<InterfaceRecord> {
        let descriptor = format!("{} / {}", self.network_interface_id, self.description);
        self.private_ip_addresses
            .into_iter()
            .map(|ip| InterfaceRecord {
                address: ip.private_ip_address,
                descriptor: descriptor.clone(),
                interface_id: self.network_interface_id.clone(),
            })
            .collect()
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeInstances {
    pub reservations: Vec<Reservation>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct Reservation {
    pub instances: Vec<Instance>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct Instance {
    pub instance_id: String,
    #[serde(default)]
    pub private_ip_address: Option<String>,
    #[serde(default)]
    pub subnet_id: Option<String>,
    #[serde(default)]
    pub tags: Tags,
    #[serde(default)]
    pub network_interfaces: Vec<InstanceInterface>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct InstanceInterface {
    #[serde(default)]
    pub subnet_id: Option<String>,
    #[serde(default)]
    pub private_ip_addresses: Vec<PrivateIp>,
}

impl Instance {
    /// Records for every private address the instance holds in `subnet_id`.
    ///
    /// Falls back to the primary address when the interface list is absent.
    pub fn into_records(self, subnet_id: &str) -> Vec<InstanceRecord> {
        let mut addresses: Vec<String> = self
            .network_interfaces
            .iter()
            .filter(|ni| ni.subnet_id.as_deref() == Some(subnet_id))
            .flat_map(|ni| ni.private_ip_addresses.iter())
            .map(|ip| ip.private_ip_address.clone())
            .collect();
        if addresses.is_empty() && self.subnet_id.as_deref() == Some(subnet_id) {
            addresses.extend(self.private_ip_address.clone());
        }
        addresses
            .into_iter()
            .map(|address| InstanceRecord {
                address,
                instance_id: self.instance_id.clone(),
                tags: self.tags.clone(),
            })
            .collect()
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeAutoScalingGroups {
    pub auto_scaling_groups: Vec<AutoScalingGroup>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct AutoScalingGroup {
    pub auto_scaling_group_name: String,
    #[serde(rename = "VPCZoneIdentifier", default)]
    pub vpc_zone_identifier: String,
    pub max_size: u64,
    #[serde(default)]
    pub instances: Vec<AsgInstance>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct AsgInstance {
    pub instance_id: String,
}

impl From<AutoScalingGroup> for AutoScalingGroupRecord {
    fn from(asg: AutoScalingGroup) -> Self {
        let instance_ids: Vec<String> = asg.instances.into_iter().map(|i| i.instance_id).collect();
        AutoScalingGroupRecord {
            name: asg.auto_scaling_group_name,
            subnet_ids: asg
                .vpc_zone_identifier
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
            max_size: asg.max_size,
            current_size: instance_ids.len() as u64,
            instance_ids,
        }
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeLoadBalancers {
    pub load_balancers: Vec<LoadBalancer>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct LoadBalancer {
    pub load_balancer_name: String,
    pub load_balancer_arn: String,
    #[serde(rename = "Type")]
    pub lb_type: String,
    #[serde(default)]
    pub availability_zones: Vec<AvailabilityZone>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct AvailabilityZone {
    #[serde(default)]
    pub subnet_id: Option<String>,
}

impl From<LoadBalancer> for LoadBalancerRecord {
    fn from(lb: LoadBalancer) -> Self {
        LoadBalancerRecord {
            name: lb.load_balancer_name,
            lb_type: lb.lb_type,
            arn: lb.load_balancer_arn,
            zones: lb
                .availability_zones
                .into_iter()
                .filter_map(|az| az.subnet_id)
                .map(|subnet_id| LoadBalancerZone { subnet_id })
                .collect(),
            tags: Tags::new(),
        }
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeTags {
    pub tag_descriptions: Vec<TagDescription>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct TagDescription {
    pub resource_arn: String,
    #[serde(default)]
    pub tags: Tags,
}

#[derive(Deserialize, Debug)]
pub struct ListClusters {
    pub clusters: Vec<String>,
}

#[derive(Deserialize, Debug)]
pub struct ListNodegroups {
    pub nodegroups: Vec<String>,
}

#[derive(Deserialize, Debug)]
pub struct DescribeNodegroup {
    pub nodegroup: Nodegroup,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Nodegroup {
    pub nodegroup_name: String,
    pub cluster_name: String,
    #[serde(default)]
    pub subnets: Vec<String>,
    #[serde(default)]
    pub instance_types: Option<Vec<String>>,
    #[serde(default)]
    pub scaling_config: Option<NodegroupScaling>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct NodegroupScaling {
    #[serde(default)]
    pub min_size: u64,
    #[serde(default)]
    pub max_size: u64,
    #[serde(default)]
    pub desired_size: u64,
}

impl From<Nodegroup> for NodeGroupRecord {
    fn from(ng: Nodegroup) -> Self {
        NodeGroupRecord {
            cluster: ng.cluster_name,
            name: ng.nodegroup_name,
            subnet_ids: ng.subnets,
            instance_types: ng.instance_types.unwrap_or_default(),
            scaling_config: ng.scaling_config.map(|s| ScalingConfig {
                min_size: s.min_size,
                max_size: s.max_size,
                desired_size: s.desired_size,
            }),
            status: ng.status,
        }
    }
}
