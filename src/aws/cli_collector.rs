//! Collector backed by the `aws` command line tool.
//!
//! The CLI paginates on its own, so each call below is a single command
//! whose JSON is parsed with [`parse_json`].

use super::cli;
use super::collector::{ResourceCollector, SubnetQuery};
use super::wire::{self, parse_json};
use crate::config::Settings;
use crate::error::BoxError;
use crate::models::{
    AutoScalingGroupRecord, InstanceRecord, InterfaceRecord, LoadBalancerRecord,
    NodeGroupRecord, SubnetRecord, Tags,
};
use std::collections::HashMap;

/// ELBv2 `describe-tags` accepts at most this many ARNs per call.
const TAG_BATCH: usize = 20;

/// Per-run AWS session parameters.
///
/// Built once per invocation and dropped with the collector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AwsContext {
    pub profile: Option<String>,
    pub region: Option<String>,
    pub retries: u32,
}

impl AwsContext {
    pub fn from_settings(settings: &Settings) -> AwsContext {
        AwsContext {
            profile: settings.profile.clone(),
            region: settings.region.clone(),
            retries: settings.retries,
        }
    }

    /// Full command line for an `aws` sub-command.
    pub fn command(&self, args: &str) -> String {
        let mut cmd = format!("aws {args} --output json");
        if let Some(profile) = &self.profile {
            cmd.push_str(&format!(" --profile {profile}"));
        }
        if let Some(region) = &self.region {
            cmd.push_str(&format!(" --region {region}"));
        }
        cmd
    }
}

pub struct AwsCliCollector {
    context: AwsContext,
    fetch_tags: bool,
}

impl AwsCliCollector {
    pub fn new(context: AwsContext) -> AwsCliCollector {
        AwsCliCollector {
            context,
            fetch_tags: false,
        }
    }

    /// Also fetch load balancer tags (one extra call per 20 balancers).
    pub fn with_tags(mut self, fetch_tags: bool) -> AwsCliCollector {
        self.fetch_tags = fetch_tags;
        self
    }

    fn aws(&self, args: &str) -> Result<String, BoxError> {
        cli::run_with_retry(&self.context.command(args), self.context.retries)
    }

    fn load_balancer_tags(&self, arns: &[&str]) -> Result<HashMap<String, Tags>, BoxError> {
        let mut tags = HashMap::new();
        for batch in arns.chunks(TAG_BATCH) {
            let out = self.aws(&format!(
                "elbv2 describe-tags --resource-arns {}",
                batch.join(" ")
            ))?;
            let parsed: wire::DescribeTags = parse_json(&out, "elbv2 describe-tags")?;
            tags.extend(
                parsed
                    .tag_descriptions
                    .into_iter()
                    .map(|d| (d.resource_arn, d.tags)),
            );
        }
        Ok(tags)
    }
}

impl ResourceCollector for AwsCliCollector {
    fn find_subnet(&self, query: &SubnetQuery) -> Result<Vec<SubnetRecord>, BoxError> {
        let args = match query {
            SubnetQuery::Id(id) => format!("ec2 describe-subnets --subnet-ids {id}"),
            SubnetQuery::Cidr(cidr) => {
                format!("ec2 describe-subnets --filters Name=cidr-block,Values={cidr}")
            }
        };
        log::info!("Querying for subnet {query}");
        let out = match self.aws(&args) {
            Ok(out) => out,
            // An unknown id is an API error rather than an empty list.
            Err(e) if e.to_string().contains("InvalidSubnetID.NotFound") => return Ok(vec![]),
            Err(e) => return Err(e),
        };
        let parsed: wire::DescribeSubnets = parse_json(&out, "ec2 describe-subnets")?;
        log::debug!("describe-subnets result: {:?}", parsed);
        Ok(parsed.subnets.into_iter().map(SubnetRecord::from).collect())
    }

    fn list_network_interfaces(&self, subnet_id: &str) -> Result<Vec<InterfaceRecord>, BoxError> {
        log::debug!("Querying ENIs within the subnet");
        let out = self.aws(&format!(
            "ec2 describe-network-interfaces --filters Name=subnet-id,Values={subnet_id}"
        ))?;
        let parsed: wire::DescribeNetworkInterfaces =
            parse_json(&out, "ec2 describe-network-interfaces")?;
        Ok(parsed
            .network_interfaces
            .into_iter()
            .flat_map(wire::NetworkInterface::into_records)
            .collect())
    }

    fn list_instances(&self, subnet_id: &str) -> Result<Vec<InstanceRecord>, BoxError> {
        log::debug!("Querying EC2 instances within the subnet");
        let out = self.aws(&format!(
            "ec2 describe-instances --filters Name=network-interface.subnet-id,Values={subnet_id}"
        ))?;
        let parsed: wire::DescribeInstances = parse_json(&out, "ec2 describe-instances")?;
        Ok(parsed
            .reservations
            .into_iter()
            .flat_map(|r| r.instances)
            .flat_map(|i| i.into_records(subnet_id))
            .collect())
    }

    fn list_autoscaling_groups(&self) -> Result<Vec<AutoScalingGroupRecord>, BoxError> {
        let out = self.aws("autoscaling describe-auto-scaling-groups")?;
        let parsed: wire::DescribeAutoScalingGroups =
            parse_json(&out, "autoscaling describe-auto-scaling-groups")?;
        Ok(parsed
            .auto_scaling_groups
            .into_iter()
            .map(AutoScalingGroupRecord::from)
            .collect())
    }

    fn list_load_balancers(&self) -> Result<Vec<LoadBalancerRecord>, BoxError> {
        let out = self.aws("elbv2 describe-load-balancers")?;
        let parsed: wire::DescribeLoadBalancers = parse_json(&out, "elbv2 describe-load-balancers")?;
        let mut records: Vec<LoadBalancerRecord> = parsed
            .load_balancers
            .into_iter()
            .map(LoadBalancerRecord::from)
            .collect();

        if self.fetch_tags && !records.is_empty() {
            let arns: Vec<&str> = records.iter().map(|r| r.arn.as_str()).collect();
            match self.load_balancer_tags(&arns) {
                Ok(mut tags) => {
                    for record in records.iter_mut() {
                        if let Some(t) = tags.remove(&record.arn) {
                            record.tags = t;
                        }
                    }
                }
                Err(e) => log::warn!("Could not get load balancer tags: {e}"),
            }
        }
        Ok(records)
    }

    fn list_managed_node_groups(&self) -> Result<Vec<NodeGroupRecord>, BoxError> {
        let out = self.aws("eks list-clusters")?;
        let clusters: wire::ListClusters = parse_json(&out, "eks list-clusters")?;
        let mut records = vec![];
        for cluster in clusters.clusters {
            let out = self.aws(&format!("eks list-nodegroups --cluster-name {cluster}"))?;
            let nodegroups: wire::ListNodegroups = parse_json(&out, "eks list-nodegroups")?;
            for nodegroup in nodegroups.nodegroups {
                let out = self.aws(&format!(
                    "eks describe-nodegroup --cluster-name {cluster} --nodegroup-name {nodegroup}"
                ))?;
                let described: wire::DescribeNodegroup =
                    parse_json(&out, "eks describe-nodegroup")?;
                records.push(NodeGroupRecord::from(described.nodegroup));
            }
        }
        Ok(records)
    }
}
