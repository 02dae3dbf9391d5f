//! Current and maximum address demand per resource group.
//!
//! Maximums are headroom: addresses a group may still claim on top of what
//! it already holds, which is already counted in the subnet's used total.
//! Load balancers are the exception and always reserve [`ELB_MAX_IPS`].

use super::ownership::OwnershipIndex;
use crate::aws::Collected;
use crate::config::{AsgMaxPolicy, CapacityPolicy, NlbCurrentPolicy, ELB_MAX_IPS};
use crate::models::{
    AutoScalingGroupRecord, Capacity, CollectorKind, GroupDetail, GroupKind, HolderMap,
    HolderSource, LoadBalancerRecord, NodeGroupRecord, NodeGroupSummary, NodeInstance,
    ResourceGroup, ASG_NAME_TAG,
};
use itertools::Itertools;
use std::collections::{BTreeMap, BTreeSet};
use std::net::Ipv4Addr;

/// Inputs shared by the per-kind rules.
pub struct CapacityInput<'a> {
    pub subnet_id: &'a str,
    pub holders: &'a HolderMap,
    pub ownership: &'a OwnershipIndex,
    pub collected: &'a Collected,
    pub policy: CapacityPolicy,
}

impl<'a> CapacityInput<'a> {
    /// Instance ids holding an address in the subnet.
    fn in_subnet_instances(&self) -> BTreeSet<&'a str> {
        let holders = self.holders;
        holders
            .values()
            .filter(|h| h.source == HolderSource::Instance)
            .map(|h| h.holder_id.as_str())
            .collect()
    }

    fn addresses_of(&self, instance_ids: &BTreeSet<&str>) -> Vec<Ipv4Addr> {
        self.holders
            .values()
            .filter(|h| h.source == HolderSource::Instance && instance_ids.contains(h.holder_id.as_str()))
            .map(|h| h.address)
            .collect()
    }
}

/// Compute every group for the subnet, ordered by kind then key.
pub fn aggregate(input: &CapacityInput) -> Vec<ResourceGroup> {
    let mut clusters = node_groups(input);
    let asgs = autoscaling_groups(input, &sized_cluster_instances(&clusters));
    let counted: BTreeSet<Ipv4Addr> = asgs
        .iter()
        .flat_map(|g| g.addresses.iter().copied())
        .collect();
    for cluster in clusters.iter_mut().filter(|g| g.maximum.is_unknown()) {
        release_counted(cluster, &counted);
    }

    let mut groups = vec![];
    groups.extend(classic_groups(input));
    groups.extend(nlb_groups(input));
    groups.extend(asgs);
    groups.extend(clusters);
    apply_failures(&mut groups, &input.collected.failures);
    groups.sort_by(|a, b| (a.kind, &a.key).cmp(&(b.kind, &b.key)));
    for g in &groups {
        log::debug!("{g}");
    }
    groups
}

fn load_balancer_maximum(current: u64) -> Capacity {
    if current > ELB_MAX_IPS {
        log::warn!("load balancer holds {current} addresses, above the {ELB_MAX_IPS} cap");
    }
    Capacity::Known(ELB_MAX_IPS.max(current))
}

fn find_lb<'a>(
    lbs: &'a [LoadBalancerRecord],
    name: &str,
    network: bool,
) -> Option<&'a LoadBalancerRecord> {
    lbs.iter()
        .find(|lb| lb.name == name && lb.is_network() == network)
}

fn lb_detail(lb: Option<&LoadBalancerRecord>, zone_fallback: bool) -> GroupDetail {
    GroupDetail::LoadBalancer {
        arn: lb.map(|lb| lb.arn.clone()),
        tags: lb.map(|lb| lb.tags.clone()).unwrap_or_default(),
        zone_fallback,
    }
}

/// Classic ELBs and ALBs: one group per name found on interface descriptors.
pub fn classic_groups(input: &CapacityInput) -> Vec<ResourceGroup> {
    input
        .ownership
        .of_kind(GroupKind::ClassicOrALB)
        .map(|(name, addrs)| {
            let mut group = ResourceGroup::new(GroupKind::ClassicOrALB, name);
            group.current = addrs.len() as u64;
            group.maximum = load_balancer_maximum(group.current);
            group.addresses = addrs.clone();
            group.detail = lb_detail(find_lb(&input.collected.load_balancers, name, false), false);
            group
        })
        .collect()
}

/// NLBs found on interface descriptors plus NLBs whose zones include the
/// subnet but whose interface was not seen.
pub fn nlb_groups(input: &CapacityInput) -> Vec<ResourceGroup> {
    let lbs = &input.collected.load_balancers;
    let mut groups: BTreeMap<&str, ResourceGroup> = input
        .ownership
        .of_kind(GroupKind::NetworkLoadBalancer)
        .map(|(name, addrs)| {
            let mut group = ResourceGroup::new(GroupKind::NetworkLoadBalancer, name);
            group.current = addrs.len() as u64;
            group.maximum = load_balancer_maximum(group.current);
            group.addresses = addrs.clone();
            group.detail = lb_detail(find_lb(lbs, name, true), false);
            (name, group)
        })
        .collect();

    for lb in lbs
        .iter()
        .filter(|lb| lb.is_network() && lb.in_subnet(input.subnet_id))
    {
        if groups.contains_key(lb.name.as_str()) {
            continue;
        }
        let current = match input.policy.nlb_current {
            NlbCurrentPolicy::ZoneFallback => 1,
            NlbCurrentPolicy::Strict => 0,
        };
        log::debug!("NLB {} is in the subnet by zone only, current={current}", lb.name);
        let mut group = ResourceGroup::new(GroupKind::NetworkLoadBalancer, lb.name.as_str());
        group.current = current;
        group.maximum = load_balancer_maximum(current);
        group.detail = lb_detail(Some(lb), true);
        groups.insert(lb.name.as_str(), group);
    }
    groups.into_values().collect()
}

fn asg_maximum(asg: &AutoScalingGroupRecord, policy: AsgMaxPolicy) -> Capacity {
    match policy {
        AsgMaxPolicy::Headroom => Capacity::Known(asg.max_size.saturating_sub(asg.current_size)),
        AsgMaxPolicy::Absolute => Capacity::Known(asg.max_size),
    }
}

/// Instance ids of clusters whose maximum comes from node group scaling.
fn sized_cluster_instances(clusters: &[ResourceGroup]) -> BTreeSet<String> {
    clusters
        .iter()
        .filter(|g| !g.maximum.is_unknown())
        .filter_map(|g| match &g.detail {
            GroupDetail::NodeGroups { instances, .. } => Some(instances),
            _ => None,
        })
        .flatten()
        .map(|i| i.instance_id.clone())
        .collect()
}

/// Drop instances an ASG already counts from a cluster without a maximum.
fn release_counted(cluster: &mut ResourceGroup, counted: &BTreeSet<Ipv4Addr>) {
    let GroupDetail::NodeGroups { instances, .. } = &cluster.detail else {
        return;
    };
    let remaining = instances
        .iter()
        .filter(|i| !counted.contains(&i.address))
        .map(|i| i.instance_id.as_str())
        .unique()
        .count() as u64;
    if remaining < cluster.current {
        let moved = cluster.current - remaining;
        cluster.current = remaining;
        cluster.addresses.retain(|a| !counted.contains(a));
        cluster.note(&format!("{moved} instances counted under their ASG"));
    }
}

/// Autoscaling groups configured for the subnet.
///
/// `claimed` holds instances of clusters sized from node group scaling. Those
/// stay with the cluster, and an ASG made only of them is skipped so the same
/// pool is not counted twice.
pub fn autoscaling_groups(
    input: &CapacityInput,
    claimed: &BTreeSet<String>,
) -> Vec<ResourceGroup> {
    let in_subnet = input.in_subnet_instances();

    if input.collected.failed(CollectorKind::AutoScalingGroups) {
        return autoscaling_groups_from_tags(input, claimed);
    }

    input
        .collected
        .autoscaling_groups
        .iter()
        .filter(|asg| asg.subnet_ids.iter().any(|s| s == input.subnet_id))
        .filter_map(|asg| {
            let members: BTreeSet<&str> = asg
                .instance_ids
                .iter()
                .map(String::as_str)
                .filter(|id| in_subnet.contains(id))
                .collect();
            let unclaimed: BTreeSet<&str> = members
                .iter()
                .filter(|id| !claimed.contains(**id))
                .copied()
                .collect();
            if !members.is_empty() && unclaimed.is_empty() {
                log::debug!("ASG {} belongs to a node group, skipped", asg.name);
                return None;
            }
            let mut group = ResourceGroup::new(GroupKind::AutoScalingGroup, asg.name.as_str());
            group.current = unclaimed.len() as u64;
            group.maximum = asg_maximum(asg, input.policy.asg_max);
            group.addresses = input.addresses_of(&unclaimed);
            group.detail = GroupDetail::AutoScaling {
                max_size: asg.max_size,
                current_size: asg.current_size,
                instance_ids: asg.instance_ids.clone(),
            };
            Some(group)
        })
        .collect()
}

/// Partial ASG groups rebuilt from the `aws:autoscaling:groupName` tag when
/// the autoscaling collector failed. Maximums are set unknown later.
fn autoscaling_groups_from_tags(
    input: &CapacityInput,
    claimed: &BTreeSet<String>,
) -> Vec<ResourceGroup> {
    input
        .holders
        .values()
        .filter(|h| h.source == HolderSource::Instance && !claimed.contains(h.holder_id.as_str()))
        .filter_map(|h| h.tags.get(ASG_NAME_TAG).map(|name| (name, h)))
        .into_group_map()
        .into_iter()
        .map(|(name, members)| {
            let instances: BTreeSet<&str> = members.iter().map(|h| h.holder_id.as_str()).collect();
            let mut group = ResourceGroup::new(GroupKind::AutoScalingGroup, name);
            group.current = instances.len() as u64;
            group.addresses = members.iter().map(|h| h.address).sorted().collect();
            group
        })
        .collect()
}

/// One group per cluster, from tagged instances and node groups listed for
/// the subnet.
pub fn node_groups(input: &CapacityInput) -> Vec<ResourceGroup> {
    let holders = input.holders;
    let mut clusters: BTreeMap<&str, (Vec<Ipv4Addr>, Vec<&NodeGroupRecord>)> = BTreeMap::new();

    for (cluster, addrs) in input.ownership.of_kind(GroupKind::ManagedNodeGroup) {
        clusters.entry(cluster).or_default().0 = addrs.clone();
    }
    for ng in input
        .collected
        .node_groups
        .iter()
        .filter(|ng| ng.subnet_ids.iter().any(|s| s == input.subnet_id))
    {
        clusters.entry(ng.cluster.as_str()).or_default().1.push(ng);
    }

    clusters
        .into_iter()
        .map(|(cluster, (addrs, ngs))| {
            let instances: Vec<NodeInstance> = addrs
                .iter()
                .filter_map(|a| holders.get(a))
                .map(|h| NodeInstance {
                    instance_id: h.holder_id.clone(),
                    address: h.address,
                    tags: h.tags.clone(),
                })
                .collect();

            let mut group = ResourceGroup::new(GroupKind::ManagedNodeGroup, cluster);
            group.current = instances.iter().map(|i| &i.instance_id).unique().count() as u64;
            group.addresses = addrs;

            let scaling_max: Option<u64> = ngs
                .iter()
                .filter_map(|ng| ng.scaling_config.map(|s| s.max_size))
                .fold(None, |acc, max| Some(acc.unwrap_or(0) + max));
            match (input.policy.node_group_max_from_scaling, scaling_max) {
                (true, Some(max)) => {
                    group.maximum = Capacity::Known(max.saturating_sub(group.current))
                }
                (true, None) => group.mark_unknown("no node group scaling config available"),
                (false, _) => group.mark_unknown("node group maximum not derived"),
            }

            group.detail = GroupDetail::NodeGroups {
                node_groups: ngs
                    .iter()
                    .map(|ng| NodeGroupSummary {
                        name: ng.name.clone(),
                        instance_types: ng.instance_types.clone(),
                        scaling_config: ng.scaling_config,
                        status: ng.status.clone(),
                    })
                    .collect(),
                instances,
            };
            group
        })
        .collect()
}

/// Degrade every group fed by a failed collector.
pub fn apply_failures(groups: &mut Vec<ResourceGroup>, failures: &[(CollectorKind, String)]) {
    for (collector, _) in failures {
        let reason = format!("{collector} collector failed");
        for kind in collector.affected_kinds() {
            let mut seen = false;
            for group in groups.iter_mut().filter(|g| g.kind == *kind) {
                group.mark_unknown(&reason);
                seen = true;
            }
            if !seen {
                groups.push(ResourceGroup::unavailable(*kind, &reason));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HolderRecord, LoadBalancerZone, ScalingConfig, Tags};
    use crate::processing::ownership::group_by_owner;

    const SUBNET: &str = "subnet-0a1b";

    fn eni(last: u8, descriptor: &str) -> HolderRecord {
        HolderRecord {
            address: Ipv4Addr::new(10, 0, 1, last),
            descriptor: descriptor.to_string(),
            holder_id: format!("eni-{last}"),
            source: HolderSource::Interface,
            tags: Tags::new(),
        }
    }

    fn instance(last: u8, id: &str, tags: &[(&str, &str)]) -> HolderRecord {
        HolderRecord {
            address: Ipv4Addr::new(10, 0, 1, last),
            descriptor: id.to_string(),
            holder_id: id.to_string(),
            source: HolderSource::Instance,
            tags: tags.iter().copied().collect(),
        }
    }

    fn holders(records: Vec<HolderRecord>) -> HolderMap {
        records.into_iter().map(|h| (h.address, h)).collect()
    }

    fn asg(name: &str, max: u64, ids: &[&str]) -> AutoScalingGroupRecord {
        AutoScalingGroupRecord {
            name: name.to_string(),
            subnet_ids: vec![SUBNET.to_string(), "subnet-other".to_string()],
            instance_ids: ids.iter().map(|s| s.to_string()).collect(),
            max_size: max,
            current_size: ids.len() as u64,
        }
    }

    fn nlb(name: &str) -> LoadBalancerRecord {
        LoadBalancerRecord {
            name: name.to_string(),
            lb_type: "network".to_string(),
            arn: format!("arn:aws:elasticloadbalancing:us-east-1:123:loadbalancer/net/{name}/1"),
            zones: vec![LoadBalancerZone {
                subnet_id: SUBNET.to_string(),
            }],
            tags: Tags::new(),
        }
    }

    fn run(h: &HolderMap, collected: &Collected, policy: CapacityPolicy) -> Vec<ResourceGroup> {
        let ownership = group_by_owner(h);
        aggregate(&CapacityInput {
            subnet_id: SUBNET,
            holders: h,
            ownership: &ownership,
            collected,
            policy,
        })
    }

    #[test]
    fn test_classic_elb_current_and_max() {
        let h = holders(vec![eni(10, "eni-1 / ELB myelb"), eni(11, "eni-2 / ELB myelb")]);
        let groups = run(&h, &Collected::default(), CapacityPolicy::default());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].kind, GroupKind::ClassicOrALB);
        assert_eq!(groups[0].key, "myelb");
        assert_eq!(groups[0].current, 2);
        assert_eq!(groups[0].maximum, Capacity::Known(8));
    }

    #[test]
    fn test_nlb_zone_fallback_and_strict() {
        let h = holders(vec![eni(12, "eni-3 / ELB net/seen/abcd1234")]);
        let collected = Collected {
            load_balancers: vec![nlb("seen"), nlb("hidden")],
            ..Default::default()
        };

        let groups = run(&h, &collected, CapacityPolicy::default());
        let hidden = groups.iter().find(|g| g.key == "hidden").unwrap();
        assert_eq!(hidden.current, 1);
        assert_eq!(hidden.maximum, Capacity::Known(8));
        let seen = groups.iter().find(|g| g.key == "seen").unwrap();
        assert_eq!(seen.current, 1);
        assert!(matches!(
            &seen.detail,
            GroupDetail::LoadBalancer { arn: Some(_), zone_fallback: false, .. }
        ));

        let strict = CapacityPolicy {
            nlb_current: NlbCurrentPolicy::Strict,
            ..Default::default()
        };
        let groups = run(&h, &collected, strict);
        let hidden = groups.iter().find(|g| g.key == "hidden").unwrap();
        assert_eq!(hidden.current, 0);
    }

    #[test]
    fn test_asg_headroom() {
        let h = holders(vec![instance(20, "i-1", &[]), instance(21, "i-2", &[])]);
        let collected = Collected {
            autoscaling_groups: vec![
                asg("web", 5, &["i-1", "i-2"]),
                AutoScalingGroupRecord {
                    subnet_ids: vec!["subnet-elsewhere".to_string()],
                    ..asg("other", 10, &["i-9"])
                },
            ],
            ..Default::default()
        };
        let groups = run(&h, &collected, CapacityPolicy::default());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key, "web");
        assert_eq!(groups[0].current, 2);
        assert_eq!(groups[0].maximum, Capacity::Known(3));
        assert_eq!(groups[0].addresses.len(), 2);

        let absolute = CapacityPolicy {
            asg_max: AsgMaxPolicy::Absolute,
            ..Default::default()
        };
        let groups = run(&h, &collected, absolute);
        assert_eq!(groups[0].maximum, Capacity::Known(5));
    }

    #[test]
    fn test_asg_members_outside_subnet_not_counted() {
        let h = holders(vec![instance(20, "i-1", &[])]);
        let collected = Collected {
            autoscaling_groups: vec![asg("web", 4, &["i-1", "i-2", "i-3"])],
            ..Default::default()
        };
        let groups = run(&h, &collected, CapacityPolicy::default());
        assert_eq!(groups[0].current, 1);
        assert_eq!(groups[0].maximum, Capacity::Known(1));
    }

    #[test]
    fn test_node_group_from_tags_and_scaling() {
        let tag = [("eks:cluster-name", "prod")];
        let h = holders(vec![instance(30, "i-a", &tag), instance(31, "i-b", &tag)]);
        let collected = Collected {
            node_groups: vec![NodeGroupRecord {
                cluster: "prod".to_string(),
                name: "ng-1".to_string(),
                subnet_ids: vec![SUBNET.to_string()],
                instance_types: vec!["m5.large".to_string()],
                scaling_config: Some(ScalingConfig {
                    min_size: 1,
                    max_size: 6,
                    desired_size: 2,
                }),
                status: Some("ACTIVE".to_string()),
            }],
            // The node group's own ASG must not be counted again.
            autoscaling_groups: vec![asg("eks-ng-1-abc", 6, &["i-a", "i-b"])],
            ..Default::default()
        };
        let groups = run(&h, &collected, CapacityPolicy::default());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].kind, GroupKind::ManagedNodeGroup);
        assert_eq!(groups[0].current, 2);
        assert_eq!(groups[0].maximum, Capacity::Known(4));

        let informational = CapacityPolicy {
            node_group_max_from_scaling: false,
            ..Default::default()
        };
        let groups = run(&h, &collected, informational);
        let prod = groups
            .iter()
            .find(|g| g.kind == GroupKind::ManagedNodeGroup)
            .unwrap();
        assert!(prod.maximum.is_unknown());
        // Without a cluster maximum the ASG carries the pool instead.
        let asg = groups
            .iter()
            .find(|g| g.kind == GroupKind::AutoScalingGroup)
            .unwrap();
        assert_eq!(asg.current, 2);
        assert_eq!(asg.maximum, Capacity::Known(4));
        assert_eq!(prod.current, 0);
    }

    #[test]
    fn test_node_group_detail_lists_instances() {
        let tag = [("eks:cluster-name", "prod"), ("Name", "prod-node")];
        let h = holders(vec![instance(30, "i-a", &tag), instance(31, "i-a", &tag)]);
        let groups = run(&h, &Collected::default(), CapacityPolicy::default());
        assert_eq!(groups[0].current, 1);
        let GroupDetail::NodeGroups { instances, .. } = &groups[0].detail else {
            panic!("expected node group detail");
        };
        assert_eq!(instances.len(), 2);
        assert_eq!(instances[0].instance_id, "i-a");
        assert_eq!(instances[0].address, Ipv4Addr::new(10, 0, 1, 30));
        assert_eq!(instances[1].address, Ipv4Addr::new(10, 0, 1, 31));
        assert_eq!(instances[0].tags.get("Name"), Some("prod-node"));
    }

    #[test]
    fn test_asg_kept_for_self_managed_cluster_nodes() {
        let tag = [("kubernetes.io/cluster/kops", "owned")];
        let h = holders(vec![instance(40, "i-k1", &tag), instance(41, "i-k2", &tag)]);
        let collected = Collected {
            autoscaling_groups: vec![asg("k8s-workers", 10, &["i-k1", "i-k2"])],
            ..Default::default()
        };
        let groups = run(&h, &collected, CapacityPolicy::default());

        let workers = groups.iter().find(|g| g.key == "k8s-workers").unwrap();
        assert_eq!(workers.current, 2);
        assert_eq!(workers.maximum, Capacity::Known(8));
        assert_eq!(workers.addresses.len(), 2);

        let kops = groups.iter().find(|g| g.key == "kops").unwrap();
        assert!(kops.maximum.is_unknown());
        assert_eq!(kops.current, 0);
        assert!(kops.addresses.is_empty());
        assert!(kops
            .diagnostic
            .as_deref()
            .unwrap()
            .contains("2 instances counted under their ASG"));

        let current: u64 = groups.iter().map(|g| g.current).sum();
        assert_eq!(current, 2);
    }

    #[test]
    fn test_asg_kept_when_node_groups_collector_failed() {
        let tag = [("eks:cluster-name", "prod")];
        let h = holders(vec![instance(30, "i-a", &tag), instance(31, "i-b", &tag)]);
        let collected = Collected {
            autoscaling_groups: vec![asg("eks-ng-1-abc", 6, &["i-a", "i-b"])],
            failures: vec![(CollectorKind::NodeGroups, "AccessDenied".to_string())],
            ..Default::default()
        };
        let groups = run(&h, &collected, CapacityPolicy::default());
        let asg = groups.iter().find(|g| g.key == "eks-ng-1-abc").unwrap();
        assert_eq!(asg.current, 2);
        assert_eq!(asg.maximum, Capacity::Known(4));
        let prod = groups.iter().find(|g| g.key == "prod").unwrap();
        assert!(prod.maximum.is_unknown());
        assert!(prod
            .diagnostic
            .as_deref()
            .unwrap()
            .contains("node groups collector failed"));
    }

    #[test]
    fn test_load_balancer_over_cap_keeps_current() {
        let h: HolderMap = holders(
            (10..20)
                .map(|last| eni(last, &format!("eni-{last} / ELB busy")))
                .collect(),
        );
        let groups = run(&h, &Collected::default(), CapacityPolicy::default());
        assert_eq!(groups[0].current, 10);
        assert_eq!(groups[0].maximum, Capacity::Known(10));
    }

    #[test]
    fn test_node_group_without_scaling_is_unknown() {
        let h = holders(vec![instance(
            30,
            "i-a",
            &[("kubernetes.io/cluster/self-managed", "owned")],
        )]);
        let groups = run(&h, &Collected::default(), CapacityPolicy::default());
        assert_eq!(groups[0].key, "self-managed");
        assert_eq!(groups[0].current, 1);
        assert!(groups[0].maximum.is_unknown());
    }

    #[test]
    fn test_asg_failure_recovers_from_tags() {
        let h = holders(vec![
            instance(20, "i-1", &[("aws:autoscaling:groupName", "web")]),
            instance(21, "i-2", &[("aws:autoscaling:groupName", "web")]),
            eni(10, "eni-1 / ELB myelb"),
        ]);
        let collected = Collected {
            failures: vec![(CollectorKind::AutoScalingGroups, "Throttling".to_string())],
            ..Default::default()
        };
        let groups = run(&h, &collected, CapacityPolicy::default());
        let web = groups.iter().find(|g| g.key == "web").unwrap();
        assert_eq!(web.current, 2);
        assert!(web.maximum.is_unknown());
        let elb = groups.iter().find(|g| g.key == "myelb").unwrap();
        assert_eq!(elb.maximum, Capacity::Known(8));
    }

    #[test]
    fn test_failure_without_groups_adds_placeholder() {
        let mut groups = vec![];
        apply_failures(
            &mut groups,
            &[(CollectorKind::NodeGroups, "AccessDenied".to_string())],
        );
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].kind, GroupKind::ManagedNodeGroup);
        assert_eq!(groups[0].key, crate::models::UNAVAILABLE_GROUP_KEY);
        assert_eq!(groups[0].current, 0);
        assert!(groups[0].maximum.is_unknown());
    }
}
