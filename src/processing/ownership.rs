//! Ownership resolution.
//!
//! Every holder is matched against [`rules`] in order and the first rule
//! that yields a key decides the owning group. The NLB descriptor
//! (`ELB net/<name>/<hash>`) also reads as a classic descriptor whose name
//! is `net/...`, so the NLB rule has to come before the classic one.

use crate::models::{
    GroupKind, HolderMap, HolderRecord, Tags, EKS_CLUSTER_TAG, K8S_CLUSTER_TAG_PREFIX,
};
use itertools::Itertools;
use regex::Regex;
use std::collections::BTreeMap;
use std::net::Ipv4Addr;
use std::sync::OnceLock;

/// What a rule looks at.
pub enum Matcher {
    /// Regex over the holder descriptor; capture group 1 is the key.
    Descriptor(Regex),
    /// Key taken from the holder's tags.
    Tags(fn(&Tags) -> Option<String>),
}

/// One entry of the classification table.
pub struct OwnershipRule {
    pub name: &'static str,
    pub kind: GroupKind,
    pub matcher: Matcher,
}

impl OwnershipRule {
    /// Group key if the rule matches.
    pub fn key_for(&self, holder: &HolderRecord) -> Option<String> {
        match &self.matcher {
            Matcher::Descriptor(re) => re
                .captures(&holder.descriptor)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string()),
            Matcher::Tags(extract) => extract(&holder.tags),
        }
    }
}

/// Owning group of one holder.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Attribution {
    pub kind: GroupKind,
    pub key: String,
}

// Interface descriptors look like "eni-0abc / ELB myelb"; the id part is optional.
const ENI_PREFIX: &str = r"^(?:eni-[0-9a-fA-F]+ / )?";

fn descriptor_rule(name: &'static str, kind: GroupKind, pattern: &str) -> OwnershipRule {
    OwnershipRule {
        name,
        kind,
        matcher: Matcher::Descriptor(
            Regex::new(&format!("{ENI_PREFIX}{pattern}")).expect("Invalid Regex"),
        ),
    }
}

fn cluster_from_tags(tags: &Tags) -> Option<String> {
    tags.get(EKS_CLUSTER_TAG)
        .filter(|name| !name.is_empty())
        .or_else(|| tags.key_suffix(K8S_CLUSTER_TAG_PREFIX))
        .map(str::to_string)
}

static RULES: OnceLock<Vec<OwnershipRule>> = OnceLock::new();

/// The classification table, in precedence order.
pub fn rules() -> &'static [OwnershipRule] {
    RULES.get_or_init(|| {
        vec![
            descriptor_rule(
                "nlb",
                GroupKind::NetworkLoadBalancer,
                r"ELB net/([^/\s]+)/[^/\s]+$",
            ),
            descriptor_rule("alb", GroupKind::ClassicOrALB, r"ELB app/([^/\s]+)/[^/\s]+$"),
            descriptor_rule("classic_elb", GroupKind::ClassicOrALB, r"ELB ([^/\s]+)$"),
            OwnershipRule {
                name: "eks_node",
                kind: GroupKind::ManagedNodeGroup,
                matcher: Matcher::Tags(cluster_from_tags),
            },
        ]
    })
}

/// Owning group of `holder`, or `None` if no rule matches.
pub fn resolve_owner(holder: &HolderRecord) -> Option<Attribution> {
    rules().iter().find_map(|rule| {
        rule.key_for(holder).map(|key| {
            log::trace!("{}: rule {} -> {key}", holder.address, rule.name);
            Attribution {
                kind: rule.kind,
                key,
            }
        })
    })
}

/// Holders grouped by owner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnershipIndex {
    pub owned: BTreeMap<Attribution, Vec<Ipv4Addr>>,
    pub unattributed: Vec<Ipv4Addr>,
}

impl OwnershipIndex {
    /// Owners of one kind with their addresses.
    pub fn of_kind(&self, kind: GroupKind) -> impl Iterator<Item = (&str, &Vec<Ipv4Addr>)> {
        self.owned
            .iter()
            .filter(move |(a, _)| a.kind == kind)
            .map(|(a, addrs)| (a.key.as_str(), addrs))
    }
}

/// Classify every holder.
pub fn group_by_owner(holders: &HolderMap) -> OwnershipIndex {
    let (owned, unattributed): (Vec<_>, Vec<_>) = holders
        .values()
        .map(|h| (resolve_owner(h), h.address))
        .partition(|(owner, _)| owner.is_some());

    let owned: BTreeMap<Attribution, Vec<Ipv4Addr>> = owned
        .into_iter()
        .filter_map(|(owner, addr)| owner.map(|o| (o, addr)))
        .into_group_map()
        .into_iter()
        .map(|(owner, mut addrs)| {
            addrs.sort();
            (owner, addrs)
        })
        .collect();

    let index = OwnershipIndex {
        owned,
        unattributed: unattributed.into_iter().map(|(_, addr)| addr).collect(),
    };
    log::debug!(
        "{} owner(s), {} unattributed address(es)",
        index.owned.len(),
        index.unattributed.len()
    );
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HolderSource;

    fn eni(addr: &str, descriptor: &str) -> HolderRecord {
        HolderRecord {
            address: addr.parse().unwrap(),
            descriptor: descriptor.to_string(),
            holder_id: descriptor.split(' ').next().unwrap_or_default().to_string(),
            source: HolderSource::Interface,
            tags: Tags::new(),
        }
    }

    fn instance(addr: &str, id: &str, tags: &[(&str, &str)]) -> HolderRecord {
        HolderRecord {
            address: addr.parse().unwrap(),
            descriptor: id.to_string(),
            holder_id: id.to_string(),
            source: HolderSource::Instance,
            tags: tags.iter().copied().collect(),
        }
    }

    fn owner(kind: GroupKind, key: &str) -> Option<Attribution> {
        Some(Attribution {
            kind,
            key: key.to_string(),
        })
    }

    #[test]
    fn test_nlb_is_never_classic() {
        let h = eni("10.0.1.5", "eni-3 / ELB net/mynlb/abcd1234");
        assert_eq!(
            resolve_owner(&h),
            owner(GroupKind::NetworkLoadBalancer, "mynlb")
        );
    }

    #[test]
    fn test_classic_and_alb() {
        assert_eq!(
            resolve_owner(&eni("10.0.1.5", "eni-1 / ELB myelb")),
            owner(GroupKind::ClassicOrALB, "myelb")
        );
        assert_eq!(
            resolve_owner(&eni("10.0.1.6", "eni-0f00 / ELB app/web-alb/50dc6c495c0c9188")),
            owner(GroupKind::ClassicOrALB, "web-alb")
        );
        // Without the interface id prefix.
        assert_eq!(
            resolve_owner(&eni("10.0.1.7", "ELB net/edge/1234")),
            owner(GroupKind::NetworkLoadBalancer, "edge")
        );
    }

    #[test]
    fn test_unmatched_descriptors() {
        for descriptor in [
            "eni-1 / Primary network interface",
            "eni-2 / Interface for NAT Gateway nat-0123",
            "eni-3 / ELB ",
            "eni-4 / ELB gwy/gateway-lb/123",
            "eni-5 / ELB a b",
        ] {
            assert_eq!(resolve_owner(&eni("10.0.1.9", descriptor)), None, "{descriptor}");
        }
    }

    #[test]
    fn test_node_group_tags() {
        let eks = instance("10.0.1.20", "i-1", &[("eks:cluster-name", "prod")]);
        assert_eq!(resolve_owner(&eks), owner(GroupKind::ManagedNodeGroup, "prod"));

        let k8s = instance(
            "10.0.1.21",
            "i-2",
            &[("kubernetes.io/cluster/staging", "owned"), ("Name", "node")],
        );
        assert_eq!(resolve_owner(&k8s), owner(GroupKind::ManagedNodeGroup, "staging"));

        let plain = instance("10.0.1.22", "i-3", &[("Name", "bastion")]);
        assert_eq!(resolve_owner(&plain), None);
    }

    #[test]
    fn test_rule_order() {
        let names: Vec<&str> = rules().iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["nlb", "alb", "classic_elb", "eks_node"]);
    }

    #[test]
    fn test_group_by_owner() {
        let mut holders = HolderMap::new();
        for h in [
            eni("10.0.1.11", "eni-2 / ELB myelb"),
            eni("10.0.1.10", "eni-1 / ELB myelb"),
            eni("10.0.1.12", "eni-3 / ELB net/mynlb/abcd1234"),
            eni("10.0.1.13", "eni-4 / Primary network interface"),
            instance("10.0.1.14", "i-1", &[("eks:cluster-name", "prod")]),
        ] {
            holders.insert(h.address, h);
        }
        let index = group_by_owner(&holders);
        assert_eq!(index.owned.len(), 3);
        let elb: Vec<_> = index.of_kind(GroupKind::ClassicOrALB).collect();
        assert_eq!(elb.len(), 1);
        assert_eq!(elb[0].0, "myelb");
        assert_eq!(
            elb[0].1,
            &vec![Ipv4Addr::new(10, 0, 1, 10), Ipv4Addr::new(10, 0, 1, 11)]
        );
        assert_eq!(index.unattributed, vec![Ipv4Addr::new(10, 0, 1, 13)]);
    }
}
