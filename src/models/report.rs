//! The utilization report and its diagnostics.

use super::{GroupKind, ResourceGroup, SubnetRecord};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The five independent collector calls made per report.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CollectorKind {
    NetworkInterfaces,
    Instances,
    AutoScalingGroups,
    LoadBalancers,
    NodeGroups,
}

impl CollectorKind {
    /// Group kinds whose numbers depend on this collector.
    pub fn affected_kinds(&self) -> &'static [GroupKind] {
        match self {
            CollectorKind::NetworkInterfaces => {
                &[GroupKind::ClassicOrALB, GroupKind::NetworkLoadBalancer]
            }
            CollectorKind::Instances => {
                &[GroupKind::AutoScalingGroup, GroupKind::ManagedNodeGroup]
            }
            CollectorKind::AutoScalingGroups => &[GroupKind::AutoScalingGroup],
            CollectorKind::LoadBalancers => &[GroupKind::NetworkLoadBalancer],
            CollectorKind::NodeGroups => &[GroupKind::ManagedNodeGroup],
        }
    }
}

impl fmt::Display for CollectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CollectorKind::NetworkInterfaces => "network interfaces",
            CollectorKind::Instances => "instances",
            CollectorKind::AutoScalingGroups => "autoscaling groups",
            CollectorKind::LoadBalancers => "load balancers",
            CollectorKind::NodeGroups => "node groups",
        };
        f.write_str(s)
    }
}

/// Non-fatal findings attached to a report.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A collector failed; its record set was treated as empty.
    PartialCollectorFailure {
        collector: CollectorKind,
        message: String,
    },
    /// Subnet metadata disagrees with the enumerated holders.
    DriftDetected {
        drift: i64,
        metadata_used: u64,
        found_used: u64,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::PartialCollectorFailure { collector, message } => {
                write!(f, "{collector} collector failed: {message}")
            }
            Diagnostic::DriftDetected {
                drift,
                metadata_used,
                found_used,
            } => write!(
                f,
                "subnet metadata reports {metadata_used} IPs in use but {found_used} were found \
                 (drift {drift:+}); other services may be using IPs"
            ),
        }
    }
}

/// Everything known about address consumption in one subnet.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UtilizationReport {
    pub subnet: SubnetRecord,
    pub total_usable: u64,
    /// Free addresses according to the subnet metadata.
    pub authoritative_available: u64,
    /// Distinct addresses with a holder.
    pub used: u64,
    /// Used addresses no group claimed.
    pub unattributed: u64,
    pub groups: Vec<ResourceGroup>,
    /// `used` plus every known group maximum.
    pub theoretical_maximum_total: u64,
    /// Some group maximum was unknown, so the total is a lower bound.
    pub maximum_partial: bool,
    /// `(total_usable - authoritative_available) - used`.
    pub drift: i64,
    pub diagnostics: Vec<Diagnostic>,
}

impl UtilizationReport {
    pub fn groups_of(&self, kind: GroupKind) -> impl Iterator<Item = &ResourceGroup> {
        self.groups.iter().filter(move |g| g.kind == kind)
    }

    pub fn group(&self, kind: GroupKind, key: &str) -> Option<&ResourceGroup> {
        self.groups.iter().find(|g| g.kind == kind && g.key == key)
    }

    pub fn has_drift(&self) -> bool {
        self.drift != 0
    }

    pub fn is_degraded(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::PartialCollectorFailure { .. }))
    }
}
