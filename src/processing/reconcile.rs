//! Reconcile subnet metadata against the enumerated holders.

use super::capacity::{aggregate, CapacityInput};
use super::holders::build_holder_map;
use super::ownership::group_by_owner;
use crate::aws::Collected;
use crate::config::CapacityPolicy;
use crate::error::UsageError;
use crate::models::{AddressSpace, Capacity, Diagnostic, SubnetRecord, UtilizationReport};

/// Build the utilization report for one subnet from its collected records.
///
/// Collector failures degrade the report but never fail it; only an
/// unusable subnet CIDR is an error.
pub fn build_report(
    subnet: &SubnetRecord,
    collected: &Collected,
    policy: &CapacityPolicy,
) -> Result<UtilizationReport, UsageError> {
    let space = AddressSpace::from_cidr(&subnet.cidr)?;
    let holders = build_holder_map(&space, &collected.interfaces, &collected.instances);
    let ownership = group_by_owner(&holders);

    let groups = aggregate(&CapacityInput {
        subnet_id: &subnet.id,
        holders: &holders,
        ownership: &ownership,
        collected,
        policy: *policy,
    });

    let total_usable = space.len();
    let used = holders.len() as u64;
    let metadata_used = total_usable.saturating_sub(subnet.available_ip_count);
    let drift = metadata_used as i64 - used as i64;

    let known_maximum: u64 = groups.iter().filter_map(|g| g.maximum.known()).sum();
    let maximum_partial = groups.iter().any(|g| g.maximum == Capacity::Unknown);

    let mut diagnostics: Vec<Diagnostic> = collected
        .failures
        .iter()
        .map(|(collector, message)| Diagnostic::PartialCollectorFailure {
            collector: *collector,
            message: message.clone(),
        })
        .collect();
    if drift != 0 {
        log::warn!(
            "{}: metadata reports {metadata_used} used, found {used} (drift {drift:+})",
            subnet.id
        );
        diagnostics.push(Diagnostic::DriftDetected {
            drift,
            metadata_used,
            found_used: used,
        });
    }

    let report = UtilizationReport {
        subnet: subnet.clone(),
        total_usable,
        authoritative_available: subnet.available_ip_count,
        used,
        unattributed: ownership.unattributed.len() as u64,
        groups,
        theoretical_maximum_total: used + known_maximum,
        maximum_partial,
        drift,
        diagnostics,
    };
    log::info!(
        "{} used={} max={}{} groups={}",
        subnet.id,
        report.used,
        report.theoretical_maximum_total,
        if maximum_partial { "+" } else { "" },
        report.groups.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        CollectorKind, GroupKind, InstanceRecord, InterfaceRecord, UNAVAILABLE_GROUP_KEY,
    };

    fn subnet(available: u64) -> SubnetRecord {
        SubnetRecord {
            id: "subnet-0a1b".to_string(),
            cidr: "10.0.1.0/24".to_string(),
            availability_zone: "us-east-1a".to_string(),
            available_ip_count: available,
            vpc_id: Some("vpc-01".to_string()),
        }
    }

    fn eni(last: u8, description: &str) -> InterfaceRecord {
        InterfaceRecord {
            address: format!("10.0.1.{last}"),
            descriptor: format!("eni-{last:02x} / {description}"),
            interface_id: format!("eni-{last:02x}"),
        }
    }

    fn eight_holders() -> Collected {
        Collected {
            interfaces: vec![
                eni(10, "ELB myelb"),
                eni(11, "ELB myelb"),
                eni(12, "Primary network interface"),
                eni(13, "Primary network interface"),
                eni(14, "Interface for NAT Gateway nat-01"),
                eni(15, "ELB net/mynlb/abcd1234"),
            ],
            instances: vec![
                InstanceRecord {
                    address: "10.0.1.12".to_string(),
                    instance_id: "i-01".to_string(),
                    tags: Default::default(),
                },
                InstanceRecord {
                    address: "10.0.1.20".to_string(),
                    instance_id: "i-02".to_string(),
                    tags: [("eks:cluster-name", "prod")].into_iter().collect(),
                },
                InstanceRecord {
                    address: "10.0.1.21".to_string(),
                    instance_id: "i-03".to_string(),
                    tags: Default::default(),
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_classic_elb_group() {
        let report = build_report(&subnet(243), &eight_holders(), &CapacityPolicy::default()).unwrap();
        let elb = report.group(GroupKind::ClassicOrALB, "myelb").unwrap();
        assert_eq!(elb.current, 2);
        assert_eq!(elb.maximum, Capacity::Known(8));
    }

    #[test]
    fn test_totals_and_no_drift() {
        // 251 usable, 8 distinct holders.
        let report = build_report(&subnet(243), &eight_holders(), &CapacityPolicy::default()).unwrap();
        assert_eq!(report.total_usable, 251);
        assert_eq!(report.used, 8);
        assert_eq!(report.drift, 0);
        assert!(!report.has_drift());
        assert!(report.diagnostics.is_empty());
        // myelb, mynlb, node group prod.
        assert_eq!(report.groups.len(), 3);
        // 10.0.1.12-14 and .21 are unclaimed.
        assert_eq!(report.unattributed, 4);
        // Node group has no scaling config, so its maximum is unknown.
        assert!(report.maximum_partial);
        assert_eq!(report.theoretical_maximum_total, 8 + 8 + 8);
        let current: u64 = report.groups.iter().map(|g| g.current).sum();
        assert!(current <= report.used);
    }

    #[test]
    fn test_drift_detected() {
        let report = build_report(&subnet(241), &eight_holders(), &CapacityPolicy::default()).unwrap();
        assert_eq!(report.drift, 2);
        assert_eq!(
            report.diagnostics,
            vec![Diagnostic::DriftDetected {
                drift: 2,
                metadata_used: 10,
                found_used: 8
            }]
        );
    }

    #[test]
    fn test_asg_collector_failure_degrades() {
        let mut collected = eight_holders();
        collected.failures = vec![(
            CollectorKind::AutoScalingGroups,
            "RequestLimitExceeded".to_string(),
        )];
        let report = build_report(&subnet(243), &collected, &CapacityPolicy::default()).unwrap();
        assert!(report.is_degraded());
        assert!(matches!(
            report.diagnostics[0],
            Diagnostic::PartialCollectorFailure {
                collector: CollectorKind::AutoScalingGroups,
                ..
            }
        ));
        let asgs: Vec<_> = report.groups_of(GroupKind::AutoScalingGroup).collect();
        assert_eq!(asgs.len(), 1);
        assert_eq!(asgs[0].key, UNAVAILABLE_GROUP_KEY);
        assert!(asgs[0].maximum.is_unknown());
        assert!(report.maximum_partial);
    }

    #[test]
    fn test_invalid_cidr() {
        let mut bad = subnet(10);
        bad.cidr = "10.0.1.0/33".to_string();
        assert!(matches!(
            build_report(&bad, &Collected::default(), &CapacityPolicy::default()),
            Err(UsageError::InvalidCidr(_))
        ));
    }

    #[test]
    fn test_report_is_idempotent() {
        let collected = eight_holders();
        let policy = CapacityPolicy::default();
        let first = build_report(&subnet(241), &collected, &policy).unwrap();
        let second = build_report(&subnet(241), &collected, &policy).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
