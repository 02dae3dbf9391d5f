// cargo watch -x 'fmt' -x 'run -- subnet-0a1b2c3d'

//! Subnet IP usage reconciliation and capacity projection for AWS VPC subnets.

pub mod aws;
pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod processing;

use aws::{collect_all, Collected, ResourceCollector};
use config::CapacityPolicy;
use error::UsageError;
use models::{SubnetRecord, UtilizationReport};
use std::sync::Arc;

/// A finished run: the report plus the raw collector outputs behind it.
#[derive(Debug, Clone)]
pub struct SubnetUsage {
    pub subnet: SubnetRecord,
    pub collected: Collected,
    pub report: UtilizationReport,
}

/// Look up one subnet, collect everything in it concurrently and reconcile.
///
/// Only the subnet lookup and the subnet's CIDR can fail the run; collector
/// failures end up as diagnostics on the report.
pub async fn subnet_usage(
    collector: Arc<dyn ResourceCollector>,
    query: &str,
    policy: &CapacityPolicy,
) -> Result<SubnetUsage, UsageError> {
    let query = processing::parse_query(query)?;
    log::info!("#Start subnet_usage() {query}");

    let label = query.to_string();
    let lookup = collector.clone();
    let subnet = tokio::task::spawn_blocking(move || {
        processing::resolve_subnet(lookup.as_ref(), &query)
    })
    .await
    .map_err(|e| UsageError::SubnetLookup {
        query: label,
        message: e.to_string(),
    })??;
    log::info!(
        "Found subnet {} ({}) {} with {} IPs available",
        subnet.id,
        subnet.cidr,
        subnet.availability_zone,
        subnet.available_ip_count
    );

    let collected = collect_all(collector, &subnet.id).await;
    let report = processing::build_report(&subnet, &collected, policy)?;
    Ok(SubnetUsage {
        subnet,
        collected,
        report,
    })
}
