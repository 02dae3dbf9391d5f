//! Subnet query parsing and lookup.

use crate::aws::{ResourceCollector, SubnetQuery};
use crate::error::UsageError;
use crate::models::SubnetRecord;
use regex::Regex;
use std::sync::OnceLock;

static SUBNET_ID_REGEX: OnceLock<Regex> = OnceLock::new();
static CIDR_REGEX: OnceLock<Regex> = OnceLock::new();

fn subnet_id_regex() -> &'static Regex {
    SUBNET_ID_REGEX.get_or_init(|| Regex::new(r"^subnet-[a-fA-F0-9]+$").expect("Invalid Regex"))
}

fn cidr_regex() -> &'static Regex {
    CIDR_REGEX.get_or_init(|| {
        Regex::new(r"^\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}/\d{1,2}$").expect("Invalid Regex")
    })
}

/// Classify a user supplied subnet id or CIDR block.
pub fn parse_query(input: &str) -> Result<SubnetQuery, UsageError> {
    let input = input.trim();
    if subnet_id_regex().is_match(input) {
        Ok(SubnetQuery::Id(input.to_string()))
    } else if cidr_regex().is_match(input) {
        Ok(SubnetQuery::Cidr(input.to_string()))
    } else {
        Err(UsageError::InvalidIdentifier(input.to_string()))
    }
}

/// Look up exactly one subnet.
pub fn resolve_subnet(
    collector: &dyn ResourceCollector,
    query: &SubnetQuery,
) -> Result<SubnetRecord, UsageError> {
    let mut subnets = collector
        .find_subnet(query)
        .map_err(|e| UsageError::SubnetLookup {
            query: query.to_string(),
            message: e.to_string(),
        })?;
    log::debug!("subnets matching {query}: {subnets:?}");
    match subnets.len() {
        0 => Err(UsageError::NotFound(query.to_string())),
        1 => Ok(subnets.remove(0)),
        count => Err(UsageError::Ambiguous {
            query: query.to_string(),
            count,
        }),
    }
}
