//! Runtime settings.
//!
//! Values come from the environment (a `.env` file is loaded first by
//! `main`) and may be overridden by command line flags.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Base pause between AWS CLI retries.
pub const SLEEP_MSEC: u64 = 200;
/// Attempts per AWS CLI call before the collector gives up.
pub const RETRY_ATTEMPTS: u32 = 3;
/// Largest AWS CLI response accepted, in bytes.
pub const MAX_CLI_OUTPUT: usize = 50_000_000;
/// Documented per-interface address cap for ELB/NLB interfaces.
pub const ELB_MAX_IPS: u64 = 8;

/// How an autoscaling group's maximum is counted.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AsgMaxPolicy {
    /// `max_size - current_size`: room left to grow.
    #[default]
    Headroom,
    /// `max_size`: the configured cap, as older reports counted it.
    Absolute,
}

/// How a network load balancer with no matching interface is counted.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum NlbCurrentPolicy {
    /// Zone membership in the subnet implies one address.
    #[default]
    ZoneFallback,
    /// Only matched interfaces count.
    Strict,
}

impl FromStr for AsgMaxPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "headroom" => Ok(AsgMaxPolicy::Headroom),
            "absolute" => Ok(AsgMaxPolicy::Absolute),
            other => Err(format!("unknown ASG max policy '{other}'")),
        }
    }
}

impl FromStr for NlbCurrentPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zone-fallback" | "zone_fallback" => Ok(NlbCurrentPolicy::ZoneFallback),
            "strict" => Ok(NlbCurrentPolicy::Strict),
            other => Err(format!("unknown NLB current policy '{other}'")),
        }
    }
}

/// Knobs of the capacity rules.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityPolicy {
    pub asg_max: AsgMaxPolicy,
    pub nlb_current: NlbCurrentPolicy,
    /// Derive node group maximum from scaling config when available.
    pub node_group_max_from_scaling: bool,
}

impl Default for CapacityPolicy {
    fn default() -> Self {
        CapacityPolicy {
            asg_max: AsgMaxPolicy::Headroom,
            nlb_current: NlbCurrentPolicy::ZoneFallback,
            node_group_max_from_scaling: true,
        }
    }
}

/// Everything a run needs besides the subnet query.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub profile: Option<String>,
    pub region: Option<String>,
    pub timezone: Tz,
    pub retries: u32,
    pub policy: CapacityPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            profile: None,
            region: None,
            timezone: Tz::UTC,
            retries: RETRY_ATTEMPTS,
            policy: CapacityPolicy::default(),
        }
    }
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Settings {
        Settings::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from any key lookup; bad values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Settings
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();
        settings.profile = lookup("AWS_PROFILE").filter(|s| !s.is_empty());
        settings.region = lookup("AWS_REGION")
            .or_else(|| lookup("AWS_DEFAULT_REGION"))
            .filter(|s| !s.is_empty());

        if let Some(tz) = lookup("SUBNET_USAGE_TZ") {
            match tz.parse::<Tz>() {
                Ok(tz) => settings.timezone = tz,
                Err(e) => log::warn!("Ignoring SUBNET_USAGE_TZ={tz}: {e}"),
            }
        }
        if let Some(retries) = lookup("SUBNET_USAGE_RETRIES") {
            match retries.parse::<u32>() {
                Ok(n) if n > 0 => settings.retries = n,
                _ => log::warn!("Ignoring SUBNET_USAGE_RETRIES={retries}"),
            }
        }
        if let Some(v) = lookup("SUBNET_USAGE_ASG_MAX") {
            match v.parse() {
                Ok(p) => settings.policy.asg_max = p,
                Err(e) => log::warn!("Ignoring SUBNET_USAGE_ASG_MAX: {e}"),
            }
        }
        if let Some(v) = lookup("SUBNET_USAGE_NLB_CURRENT") {
            match v.parse() {
                Ok(p) => settings.policy.nlb_current = p,
                Err(e) => log::warn!("Ignoring SUBNET_USAGE_NLB_CURRENT: {e}"),
            }
        }
        if let Some(v) = lookup("SUBNET_USAGE_NODE_GROUP_MAX") {
            match v.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => settings.policy.node_group_max_from_scaling = true,
                "false" | "0" | "no" => settings.policy.node_group_max_from_scaling = false,
                _ => log::warn!("Ignoring SUBNET_USAGE_NODE_GROUP_MAX={v}"),
            }
        }
        settings
    }
}
