//! Subnet usage processing logic.
//!
//! This module contains the reconciliation engine:
//! - [`subnet`] - query parsing and subnet lookup
//! - [`holders`] - one holder record per used address
//! - [`ownership`] - ordered rule table mapping holders to groups
//! - [`capacity`] - current and maximum demand per group
//! - [`reconcile`] - the final report with drift and diagnostics

mod capacity;
mod holders;
mod ownership;
mod reconcile;
mod subnet;

pub use capacity::{aggregate, apply_failures, CapacityInput};
pub use holders::build_holder_map;
pub use ownership::{
    group_by_owner, resolve_owner, rules, Attribution, Matcher, OwnershipIndex, OwnershipRule,
};
pub use reconcile::build_report;
pub use subnet::{parse_query, resolve_subnet};
