//! AWS record collection.
//!
//! - [`collector`] - the [`ResourceCollector`] interface and concurrent collection
//! - [`cli_collector`] - collector backed by the `aws` CLI
//! - [`cache`] - frozen collector outputs for offline replay
//! - [`cli`] - command execution

mod cache;
mod cli;
mod cli_collector;
mod collector;
mod wire;

pub use cache::{
    read_snapshot, snapshot_file_name, write_snapshot, CollectorSnapshot, SnapshotCollector,
};
pub use cli::{run, run_with_retry};
pub use cli_collector::{AwsCliCollector, AwsContext};
pub use collector::{collect_all, Collected, ResourceCollector, SubnetQuery};
