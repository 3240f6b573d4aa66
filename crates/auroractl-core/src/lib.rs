//! # auroractl-core
//!
//! Aurora cluster lifecycle automation on top of the RDS control plane.
//!
//! Every operation is a short linear sequence: issue one API call, poll until
//! the resource reaches its target status, move on to the next call.
//!
//! ## Layers
//!
//! - [`rds`]: the [`RdsApi`] seam and its `aws-sdk-rds` implementation
//! - [`status`]: typed cluster, instance and snapshot statuses
//! - [`prober`]: single-shot "is it in state X" checks
//! - [`progress`]: fixed-interval polling with progress events
//! - [`operations`]: one mutating call plus the wait that follows it
//! - [`workflows`]: clone-in-time, upgrade-in-place, snapshot-restore, delete
//! - [`config`]: TOML profiles
//!
//! ## Example
//!
//! ```rust,ignore
//! use auroractl_core::{AuroraEngine, AwsContext, AwsContextOptions, CloneParams, RdsClient};
//! use auroractl_core::workflows::clone_in_time;
//!
//! let aws = AwsContext::load(&AwsContextOptions::default()).await;
//! let engine = AuroraEngine::new(RdsClient::from_context(&aws));
//!
//! let outcome = clone_in_time(&engine, &CloneParams {
//!     cluster_identifier: Some("orders".into()),
//!     new_cluster_identifier: Some("orders-next".into()),
//!     subnet_group_name: Some("private".into()),
//!     engine_version: Some("8.0.mysql_aurora.3.05.2".into()),
//! })
//! .await?;
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod operations;
pub mod params;
pub mod prober;
pub mod progress;
pub mod rds;
pub mod status;
pub mod workflows;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{Config, ConfigError, PollSettings, Profile, ResolvedProfile};
pub use error::{CoreError, Result};
pub use operations::AuroraEngine;
pub use params::{
    CloneParams, DeleteParams, Engine, InstanceSpec, RenameTarget, RestoreType,
    SnapshotRestoreParams, UpgradeParams,
};
pub use prober::StatusProber;
pub use progress::{ProgressCallback, ProgressEvent, WaitConfig, poll_until};
pub use rds::{
    Acknowledgement, AwsContext, AwsContextOptions, RdsApi, RdsClient, ResourceKind,
    instance_identifier,
};
pub use status::{ClusterStatus, InstanceStatus, SnapshotStatus};
pub use workflows::{WorkflowOutcome, WorkflowReport};
