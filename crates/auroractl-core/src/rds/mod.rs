//! The RDS control-plane boundary
//!
//! [`RdsApi`] is the only seam between orchestration logic and AWS. Describe
//! calls return the raw status text; mutating calls return the synchronous
//! [`Acknowledgement`] so that callers decide what counts as success.
//!
//! - [`RdsClient`] implements the trait over `aws-sdk-rds`
//! - [`AwsContext`] loads the SDK configuration once per process

pub mod client;
pub mod context;

pub use client::RdsClient;
pub use context::{AwsContext, AwsContextOptions};

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::params::{Engine, InstanceSpec, RestoreType};

/// Kind of RDS resource this tool touches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Cluster,
    Instance,
    Snapshot,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Cluster => write!(f, "cluster"),
            ResourceKind::Instance => write!(f, "instance"),
            ResourceKind::Snapshot => write!(f, "snapshot"),
        }
    }
}

/// Synchronous response to a mutating call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acknowledgement {
    /// HTTP status code of the response
    pub status_code: u16,
    /// Service error code when the call was rejected (e.g. `DBClusterNotFoundFault`)
    pub error_code: Option<String>,
    /// Service error message when the call was rejected
    pub message: Option<String>,
}

impl Acknowledgement {
    /// A plain `200 OK`
    pub fn ok() -> Self {
        Self::with_status(200)
    }

    /// An acknowledgement with the given status and no error detail
    pub fn with_status(status_code: u16) -> Self {
        Self {
            status_code,
            error_code: None,
            message: None,
        }
    }

    /// Only an exact 200 counts as accepted
    pub fn is_accepted(&self) -> bool {
        self.status_code == 200
    }
}

/// Copy-on-write clone of a cluster at its latest restorable time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneClusterRequest {
    pub cluster_identifier: String,
    pub source_cluster_identifier: String,
    pub subnet_group_name: Option<String>,
    pub restore_type: RestoreType,
}

/// A DB instance attached to an existing cluster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateInstanceRequest {
    pub instance_identifier: String,
    pub cluster_identifier: String,
    pub spec: InstanceSpec,
}

/// A new cluster restored from a cluster snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreFromSnapshotRequest {
    pub cluster_identifier: String,
    pub snapshot_identifier: String,
    pub engine: Engine,
    pub engine_version: Option<String>,
}

/// Cluster deletion; no final snapshot is taken when the identifier is absent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteClusterRequest {
    pub cluster_identifier: String,
    pub final_snapshot_identifier: Option<String>,
}

/// RDS control-plane operations used by the orchestration layer.
///
/// Describe methods return `CoreError::NotFound` when the resource does not
/// exist and `CoreError::Describe` for any other failure. Mutating methods
/// return `Ok(Acknowledgement)` whenever the service answered, even with an
/// error status; `Err` is reserved for calls that never got a response.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RdsApi: Send + Sync {
    /// Raw status text of a DB cluster
    async fn cluster_status(&self, cluster_identifier: &str) -> Result<String>;

    /// Raw status text of a DB instance
    async fn instance_status(&self, instance_identifier: &str) -> Result<String>;

    /// Raw status text of a manual DB cluster snapshot
    async fn snapshot_status(
        &self,
        cluster_identifier: &str,
        snapshot_identifier: &str,
    ) -> Result<String>;

    /// Identifiers of the DB instances that belong to a cluster
    async fn cluster_members(&self, cluster_identifier: &str) -> Result<Vec<String>>;

    async fn restore_cluster_to_point_in_time(
        &self,
        request: &CloneClusterRequest,
    ) -> Result<Acknowledgement>;

    async fn create_instance(&self, request: &CreateInstanceRequest) -> Result<Acknowledgement>;

    /// Apply a new engine version immediately
    async fn modify_cluster_engine_version(
        &self,
        cluster_identifier: &str,
        engine_version: &str,
    ) -> Result<Acknowledgement>;

    /// Rename a cluster immediately
    async fn rename_cluster(
        &self,
        cluster_identifier: &str,
        new_cluster_identifier: &str,
    ) -> Result<Acknowledgement>;

    async fn create_cluster_snapshot(
        &self,
        cluster_identifier: &str,
        snapshot_identifier: &str,
    ) -> Result<Acknowledgement>;

    async fn restore_cluster_from_snapshot(
        &self,
        request: &RestoreFromSnapshotRequest,
    ) -> Result<Acknowledgement>;

    async fn delete_instance(&self, instance_identifier: &str) -> Result<Acknowledgement>;

    async fn delete_cluster(&self, request: &DeleteClusterRequest) -> Result<Acknowledgement>;
}

/// Identifier of the instance a workflow attaches to a new cluster.
///
/// Renames keep instance identifiers, so after a swap this no longer matches
/// the owning cluster; use [`RdsApi::cluster_members`] to find them.
pub fn instance_identifier(cluster_identifier: &str) -> String {
    format!("{cluster_identifier}-instance")
}
