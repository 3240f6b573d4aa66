//! Single-shot status checks
//!
//! Each probe issues exactly one describe call and answers whether the
//! resource is in the wanted state. Probes never wait; pair them with
//! [`poll_until`](crate::progress::poll_until) to block on a transition.

use tracing::info;

use crate::error::Result;
use crate::rds::RdsApi;
use crate::status::{ClusterStatus, InstanceStatus, SnapshotStatus};

/// Status checks over an [`RdsApi`]
#[derive(Debug)]
pub struct StatusProber<'a, A: ?Sized> {
    api: &'a A,
}

impl<A: ?Sized> Clone for StatusProber<'_, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<A: ?Sized> Copy for StatusProber<'_, A> {}

impl<'a, A: RdsApi + ?Sized> StatusProber<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Whether the cluster currently reports `target`
    pub async fn cluster_is(&self, cluster_identifier: &str, target: ClusterStatus) -> Result<bool> {
        let status: ClusterStatus = self.api.cluster_status(cluster_identifier).await?.parse()?;
        info!(
            cluster = cluster_identifier,
            %status,
            %target,
            "Cluster status"
        );
        Ok(status == target)
    }

    /// Whether the instance currently reports `target`
    pub async fn instance_is(
        &self,
        instance_identifier: &str,
        target: InstanceStatus,
    ) -> Result<bool> {
        let status: InstanceStatus = self
            .api
            .instance_status(instance_identifier)
            .await?
            .parse()?;
        info!(
            instance = instance_identifier,
            %status,
            %target,
            "Instance status"
        );
        Ok(status == target)
    }

    /// Whether the manual snapshot of `cluster_identifier` currently reports `target`
    pub async fn snapshot_is(
        &self,
        cluster_identifier: &str,
        snapshot_identifier: &str,
        target: SnapshotStatus,
    ) -> Result<bool> {
        let status: SnapshotStatus = self
            .api
            .snapshot_status(cluster_identifier, snapshot_identifier)
            .await?
            .parse()?;
        info!(
            cluster = cluster_identifier,
            snapshot = snapshot_identifier,
            %status,
            %target,
            "Snapshot status"
        );
        Ok(status == target)
    }

    /// Whether a rename away from `old_identifier` has been picked up.
    ///
    /// The old name either reports `renaming` or has already disappeared.
    /// Any other describe failure propagates.
    pub async fn cluster_rename_observed(&self, old_identifier: &str) -> Result<bool> {
        match self.api.cluster_status(old_identifier).await {
            Ok(raw) => {
                let status: ClusterStatus = raw.parse()?;
                info!(cluster = old_identifier, %status, "Waiting for rename");
                Ok(status == ClusterStatus::Renaming)
            }
            Err(err) if err.is_not_found() => {
                info!(cluster = old_identifier, "Old identifier no longer exists");
                Ok(true)
            }
            Err(err) => Err(err),
        }
    }

    /// Whether the cluster no longer exists
    pub async fn cluster_gone(&self, cluster_identifier: &str) -> Result<bool> {
        match self.api.cluster_status(cluster_identifier).await {
            Ok(raw) => {
                let status: ClusterStatus = raw.parse()?;
                info!(cluster = cluster_identifier, %status, "Cluster still present");
                Ok(false)
            }
            Err(err) if err.is_not_found() => {
                info!(cluster = cluster_identifier, "Cluster gone");
                Ok(true)
            }
            Err(err) => Err(err),
        }
    }

    /// Whether the instance no longer exists
    pub async fn instance_gone(&self, instance_identifier: &str) -> Result<bool> {
        match self.api.instance_status(instance_identifier).await {
            Ok(raw) => {
                let status: InstanceStatus = raw.parse()?;
                info!(instance = instance_identifier, %status, "Instance still present");
                Ok(false)
            }
            Err(err) if err.is_not_found() => {
                info!(instance = instance_identifier, "Instance gone");
                Ok(true)
            }
            Err(err) => Err(err),
        }
    }
}
