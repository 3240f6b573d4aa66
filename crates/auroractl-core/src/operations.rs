//! Resource operations: one mutating call, then wait
//!
//! Each method on [`AuroraEngine`] issues exactly one mutating RDS call,
//! checks the synchronous acknowledgement, and blocks until the resource
//! reaches its target state. A rejected call fails immediately and is never
//! retried.

use tracing::{debug, error, info};

use crate::clock::{Clock, SystemClock};
use crate::error::{CoreError, Result};
use crate::params::{Engine, InstanceSpec, RenameTarget, RestoreType};
use crate::prober::StatusProber;
use crate::progress::{ProgressCallback, WaitConfig, poll_until};
use crate::rds::{
    Acknowledgement, CloneClusterRequest, CreateInstanceRequest, DeleteClusterRequest, RdsApi,
    RestoreFromSnapshotRequest, instance_identifier,
};
use crate::status::{ClusterStatus, InstanceStatus, SnapshotStatus};

/// Executes RDS operations against an [`RdsApi`] and waits for them to settle
///
/// # Example
///
/// ```rust,ignore
/// use auroractl_core::{AuroraEngine, AwsContext, AwsContextOptions, RdsClient};
///
/// let aws = AwsContext::load(&AwsContextOptions::default()).await;
/// let engine = AuroraEngine::new(RdsClient::from_context(&aws));
/// engine.clone_cluster("orders-clone", "orders", Some("private")).await?;
/// ```
pub struct AuroraEngine<A, C = SystemClock> {
    api: A,
    clock: C,
    wait: WaitConfig,
    instance: InstanceSpec,
    on_progress: Option<ProgressCallback>,
}

impl<A: RdsApi> AuroraEngine<A, SystemClock> {
    /// Engine on real time with the default unbounded wait
    pub fn new(api: A) -> Self {
        Self {
            api,
            clock: SystemClock,
            wait: WaitConfig::default(),
            instance: InstanceSpec::default(),
            on_progress: None,
        }
    }
}

impl<A: RdsApi, C: Clock> AuroraEngine<A, C> {
    /// Swap the time source
    pub fn with_clock<C2: Clock>(self, clock: C2) -> AuroraEngine<A, C2> {
        AuroraEngine {
            api: self.api,
            clock,
            wait: self.wait,
            instance: self.instance,
            on_progress: self.on_progress,
        }
    }

    pub fn with_wait_config(mut self, wait: WaitConfig) -> Self {
        self.wait = wait;
        self
    }

    /// Engine and class for instances that workflows attach to new clusters
    pub fn with_instance_defaults(mut self, instance: InstanceSpec) -> Self {
        self.instance = instance;
        self
    }

    /// Receive poller progress events
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.on_progress = Some(callback);
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn wait_config(&self) -> &WaitConfig {
        &self.wait
    }

    pub fn instance_defaults(&self) -> &InstanceSpec {
        &self.instance
    }

    fn prober(&self) -> StatusProber<'_, A> {
        StatusProber::new(&self.api)
    }

    async fn wait_for_cluster(&self, cluster_identifier: &str, target: ClusterStatus) -> Result<()> {
        let prober = self.prober();
        let resource = format!("cluster {cluster_identifier} {target}");
        poll_until(
            &self.clock,
            &self.wait,
            &resource,
            move || async move { prober.cluster_is(cluster_identifier, target).await },
            self.on_progress.as_ref(),
        )
        .await?;
        Ok(())
    }

    /// Clone `source` into a new cluster `target` at the latest restorable time.
    ///
    /// Waits until `target` is `available`.
    pub async fn clone_cluster(
        &self,
        target: &str,
        source: &str,
        subnet_group_name: Option<&str>,
    ) -> Result<()> {
        info!(source, target, "Cloning cluster");
        let request = CloneClusterRequest {
            cluster_identifier: target.to_string(),
            source_cluster_identifier: source.to_string(),
            subnet_group_name: subnet_group_name.map(str::to_string),
            restore_type: RestoreType::CopyOnWrite,
        };
        let ack = self.api.restore_cluster_to_point_in_time(&request).await?;
        ensure_accepted("clone", source, ack)?;

        self.wait_for_cluster(target, ClusterStatus::Available).await
    }

    /// Attach `<cluster>-instance` to `cluster`.
    ///
    /// Waits until the instance is `available`. Returns the instance identifier.
    pub async fn create_cluster_instance(
        &self,
        cluster_identifier: &str,
        spec: &InstanceSpec,
    ) -> Result<String> {
        let instance = instance_identifier(cluster_identifier);
        info!(
            cluster = cluster_identifier,
            instance = %instance,
            engine = %spec.engine,
            engine_version = spec.engine_version.as_deref().unwrap_or("inherited"),
            instance_class = %spec.instance_class,
            "Creating cluster instance"
        );
        let request = CreateInstanceRequest {
            instance_identifier: instance.clone(),
            cluster_identifier: cluster_identifier.to_string(),
            spec: spec.clone(),
        };
        let ack = self.api.create_instance(&request).await?;
        ensure_accepted("create db instance", cluster_identifier, ack)?;

        let prober = self.prober();
        let resource = format!("instance {instance} available");
        let id = instance.as_str();
        poll_until(
            &self.clock,
            &self.wait,
            &resource,
            move || async move { prober.instance_is(id, InstanceStatus::Available).await },
            self.on_progress.as_ref(),
        )
        .await?;
        Ok(instance)
    }

    /// Move `cluster` to `engine_version`, applied immediately.
    ///
    /// Waits for the cluster to enter `upgrading` and then return to `available`.
    pub async fn upgrade_cluster_engine(
        &self,
        cluster_identifier: &str,
        engine_version: &str,
    ) -> Result<()> {
        info!(cluster = cluster_identifier, engine_version, "Upgrading cluster engine");
        let ack = self
            .api
            .modify_cluster_engine_version(cluster_identifier, engine_version)
            .await?;
        ensure_accepted("modify", cluster_identifier, ack)?;
        info!(cluster = cluster_identifier, engine_version, "Engine upgrade requested");

        self.wait_for_cluster(cluster_identifier, ClusterStatus::Upgrading)
            .await?;
        self.wait_for_cluster(cluster_identifier, ClusterStatus::Available)
            .await
    }

    /// Rename `cluster` and return its new identifier.
    ///
    /// The target is resolved before anything is sent, so an unusable target
    /// fails with `CoreError::Configuration` and no remote call. Waits for the
    /// old identifier to be renaming or gone, then for the new one to be
    /// `available`.
    pub async fn rename_cluster(
        &self,
        cluster_identifier: &str,
        target: &RenameTarget,
    ) -> Result<String> {
        let new_identifier = target.resolve(cluster_identifier)?;
        info!(
            cluster = cluster_identifier,
            new_identifier = %new_identifier,
            "Renaming cluster"
        );
        let ack = self
            .api
            .rename_cluster(cluster_identifier, &new_identifier)
            .await?;
        ensure_accepted("rename", cluster_identifier, ack)?;

        let prober = self.prober();
        let resource = format!("cluster {cluster_identifier} renaming");
        poll_until(
            &self.clock,
            &self.wait,
            &resource,
            move || async move { prober.cluster_rename_observed(cluster_identifier).await },
            self.on_progress.as_ref(),
        )
        .await?;

        self.wait_for_cluster(&new_identifier, ClusterStatus::Available)
            .await?;
        Ok(new_identifier)
    }

    /// Take a manual snapshot of `cluster` and wait for it to be `available`
    pub async fn create_cluster_snapshot(
        &self,
        cluster_identifier: &str,
        snapshot_identifier: &str,
    ) -> Result<()> {
        info!(
            cluster = cluster_identifier,
            snapshot = snapshot_identifier,
            "Creating cluster snapshot"
        );
        let ack = self
            .api
            .create_cluster_snapshot(cluster_identifier, snapshot_identifier)
            .await?;
        ensure_accepted("snapshot", cluster_identifier, ack)?;

        let prober = self.prober();
        let resource = format!("snapshot {snapshot_identifier} available");
        poll_until(
            &self.clock,
            &self.wait,
            &resource,
            move || async move {
                prober
                    .snapshot_is(
                        cluster_identifier,
                        snapshot_identifier,
                        SnapshotStatus::Available,
                    )
                    .await
            },
            self.on_progress.as_ref(),
        )
        .await?;
        Ok(())
    }

    /// Restore a new cluster from a snapshot and wait for it to be `available`
    pub async fn restore_cluster_from_snapshot(
        &self,
        snapshot_identifier: &str,
        new_cluster_identifier: &str,
        engine: Engine,
        engine_version: Option<&str>,
    ) -> Result<()> {
        info!(
            snapshot = snapshot_identifier,
            cluster = new_cluster_identifier,
            %engine,
            "Restoring cluster from snapshot"
        );
        let request = RestoreFromSnapshotRequest {
            cluster_identifier: new_cluster_identifier.to_string(),
            snapshot_identifier: snapshot_identifier.to_string(),
            engine,
            engine_version: engine_version.map(str::to_string),
        };
        let ack = self.api.restore_cluster_from_snapshot(&request).await?;
        ensure_accepted("restore", new_cluster_identifier, ack)?;

        self.wait_for_cluster(new_cluster_identifier, ClusterStatus::Available)
            .await
    }

    /// Instances currently attached to `cluster`
    pub async fn cluster_members(&self, cluster_identifier: &str) -> Result<Vec<String>> {
        let members = self.api.cluster_members(cluster_identifier).await?;
        info!(cluster = cluster_identifier, ?members, "Found cluster members");
        Ok(members)
    }

    /// Delete a DB instance and wait until it no longer exists
    pub async fn delete_instance(&self, instance_identifier: &str) -> Result<()> {
        info!(instance = instance_identifier, "Deleting instance");
        let ack = self.api.delete_instance(instance_identifier).await?;
        ensure_accepted("delete db instance", instance_identifier, ack)?;

        let prober = self.prober();
        let resource = format!("instance {instance_identifier} deleted");
        poll_until(
            &self.clock,
            &self.wait,
            &resource,
            move || async move { prober.instance_gone(instance_identifier).await },
            self.on_progress.as_ref(),
        )
        .await?;
        Ok(())
    }

    /// Delete `cluster` and wait until it no longer exists.
    ///
    /// A final snapshot is taken only when an identifier for it is given.
    pub async fn delete_cluster(
        &self,
        cluster_identifier: &str,
        final_snapshot_identifier: Option<&str>,
    ) -> Result<()> {
        info!(
            cluster = cluster_identifier,
            final_snapshot = final_snapshot_identifier.unwrap_or("none"),
            "Deleting cluster"
        );
        let request = DeleteClusterRequest {
            cluster_identifier: cluster_identifier.to_string(),
            final_snapshot_identifier: final_snapshot_identifier.map(str::to_string),
        };
        let ack = self.api.delete_cluster(&request).await?;
        ensure_accepted("delete", cluster_identifier, ack)?;

        let prober = self.prober();
        let resource = format!("cluster {cluster_identifier} deleted");
        poll_until(
            &self.clock,
            &self.wait,
            &resource,
            move || async move { prober.cluster_gone(cluster_identifier).await },
            self.on_progress.as_ref(),
        )
        .await?;
        Ok(())
    }
}

/// Fail unless the service answered exactly 200
fn ensure_accepted(
    operation: &'static str,
    identifier: &str,
    ack: Acknowledgement,
) -> Result<()> {
    if ack.is_accepted() {
        debug!(operation, identifier, "Request accepted");
        return Ok(());
    }

    error!(
        operation,
        identifier,
        status_code = ack.status_code,
        "Request not accepted"
    );
    Err(CoreError::OperationFailed {
        operation,
        identifier: identifier.to_string(),
        status_code: ack.status_code,
        code: ack.error_code,
        message: ack.message,
    })
}
