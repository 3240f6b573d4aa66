//! Multi-step cluster workflows
//!
//! Each workflow is a fixed, strictly sequential chain of resource operations;
//! a step starts only after the previous one reached its target state. The
//! first failure aborts the workflow and nothing already done is undone.
//!
//! When required arguments are absent a workflow makes no remote call at all
//! and returns [`WorkflowOutcome::Skipped`] naming what was missing.

use std::time::Duration;

use serde::{Serialize, Serializer};
use tracing::{info, warn};

use crate::clock::Clock;
use crate::error::Result;
use crate::operations::AuroraEngine;
use crate::params::{
    CloneParams, DeleteParams, Engine, InstanceSpec, RenameTarget, SnapshotRestoreParams,
    UpgradeParams,
};
use crate::rds::RdsApi;

/// `strftime` pattern of the stamp appended to snapshot prefixes
pub const SNAPSHOT_STAMP_FORMAT: &str = "%y-%m-%d-%H";

/// Result of running a workflow
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum WorkflowOutcome {
    /// Required arguments were missing; nothing was sent
    Skipped {
        workflow: &'static str,
        missing: Vec<&'static str>,
    },
    /// Every step ran to completion
    Completed(WorkflowReport),
}

impl WorkflowOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, WorkflowOutcome::Skipped { .. })
    }

    pub fn report(&self) -> Option<&WorkflowReport> {
        match self {
            WorkflowOutcome::Completed(report) => Some(report),
            WorkflowOutcome::Skipped { .. } => None,
        }
    }
}

/// What a completed workflow did
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowReport {
    pub workflow: &'static str,
    /// Cluster that holds the result under its final name
    pub cluster: String,
    /// Human-readable description of each step, in execution order
    pub steps: Vec<String>,
    #[serde(rename = "elapsed_secs", serialize_with = "as_secs")]
    pub elapsed: Duration,
}

fn as_secs<S: Serializer>(elapsed: &Duration, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_u64(elapsed.as_secs())
}

/// Collects step descriptions and measures elapsed time
struct Run<'c, C: ?Sized> {
    workflow: &'static str,
    clock: &'c C,
    started: std::time::Instant,
    steps: Vec<String>,
}

impl<'c, C: Clock + ?Sized> Run<'c, C> {
    fn start(workflow: &'static str, clock: &'c C) -> Self {
        info!(workflow, "Starting workflow");
        Self {
            workflow,
            clock,
            started: clock.now(),
            steps: Vec::new(),
        }
    }

    fn step(&mut self, description: String) {
        info!(workflow = self.workflow, step = %description, "Step complete");
        self.steps.push(description);
    }

    fn finish(self, cluster: &str) -> WorkflowOutcome {
        let elapsed = self.clock.now() - self.started;
        info!(
            workflow = self.workflow,
            cluster,
            elapsed_secs = elapsed.as_secs(),
            "Workflow finished"
        );
        WorkflowOutcome::Completed(WorkflowReport {
            workflow: self.workflow,
            cluster: cluster.to_string(),
            steps: self.steps,
            elapsed,
        })
    }
}

fn skipped(workflow: &'static str, missing: Vec<&'static str>) -> WorkflowOutcome {
    warn!(workflow, ?missing, "Required arguments missing, nothing to do");
    WorkflowOutcome::Skipped { workflow, missing }
}

/// Replace the names of `old` and `new` so that `new` takes over `old`'s identifier.
///
/// `old` moves to `<old>-backup`, then `new` is renamed to `old`.
async fn swap_in<A: RdsApi, C: Clock>(
    engine: &AuroraEngine<A, C>,
    run: &mut Run<'_, C>,
    old: &str,
    new: &str,
) -> Result<()> {
    let backup = engine.rename_cluster(old, &RenameTarget::default()).await?;
    run.step(format!("renamed {old} to {backup}"));

    let promoted = engine
        .rename_cluster(new, &RenameTarget::Explicit(old.to_string()))
        .await?;
    run.step(format!("renamed {new} to {promoted}"));
    Ok(())
}

/// Upgrade a cluster by cloning it, upgrading the clone and swapping names.
///
/// Clones `source_cluster_identifier` into `cluster_identifier`. Without an
/// `engine_version` the workflow stops there. Otherwise it attaches an
/// instance to the clone, upgrades the clone, renames the source to
/// `<source>-backup` and gives the clone the source's name.
pub async fn upgrade_in_place<A: RdsApi, C: Clock>(
    engine: &AuroraEngine<A, C>,
    params: &UpgradeParams,
) -> Result<WorkflowOutcome> {
    const WORKFLOW: &str = "upgrade-cluster-version";

    let (Some(clone), Some(source)) = (
        params.cluster_identifier.as_deref(),
        params.source_cluster_identifier.as_deref(),
    ) else {
        return Ok(skipped(WORKFLOW, params.missing()));
    };

    let mut run = Run::start(WORKFLOW, engine.clock());

    engine
        .clone_cluster(clone, source, params.subnet_group_name.as_deref())
        .await?;
    run.step(format!("cloned {source} into {clone}"));

    let Some(version) = params.engine_version.as_deref() else {
        info!(cluster = clone, "No engine version given, stopping after clone");
        return Ok(run.finish(clone));
    };

    let spec = InstanceSpec {
        engine_version: None,
        ..engine.instance_defaults().clone()
    };
    let instance = engine.create_cluster_instance(clone, &spec).await?;
    run.step(format!("created instance {instance}"));

    engine.upgrade_cluster_engine(clone, version).await?;
    run.step(format!("upgraded {clone} to {version}"));

    swap_in(engine, &mut run, source, clone).await?;
    Ok(run.finish(source))
}

/// Replace a cluster with a fresh clone of itself on a given engine version.
///
/// Clones `cluster_identifier` into `new_cluster_identifier` inside the subnet
/// group, attaches an instance with the requested version, renames the
/// original to `<original>-backup` and gives the clone the original name.
pub async fn clone_in_time<A: RdsApi, C: Clock>(
    engine: &AuroraEngine<A, C>,
    params: &CloneParams,
) -> Result<WorkflowOutcome> {
    const WORKFLOW: &str = "clone-cluster-in-time";

    let (Some(cluster), Some(new_cluster), Some(subnet_group), Some(version)) = (
        params.cluster_identifier.as_deref(),
        params.new_cluster_identifier.as_deref(),
        params.subnet_group_name.as_deref(),
        params.engine_version.as_deref().filter(|v| !v.is_empty()),
    ) else {
        return Ok(skipped(WORKFLOW, params.missing()));
    };

    let mut run = Run::start(WORKFLOW, engine.clock());

    engine
        .clone_cluster(new_cluster, cluster, Some(subnet_group))
        .await?;
    run.step(format!("cloned {cluster} into {new_cluster}"));

    let spec = engine.instance_defaults().clone().with_engine_version(version);
    let instance = engine.create_cluster_instance(new_cluster, &spec).await?;
    run.step(format!("created instance {instance} on {version}"));

    swap_in(engine, &mut run, cluster, new_cluster).await?;
    Ok(run.finish(cluster))
}

/// Snapshot name for `prefix` at the clock's local time, e.g. `nightly-24-03-07-09`
pub fn snapshot_name<C: Clock + ?Sized>(prefix: &str, clock: &C) -> String {
    format!("{prefix}-{}", clock.local_now().format(SNAPSHOT_STAMP_FORMAT))
}

/// Replace a cluster with a restore of a fresh snapshot of itself.
///
/// Takes `<prefix>-<yy-mm-dd-HH>` of `cluster_identifier`, restores it into
/// `new_cluster_identifier` as `aurora-mysql`, attaches an instance and swaps
/// names as [`clone_in_time`] does.
pub async fn restore_from_snapshot<A: RdsApi, C: Clock>(
    engine: &AuroraEngine<A, C>,
    params: &SnapshotRestoreParams,
) -> Result<WorkflowOutcome> {
    const WORKFLOW: &str = "restore-from-snapshot";

    let (Some(cluster), Some(prefix), Some(new_cluster)) = (
        params.cluster_identifier.as_deref(),
        params.snapshot_identifier.as_deref(),
        params.new_cluster_identifier.as_deref(),
    ) else {
        return Ok(skipped(WORKFLOW, params.missing()));
    };
    let version = params.engine_version.as_deref().filter(|v| !v.is_empty());

    let mut run = Run::start(WORKFLOW, engine.clock());

    let snapshot = snapshot_name(prefix, engine.clock());
    engine.create_cluster_snapshot(cluster, &snapshot).await?;
    run.step(format!("created snapshot {snapshot} of {cluster}"));

    engine
        .restore_cluster_from_snapshot(&snapshot, new_cluster, Engine::AuroraMysql, version)
        .await?;
    run.step(format!("restored {snapshot} into {new_cluster}"));

    let mut spec = InstanceSpec {
        engine: Engine::AuroraMysql,
        ..engine.instance_defaults().clone()
    };
    spec.engine_version = version.map(str::to_string);
    let instance = engine.create_cluster_instance(new_cluster, &spec).await?;
    run.step(format!("created instance {instance}"));

    swap_in(engine, &mut run, cluster, new_cluster).await?;
    Ok(run.finish(cluster))
}

/// Delete a cluster together with its instances.
///
/// Looks up the cluster's member instances, deletes each one and waits for it
/// to disappear, then deletes the cluster (with a final snapshot only when one
/// is named) and waits again. Members are looked up rather than derived from
/// the cluster name because a swapped cluster keeps its instance's old name.
pub async fn delete_cluster<A: RdsApi, C: Clock>(
    engine: &AuroraEngine<A, C>,
    params: &DeleteParams,
) -> Result<WorkflowOutcome> {
    const WORKFLOW: &str = "delete-cluster";

    let Some(cluster) = params.cluster_identifier.as_deref() else {
        return Ok(skipped(WORKFLOW, params.missing()));
    };
    let final_snapshot = params.final_snapshot_identifier.as_deref();

    let mut run = Run::start(WORKFLOW, engine.clock());

    for instance in engine.cluster_members(cluster).await? {
        engine.delete_instance(&instance).await?;
        run.step(format!("deleted instance {instance}"));
    }

    engine.delete_cluster(cluster, final_snapshot).await?;
    match final_snapshot {
        Some(snapshot) => run.step(format!("deleted {cluster} with final snapshot {snapshot}")),
        None => run.step(format!("deleted {cluster}")),
    }

    Ok(run.finish(cluster))
}
