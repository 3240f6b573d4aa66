//! In-memory RDS control plane for workflow tests
//!
//! Every resource moves through a short queue of transitional statuses before
//! settling. Mutating calls are recorded in order as readable strings.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use auroractl_core::rds::{
    Acknowledgement, CloneClusterRequest, CreateInstanceRequest, DeleteClusterRequest,
    RestoreFromSnapshotRequest,
};
use auroractl_core::{CoreError, RdsApi, ResourceKind, Result};

#[derive(Debug, Clone)]
struct Resource {
    /// Statuses reported, one per describe, before settling
    pending: VecDeque<String>,
    /// Status once `pending` is drained; `None` means the resource is gone
    settled: Option<String>,
    engine_version: Option<String>,
    /// Owning cluster, for instances
    cluster: Option<String>,
}

impl Resource {
    fn transitioning(through: &[&str], settled: Option<&str>) -> Self {
        Self {
            pending: through.iter().map(|s| s.to_string()).collect(),
            settled: settled.map(str::to_string),
            engine_version: None,
            cluster: None,
        }
    }

    fn available() -> Self {
        Self::transitioning(&[], Some("available"))
    }

    fn exists(&self) -> bool {
        self.settled.is_some()
    }

    /// Still answers describes, even if it is on its way out
    fn visible(&self) -> bool {
        self.settled.is_some() || !self.pending.is_empty()
    }
}

#[derive(Default)]
struct State {
    clusters: BTreeMap<String, Resource>,
    instances: BTreeMap<String, Resource>,
    snapshots: BTreeMap<String, Resource>,
    calls: Vec<String>,
    describes: usize,
    rejections: HashMap<&'static str, u16>,
}

/// Fake control plane implementing [`RdsApi`]
#[derive(Default)]
pub struct FakeRds {
    state: Mutex<State>,
}

impl FakeRds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an `available` cluster
    pub fn with_cluster(self, identifier: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .clusters
            .insert(identifier.to_string(), Resource::available());
        self
    }

    /// Start with an `available` instance that belongs to `cluster`
    pub fn with_instance(self, identifier: &str, cluster: &str) -> Self {
        let mut instance = Resource::available();
        instance.cluster = Some(cluster.to_string());
        self.state
            .lock()
            .unwrap()
            .instances
            .insert(identifier.to_string(), instance);
        self
    }

    /// Answer the named mutating call with `status_code`
    pub fn reject(self, call: &'static str, status_code: u16) -> Self {
        self.state
            .lock()
            .unwrap()
            .rejections
            .insert(call, status_code);
        self
    }

    /// Mutating calls received so far
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Total describe calls received
    pub fn describes(&self) -> usize {
        self.state.lock().unwrap().describes
    }

    /// Total calls of any kind
    pub fn total_calls(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.calls.len() + state.describes
    }

    /// Identifiers of clusters that still exist once transitions settle
    pub fn clusters(&self) -> Vec<String> {
        existing(&self.state.lock().unwrap().clusters)
    }

    pub fn instances(&self) -> Vec<String> {
        existing(&self.state.lock().unwrap().instances)
    }

    pub fn snapshots(&self) -> Vec<String> {
        existing(&self.state.lock().unwrap().snapshots)
    }

    pub fn cluster_engine_version(&self, identifier: &str) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .clusters
            .get(identifier)
            .and_then(|c| c.engine_version.clone())
    }

    /// Record a mutating call and apply it.
    ///
    /// `apply` returns the service error code when the target does not exist;
    /// that is answered with a 404 like RDS does.
    fn mutate(
        &self,
        call: &'static str,
        description: String,
        apply: impl FnOnce(&mut State) -> std::result::Result<(), &'static str>,
    ) -> Result<Acknowledgement> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("{call} {description}"));
        if let Some(status) = state.rejections.get(call) {
            return Ok(Acknowledgement {
                status_code: *status,
                error_code: Some("InvalidParameterCombination".to_string()),
                message: None,
            });
        }
        match apply(&mut state) {
            Ok(()) => Ok(Acknowledgement::ok()),
            Err(code) => Ok(Acknowledgement {
                status_code: 404,
                error_code: Some(code.to_string()),
                message: None,
            }),
        }
    }
}

fn existing(map: &BTreeMap<String, Resource>) -> Vec<String> {
    map.iter()
        .filter(|(_, r)| r.exists())
        .map(|(id, _)| id.clone())
        .collect()
}

fn describe(
    map: &mut BTreeMap<String, Resource>,
    kind: ResourceKind,
    identifier: &str,
) -> Result<String> {
    let not_found = || CoreError::NotFound {
        kind,
        identifier: identifier.to_string(),
    };
    let resource = map.get_mut(identifier).ok_or_else(not_found)?;
    if let Some(status) = resource.pending.pop_front() {
        return Ok(status);
    }
    if let Some(status) = resource.settled.clone() {
        return Ok(status);
    }
    map.remove(identifier);
    Err(not_found())
}

fn snapshot_key(cluster: &str, snapshot: &str) -> String {
    format!("{cluster}/{snapshot}")
}

#[async_trait]
impl RdsApi for FakeRds {
    async fn cluster_status(&self, cluster_identifier: &str) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        state.describes += 1;
        describe(&mut state.clusters, ResourceKind::Cluster, cluster_identifier)
    }

    async fn instance_status(&self, instance_identifier: &str) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        state.describes += 1;
        describe(
            &mut state.instances,
            ResourceKind::Instance,
            instance_identifier,
        )
    }

    async fn snapshot_status(
        &self,
        cluster_identifier: &str,
        snapshot_identifier: &str,
    ) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        state.describes += 1;
        describe(
            &mut state.snapshots,
            ResourceKind::Snapshot,
            &snapshot_key(cluster_identifier, snapshot_identifier),
        )
        .map_err(|_| CoreError::NotFound {
            kind: ResourceKind::Snapshot,
            identifier: snapshot_identifier.to_string(),
        })
    }

    async fn cluster_members(&self, cluster_identifier: &str) -> Result<Vec<String>> {
        let mut state = self.state.lock().unwrap();
        state.describes += 1;
        if !state
            .clusters
            .get(cluster_identifier)
            .is_some_and(Resource::visible)
        {
            return Err(CoreError::NotFound {
                kind: ResourceKind::Cluster,
                identifier: cluster_identifier.to_string(),
            });
        }
        Ok(state
            .instances
            .iter()
            .filter(|(_, i)| i.exists() && i.cluster.as_deref() == Some(cluster_identifier))
            .map(|(id, _)| id.clone())
            .collect())
    }

    async fn restore_cluster_to_point_in_time(
        &self,
        request: &CloneClusterRequest,
    ) -> Result<Acknowledgement> {
        self.mutate(
            "clone",
            format!(
                "{} -> {} (subnet {}, {})",
                request.source_cluster_identifier,
                request.cluster_identifier,
                request.subnet_group_name.as_deref().unwrap_or("default"),
                request.restore_type.as_str()
            ),
            |state| {
                let mut clone = Resource::transitioning(&["creating", "creating"], Some("available"));
                clone.engine_version = state
                    .clusters
                    .get(&request.source_cluster_identifier)
                    .and_then(|c| c.engine_version.clone());
                state
                    .clusters
                    .insert(request.cluster_identifier.clone(), clone);
                Ok(())
            },
        )
    }

    async fn create_instance(&self, request: &CreateInstanceRequest) -> Result<Acknowledgement> {
        self.mutate(
            "create-instance",
            format!(
                "{} in {} ({} {} {})",
                request.instance_identifier,
                request.cluster_identifier,
                request.spec.engine,
                request.spec.engine_version.as_deref().unwrap_or("inherited"),
                request.spec.instance_class
            ),
            |state| {
                let mut instance = Resource::transitioning(
                    &["creating", "configuring-enhanced-monitoring"],
                    Some("available"),
                );
                instance.cluster = Some(request.cluster_identifier.clone());
                state
                    .instances
                    .insert(request.instance_identifier.clone(), instance);
                Ok(())
            },
        )
    }

    async fn modify_cluster_engine_version(
        &self,
        cluster_identifier: &str,
        engine_version: &str,
    ) -> Result<Acknowledgement> {
        self.mutate(
            "modify",
            format!("{cluster_identifier} to {engine_version}"),
            |state| {
                if let Some(cluster) = state.clusters.get_mut(cluster_identifier) {
                    cluster.pending =
                        ["available", "upgrading", "upgrading"].map(String::from).into();
                    cluster.engine_version = Some(engine_version.to_string());
                }
                Ok(())
            },
        )
    }

    async fn rename_cluster(
        &self,
        cluster_identifier: &str,
        new_cluster_identifier: &str,
    ) -> Result<Acknowledgement> {
        self.mutate(
            "rename",
            format!("{cluster_identifier} -> {new_cluster_identifier}"),
            |state| {
                let old = state
                    .clusters
                    .remove(cluster_identifier)
                    .filter(Resource::exists)
                    .ok_or("DBClusterNotFoundFault")?;
                for instance in state.instances.values_mut() {
                    if instance.cluster.as_deref() == Some(cluster_identifier) {
                        instance.cluster = Some(new_cluster_identifier.to_string());
                    }
                }
                state.clusters.insert(
                    cluster_identifier.to_string(),
                    Resource::transitioning(&["renaming"], None),
                );
                state.clusters.insert(
                    new_cluster_identifier.to_string(),
                    Resource {
                        pending: ["renaming".to_string()].into(),
                        settled: Some("available".to_string()),
                        engine_version: old.engine_version,
                        cluster: None,
                    },
                );
                Ok(())
            },
        )
    }

    async fn create_cluster_snapshot(
        &self,
        cluster_identifier: &str,
        snapshot_identifier: &str,
    ) -> Result<Acknowledgement> {
        self.mutate(
            "snapshot",
            format!("{cluster_identifier} as {snapshot_identifier}"),
            |state| {
                let mut snapshot = Resource::transitioning(&["creating"], Some("available"));
                snapshot.engine_version = state
                    .clusters
                    .get(cluster_identifier)
                    .and_then(|c| c.engine_version.clone());
                state
                    .snapshots
                    .insert(snapshot_key(cluster_identifier, snapshot_identifier), snapshot);
                Ok(())
            },
        )
    }

    async fn restore_cluster_from_snapshot(
        &self,
        request: &RestoreFromSnapshotRequest,
    ) -> Result<Acknowledgement> {
        self.mutate(
            "restore",
            format!(
                "{} -> {} ({})",
                request.snapshot_identifier, request.cluster_identifier, request.engine
            ),
            |state| {
                let mut cluster = Resource::transitioning(&["creating"], Some("available"));
                cluster.engine_version = request.engine_version.clone();
                state
                    .clusters
                    .insert(request.cluster_identifier.clone(), cluster);
                Ok(())
            },
        )
    }

    async fn delete_instance(&self, instance_identifier: &str) -> Result<Acknowledgement> {
        self.mutate("delete-instance", instance_identifier.to_string(), |state| {
            let instance = state
                .instances
                .get_mut(instance_identifier)
                .filter(|i| i.exists())
                .ok_or("DBInstanceNotFound")?;
            instance.pending = ["deleting", "deleting"].map(String::from).into();
            instance.settled = None;
            Ok(())
        })
    }

    async fn delete_cluster(&self, request: &DeleteClusterRequest) -> Result<Acknowledgement> {
        self.mutate(
            "delete",
            format!(
                "{} (final snapshot {})",
                request.cluster_identifier,
                request.final_snapshot_identifier.as_deref().unwrap_or("skipped")
            ),
            |state| {
                if !state
                    .clusters
                    .get(&request.cluster_identifier)
                    .is_some_and(Resource::exists)
                {
                    return Err("DBClusterNotFoundFault");
                }
                if let Some(snapshot) = &request.final_snapshot_identifier {
                    state.snapshots.insert(
                        snapshot_key(&request.cluster_identifier, snapshot),
                        Resource::available(),
                    );
                }
                state.clusters.insert(
                    request.cluster_identifier.clone(),
                    Resource::transitioning(&["deleting"], None),
                );
                Ok(())
            },
        )
    }
}
