//! `aws-sdk-rds` implementation of [`RdsApi`]

use async_trait::async_trait;
use aws_sdk_rds::Client;
use aws_sdk_rds::config::http::HttpResponse;
use aws_sdk_rds::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use tracing::{debug, warn};

use super::{
    Acknowledgement, AwsContext, CloneClusterRequest, CreateInstanceRequest, DeleteClusterRequest,
    RdsApi, ResourceKind, RestoreFromSnapshotRequest,
};
use crate::error::{CoreError, Result};

/// RDS client used for every control-plane call
#[derive(Clone, Debug)]
pub struct RdsClient {
    client: Client,
}

impl RdsClient {
    /// Wrap an already configured SDK client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create an RDS client from a pre-loaded AWS context
    pub fn from_context(ctx: &AwsContext) -> Self {
        Self {
            client: ctx.rds_client(),
        }
    }
}

/// Turn the outcome of a mutating call into an acknowledgement.
///
/// A service error still carries an HTTP response, so it becomes a non-200
/// acknowledgement for the caller to judge. Anything without a response is an
/// SDK error.
fn acknowledge<O, E>(
    operation: &'static str,
    identifier: &str,
    result: std::result::Result<O, SdkError<E, HttpResponse>>,
) -> Result<Acknowledgement>
where
    O: std::fmt::Debug,
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    match result {
        Ok(output) => {
            debug!(operation, identifier, response = ?output, "Request acknowledged");
            Ok(Acknowledgement::ok())
        }
        Err(SdkError::ServiceError(context)) => {
            let status_code = context.raw().status().as_u16();
            let err = context.err();
            warn!(
                operation,
                identifier,
                status_code,
                code = ?err.code(),
                "Request rejected by RDS"
            );
            Ok(Acknowledgement {
                status_code,
                error_code: err.code().map(str::to_string),
                message: err.message().map(str::to_string),
            })
        }
        Err(err) => Err(CoreError::Sdk {
            operation,
            message: DisplayErrorContext(&err).to_string(),
        }),
    }
}

/// Classify a failed describe call
fn describe_error<E>(
    kind: ResourceKind,
    identifier: &str,
    err: SdkError<E, HttpResponse>,
    is_not_found: impl FnOnce(&E) -> bool,
) -> CoreError
where
    E: std::error::Error + Send + Sync + 'static,
{
    if err.as_service_error().is_some_and(is_not_found) {
        return CoreError::NotFound {
            kind,
            identifier: identifier.to_string(),
        };
    }

    CoreError::Describe {
        kind,
        identifier: identifier.to_string(),
        message: DisplayErrorContext(&err).to_string(),
    }
}

fn status_text(kind: ResourceKind, identifier: &str, status: Option<&str>) -> Result<String> {
    status
        .map(str::to_string)
        .ok_or_else(|| CoreError::Describe {
            kind,
            identifier: identifier.to_string(),
            message: "response carried no status".to_string(),
        })
}

fn not_found(kind: ResourceKind, identifier: &str) -> CoreError {
    CoreError::NotFound {
        kind,
        identifier: identifier.to_string(),
    }
}

#[async_trait]
impl RdsApi for RdsClient {
    async fn cluster_status(&self, cluster_identifier: &str) -> Result<String> {
        let output = self
            .client
            .describe_db_clusters()
            .db_cluster_identifier(cluster_identifier)
            .send()
            .await
            .map_err(|err| {
                describe_error(ResourceKind::Cluster, cluster_identifier, err, |e| {
                    e.is_db_cluster_not_found_fault()
                })
            })?;

        let cluster = output
            .db_clusters()
            .first()
            .ok_or_else(|| not_found(ResourceKind::Cluster, cluster_identifier))?;
        status_text(ResourceKind::Cluster, cluster_identifier, cluster.status())
    }

    async fn instance_status(&self, instance_identifier: &str) -> Result<String> {
        let output = self
            .client
            .describe_db_instances()
            .db_instance_identifier(instance_identifier)
            .send()
            .await
            .map_err(|err| {
                describe_error(ResourceKind::Instance, instance_identifier, err, |e| {
                    e.is_db_instance_not_found_fault()
                })
            })?;

        let instance = output
            .db_instances()
            .first()
            .ok_or_else(|| not_found(ResourceKind::Instance, instance_identifier))?;
        status_text(
            ResourceKind::Instance,
            instance_identifier,
            instance.db_instance_status(),
        )
    }

    async fn snapshot_status(
        &self,
        cluster_identifier: &str,
        snapshot_identifier: &str,
    ) -> Result<String> {
        let output = self
            .client
            .describe_db_cluster_snapshots()
            .db_cluster_identifier(cluster_identifier)
            .db_cluster_snapshot_identifier(snapshot_identifier)
            .snapshot_type("manual")
            .send()
            .await
            .map_err(|err| {
                describe_error(ResourceKind::Snapshot, snapshot_identifier, err, |e| {
                    e.is_db_cluster_snapshot_not_found_fault()
                })
            })?;

        let snapshot = output
            .db_cluster_snapshots()
            .first()
            .ok_or_else(|| not_found(ResourceKind::Snapshot, snapshot_identifier))?;
        status_text(ResourceKind::Snapshot, snapshot_identifier, snapshot.status())
    }

    async fn cluster_members(&self, cluster_identifier: &str) -> Result<Vec<String>> {
        let output = self
            .client
            .describe_db_clusters()
            .db_cluster_identifier(cluster_identifier)
            .send()
            .await
            .map_err(|err| {
                describe_error(ResourceKind::Cluster, cluster_identifier, err, |e| {
                    e.is_db_cluster_not_found_fault()
                })
            })?;

        let cluster = output
            .db_clusters()
            .first()
            .ok_or_else(|| not_found(ResourceKind::Cluster, cluster_identifier))?;
        let members: Vec<String> = cluster
            .db_cluster_members()
            .iter()
            .filter_map(|m| m.db_instance_identifier())
            .map(str::to_string)
            .collect();
        debug!(cluster = cluster_identifier, ?members, "Cluster members");
        Ok(members)
    }

    async fn restore_cluster_to_point_in_time(
        &self,
        request: &CloneClusterRequest,
    ) -> Result<Acknowledgement> {
        let result = self
            .client
            .restore_db_cluster_to_point_in_time()
            .db_cluster_identifier(&request.cluster_identifier)
            .restore_type(request.restore_type.as_str())
            .source_db_cluster_identifier(&request.source_cluster_identifier)
            .use_latest_restorable_time(true)
            .set_db_subnet_group_name(request.subnet_group_name.clone())
            .send()
            .await;
        acknowledge("clone", &request.source_cluster_identifier, result)
    }

    async fn create_instance(&self, request: &CreateInstanceRequest) -> Result<Acknowledgement> {
        let result = self
            .client
            .create_db_instance()
            .db_instance_identifier(&request.instance_identifier)
            .db_cluster_identifier(&request.cluster_identifier)
            .db_instance_class(&request.spec.instance_class)
            .engine(request.spec.engine.as_str())
            .set_engine_version(request.spec.engine_version.clone())
            .send()
            .await;
        acknowledge("create db instance", &request.cluster_identifier, result)
    }

    async fn modify_cluster_engine_version(
        &self,
        cluster_identifier: &str,
        engine_version: &str,
    ) -> Result<Acknowledgement> {
        let result = self
            .client
            .modify_db_cluster()
            .db_cluster_identifier(cluster_identifier)
            .apply_immediately(true)
            .engine_version(engine_version)
            .send()
            .await;
        acknowledge("modify", cluster_identifier, result)
    }

    async fn rename_cluster(
        &self,
        cluster_identifier: &str,
        new_cluster_identifier: &str,
    ) -> Result<Acknowledgement> {
        let result = self
            .client
            .modify_db_cluster()
            .db_cluster_identifier(cluster_identifier)
            .apply_immediately(true)
            .new_db_cluster_identifier(new_cluster_identifier)
            .send()
            .await;
        acknowledge("rename", cluster_identifier, result)
    }

    async fn create_cluster_snapshot(
        &self,
        cluster_identifier: &str,
        snapshot_identifier: &str,
    ) -> Result<Acknowledgement> {
        let result = self
            .client
            .create_db_cluster_snapshot()
            .db_cluster_identifier(cluster_identifier)
            .db_cluster_snapshot_identifier(snapshot_identifier)
            .send()
            .await;
        acknowledge("snapshot", cluster_identifier, result)
    }

    async fn restore_cluster_from_snapshot(
        &self,
        request: &RestoreFromSnapshotRequest,
    ) -> Result<Acknowledgement> {
        let result = self
            .client
            .restore_db_cluster_from_snapshot()
            .db_cluster_identifier(&request.cluster_identifier)
            .snapshot_identifier(&request.snapshot_identifier)
            .engine(request.engine.as_str())
            .set_engine_version(request.engine_version.clone())
            .send()
            .await;
        acknowledge("restore", &request.cluster_identifier, result)
    }

    async fn delete_instance(&self, instance_identifier: &str) -> Result<Acknowledgement> {
        let result = self
            .client
            .delete_db_instance()
            .db_instance_identifier(instance_identifier)
            .send()
            .await;
        acknowledge("delete db instance", instance_identifier, result)
    }

    async fn delete_cluster(&self, request: &DeleteClusterRequest) -> Result<Acknowledgement> {
        let result = self
            .client
            .delete_db_cluster()
            .db_cluster_identifier(&request.cluster_identifier)
            .skip_final_snapshot(request.final_snapshot_identifier.is_none())
            .set_final_db_snapshot_identifier(request.final_snapshot_identifier.clone())
            .send()
            .await;
        acknowledge("delete", &request.cluster_identifier, result)
    }
}
