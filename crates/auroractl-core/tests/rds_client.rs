//! Integration tests for the SDK-backed RDS client using a mock server

use aws_sdk_rds::config::retry::RetryConfig;
use aws_sdk_rds::config::{BehaviorVersion, Credentials, Region};
use wiremock::matchers::{body_string_contains, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

use auroractl_core::rds::{CloneClusterRequest, DeleteClusterRequest};
use auroractl_core::{CoreError, RdsApi, RdsClient, ResourceKind, RestoreType};

const NS: &str = "http://rds.amazonaws.com/doc/2014-10-31/";

/// RDS client pointed at `endpoint` with static credentials and no retries
fn client(endpoint: &str) -> RdsClient {
    let config = aws_sdk_rds::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(Credentials::new("AKIDTEST", "secret", None, None, "test"))
        .endpoint_url(endpoint)
        .retry_config(RetryConfig::disabled())
        .build();
    RdsClient::new(aws_sdk_rds::Client::from_conf(config))
}

fn xml(status: u16, body: String) -> ResponseTemplate {
    ResponseTemplate::new(status)
        .insert_header("content-type", "text/xml")
        .set_body_string(body)
}

fn error_body(code: &str, message: &str) -> String {
    format!(
        r#"<ErrorResponse xmlns="{NS}">
  <Error>
    <Type>Sender</Type>
    <Code>{code}</Code>
    <Message>{message}</Message>
  </Error>
  <RequestId>5e6f7a8b-0000-4000-8000-000000000000</RequestId>
</ErrorResponse>"#
    )
}

async fn mock_action(server: &MockServer, action: &str, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(body_string_contains(format!("Action={action}")))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_cluster_status_reads_status_text() {
    let server = MockServer::start().await;
    let body = format!(
        r#"<DescribeDBClustersResponse xmlns="{NS}">
  <DescribeDBClustersResult>
    <DBClusters>
      <DBCluster>
        <DBClusterIdentifier>orders</DBClusterIdentifier>
        <Engine>aurora-mysql</Engine>
        <Status>upgrading</Status>
      </DBCluster>
    </DBClusters>
  </DescribeDBClustersResult>
  <ResponseMetadata>
    <RequestId>5e6f7a8b-0000-4000-8000-000000000001</RequestId>
  </ResponseMetadata>
</DescribeDBClustersResponse>"#
    );
    mock_action(&server, "DescribeDBClusters", xml(200, body)).await;

    let status = client(&server.uri()).cluster_status("orders").await.unwrap();
    assert_eq!(status, "upgrading");
}

#[tokio::test]
async fn test_cluster_members_lists_instance_identifiers() {
    let server = MockServer::start().await;
    let body = format!(
        r#"<DescribeDBClustersResponse xmlns="{NS}">
  <DescribeDBClustersResult>
    <DBClusters>
      <DBCluster>
        <DBClusterIdentifier>orders</DBClusterIdentifier>
        <Status>available</Status>
        <DBClusterMembers>
          <DBClusterMember>
            <DBInstanceIdentifier>orders-next-instance</DBInstanceIdentifier>
            <IsClusterWriter>true</IsClusterWriter>
          </DBClusterMember>
          <DBClusterMember>
            <DBInstanceIdentifier>orders-reader</DBInstanceIdentifier>
            <IsClusterWriter>false</IsClusterWriter>
          </DBClusterMember>
        </DBClusterMembers>
      </DBCluster>
    </DBClusters>
  </DescribeDBClustersResult>
  <ResponseMetadata>
    <RequestId>5e6f7a8b-0000-4000-8000-000000000002</RequestId>
  </ResponseMetadata>
</DescribeDBClustersResponse>"#
    );
    mock_action(&server, "DescribeDBClusters", xml(200, body)).await;

    let members = client(&server.uri())
        .cluster_members("orders")
        .await
        .unwrap();
    assert_eq!(members, vec!["orders-next-instance", "orders-reader"]);
}

#[tokio::test]
async fn test_missing_cluster_is_not_found() {
    let server = MockServer::start().await;
    mock_action(
        &server,
        "DescribeDBClusters",
        xml(
            404,
            error_body("DBClusterNotFoundFault", "DBCluster orders not found."),
        ),
    )
    .await;

    let err = client(&server.uri())
        .cluster_status("orders")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CoreError::NotFound {
            kind: ResourceKind::Cluster,
            ref identifier,
        } if identifier == "orders"
    ));
}

#[tokio::test]
async fn test_other_describe_failures_are_not_not_found() {
    let server = MockServer::start().await;
    mock_action(
        &server,
        "DescribeDBInstances",
        xml(403, error_body("AccessDenied", "not authorized")),
    )
    .await;

    let err = client(&server.uri())
        .instance_status("orders-instance")
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::Describe { .. }));
}

#[tokio::test]
async fn test_accepted_mutation_acknowledges_200() {
    let server = MockServer::start().await;
    let body = format!(
        r#"<DeleteDBClusterResponse xmlns="{NS}">
  <DeleteDBClusterResult>
    <DBCluster>
      <DBClusterIdentifier>orders</DBClusterIdentifier>
      <Status>deleting</Status>
    </DBCluster>
  </DeleteDBClusterResult>
  <ResponseMetadata>
    <RequestId>5e6f7a8b-0000-4000-8000-000000000002</RequestId>
  </ResponseMetadata>
</DeleteDBClusterResponse>"#
    );
    Mock::given(method("POST"))
        .and(body_string_contains("Action=DeleteDBCluster"))
        .and(body_string_contains("SkipFinalSnapshot=true"))
        .respond_with(xml(200, body))
        .expect(1)
        .mount(&server)
        .await;

    let ack = client(&server.uri())
        .delete_cluster(&DeleteClusterRequest {
            cluster_identifier: "orders".to_string(),
            final_snapshot_identifier: None,
        })
        .await
        .unwrap();

    assert!(ack.is_accepted());
}

#[tokio::test]
async fn test_rejected_mutation_carries_http_status() {
    let server = MockServer::start().await;
    mock_action(
        &server,
        "RestoreDBClusterToPointInTime",
        xml(
            400,
            error_body("InvalidSubnet", "DB subnet group 'private' does not exist"),
        ),
    )
    .await;

    let ack = client(&server.uri())
        .restore_cluster_to_point_in_time(&CloneClusterRequest {
            cluster_identifier: "orders-next".to_string(),
            source_cluster_identifier: "orders".to_string(),
            subnet_group_name: Some("private".to_string()),
            restore_type: RestoreType::CopyOnWrite,
        })
        .await
        .unwrap();

    assert_eq!(ack.status_code, 400);
    assert!(!ack.is_accepted());
    assert_eq!(ack.error_code.as_deref(), Some("InvalidSubnet"));
}

#[tokio::test]
async fn test_unreachable_endpoint_is_sdk_error() {
    let err = client("http://127.0.0.1:1")
        .rename_cluster("orders", "orders-backup")
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::Sdk { operation: "rename", .. }));
}
