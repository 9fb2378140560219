use config::{
    AuthFailurePolicy, ClusterEndpointConfig, EndpointUrls, PlatformCredentials,
    RepositoryEndpointConfig,
};
use provision::{FixedIdGenerator, Operation, ProvisionService};
use schema::{
    GroupRole, Tier, TierClassifier, UserGroup, generate_cluster_schema,
    generate_repository_schema,
};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{header, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn credentials(urls: Vec<String>) -> PlatformCredentials {
    PlatformCredentials {
        url: EndpointUrls::Multiple(urls),
        user: "provisioner".to_string(),
        password: "secret".to_string(),
        tls_verify: true,
        timeout_seconds: 5,
    }
}

fn cluster_config(url: &str, on_auth_failure: AuthFailurePolicy) -> ClusterEndpointConfig {
    ClusterEndpointConfig {
        endpoint: credentials(vec![url.to_string()]),
        orchestrator: "marathon".to_string(),
        on_auth_failure,
    }
}

/// Treats the local mock server as a non-production cluster.
fn local_non_prod_service() -> ProvisionService {
    ProvisionService::new(
        Arc::new(FixedIdGenerator {
            transaction_id: 7,
            credential: "Abcdef123456".to_string(),
        }),
        TierClassifier::with_patterns([r"^127\.0\.0\.1$"]).unwrap(),
    )
}

async fn mount_login(server: &MockServer, status: u16) {
    let response = if status == 200 {
        ResponseTemplate::new(200).set_body_json(json!({ "token": "abc123" }))
    } else {
        ResponseTemplate::new(status)
    };
    Mock::given(method("POST"))
        .and(path("/acs/api/v1/auth/login"))
        .respond_with(response)
        .mount(server)
        .await;
}

fn attachment_count(tier: Tier, role: GroupRole) -> u64 {
    generate_cluster_schema("demo")
        .grants
        .get(tier, role)
        .iter()
        .map(|grant| grant.actions.len() as u64)
        .sum()
}

#[tokio::test]
async fn test_apply_cluster_is_idempotent_against_existing_state() {
    let mock_server = MockServer::start().await;
    mount_login(&mock_server, 200).await;

    Mock::given(method("POST"))
        .and(path("/service/marathon/v2/groups"))
        .and(header("Authorization", "token=abc123"))
        .respond_with(ResponseTemplate::new(409))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("PUT"))
        .and(path_regex(r"^/acs/api/v1/groups/(dev|devops)_demo$"))
        .respond_with(ResponseTemplate::new(409))
        .expect(2)
        .mount(&mock_server)
        .await;
    Mock::given(method("PUT"))
        .and(path_regex(r"^/acs/api/v1/acls/[^/]+$"))
        .respond_with(ResponseTemplate::new(409))
        .mount(&mock_server)
        .await;
    Mock::given(method("PUT"))
        .and(path_regex(r"^/acs/api/v1/acls/[^/]+/groups/dev_demo/[a-z]+$"))
        .respond_with(ResponseTemplate::new(409))
        .expect(attachment_count(Tier::NonProd, GroupRole::Dev))
        .mount(&mock_server)
        .await;
    Mock::given(method("PUT"))
        .and(path_regex(r"^/acs/api/v1/acls/[^/]+/groups/devops_demo/[a-z]+$"))
        .respond_with(ResponseTemplate::new(409))
        .expect(attachment_count(Tier::NonProd, GroupRole::Devops))
        .mount(&mock_server)
        .await;

    let config = cluster_config(&mock_server.uri(), AuthFailurePolicy::Abort);
    let summary = local_non_prod_service()
        .cluster_pass(&config, &generate_cluster_schema("demo"), Operation::Apply)
        .await;

    assert!(summary.succeeded());
    assert_eq!(summary.reports.len(), 1);
    assert_eq!(summary.reports[0].attempted, 5);
}

#[tokio::test]
async fn test_prod_endpoint_uses_prod_tables() {
    let mock_server = MockServer::start().await;
    mount_login(&mock_server, 200).await;

    Mock::given(method("POST"))
        .and(path("/service/marathon/v2/groups"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&mock_server)
        .await;
    Mock::given(method("PUT"))
        .and(path_regex(r"^/acs/api/v1/groups/[^/]+$"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&mock_server)
        .await;
    Mock::given(method("PUT"))
        .and(path_regex(r"^/acs/api/v1/acls/[^/]+$"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&mock_server)
        .await;
    Mock::given(method("PUT"))
        .and(path_regex(r"^/acs/api/v1/acls/[^/]+/groups/dev_demo/[a-z]+$"))
        .respond_with(ResponseTemplate::new(204))
        .expect(attachment_count(Tier::Prod, GroupRole::Dev))
        .mount(&mock_server)
        .await;
    Mock::given(method("PUT"))
        .and(path_regex(r"^/acs/api/v1/acls/[^/]+/groups/devops_demo/[a-z]+$"))
        .respond_with(ResponseTemplate::new(204))
        .expect(attachment_count(Tier::Prod, GroupRole::Devops))
        .mount(&mock_server)
        .await;

    let config = cluster_config(&mock_server.uri(), AuthFailurePolicy::Abort);
    let summary = ProvisionService::default()
        .cluster_pass(&config, &generate_cluster_schema("demo"), Operation::Apply)
        .await;

    assert!(summary.succeeded());
}

#[tokio::test]
async fn test_login_failure_aborts_pass() {
    let mock_server = MockServer::start().await;
    mount_login(&mock_server, 401).await;

    Mock::given(method("POST"))
        .and(path("/service/marathon/v2/groups"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = cluster_config(&mock_server.uri(), AuthFailurePolicy::Abort);
    let summary = local_non_prod_service()
        .cluster_pass(&config, &generate_cluster_schema("demo"), Operation::Apply)
        .await;

    assert!(!summary.succeeded());
    assert_eq!(summary.reports[0].attempted, 0);
    assert!(summary.reports[0].aborted.is_some());
    assert_eq!(summary.reports[0].operation, Operation::Apply);
}

#[tokio::test]
async fn test_login_failure_can_proceed_without_token() {
    let mock_server = MockServer::start().await;
    mount_login(&mock_server, 401).await;

    Mock::given(method("DELETE"))
        .and(path("/service/marathon/v2/groups/demo"))
        .and(header("Authorization", "token="))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path_regex(r"^/acs/api/v1/groups/(dev|devops)_demo$"))
        .respond_with(ResponseTemplate::new(204))
        .expect(2)
        .mount(&mock_server)
        .await;

    let config = cluster_config(&mock_server.uri(), AuthFailurePolicy::Proceed);
    let summary = local_non_prod_service()
        .cluster_pass(&config, &generate_cluster_schema("demo"), Operation::Destroy)
        .await;

    assert!(summary.succeeded());
    assert_eq!(summary.reports[0].attempted, 3);
}

#[tokio::test]
async fn test_repository_pass_runs_against_every_url() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;

    for server in [&first, &second] {
        Mock::given(method("POST"))
            .and(path("/service/extdirect"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "result": { "success": true } })),
            )
            .expect(6)
            .mount(server)
            .await;
    }

    let config = RepositoryEndpointConfig {
        endpoint: credentials(vec![first.uri(), second.uri()]),
        call_delay_ms: 0,
    };
    let summary = local_non_prod_service()
        .repository_pass(&config, &generate_repository_schema("demo", 50001), Operation::Apply)
        .await;

    assert!(summary.succeeded());
    assert_eq!(summary.reports.len(), 2);
    assert_eq!(summary.reports[1].endpoint, second.uri());
}

#[tokio::test]
async fn test_repository_failure_on_one_url_fails_summary() {
    let healthy = MockServer::start().await;
    let broken = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/service/extdirect"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "result": { "success": true } })),
        )
        .mount(&healthy)
        .await;
    Mock::given(method("POST"))
        .and(path("/service/extdirect"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "result": { "success": false } })),
        )
        .expect(6)
        .mount(&broken)
        .await;

    let config = RepositoryEndpointConfig {
        endpoint: credentials(vec![broken.uri(), healthy.uri()]),
        call_delay_ms: 0,
    };
    let summary = local_non_prod_service()
        .repository_pass(&config, &generate_repository_schema("demo", 50001), Operation::Destroy)
        .await;

    assert!(!summary.succeeded());
    assert_eq!(summary.failed_passes(), 1);
    assert_eq!(summary.reports[0].failures.len(), 6);
    assert!(summary.reports[1].succeeded());
}

#[tokio::test]
async fn test_group_pass_adds_group_with_role_grants() {
    let mock_server = MockServer::start().await;
    mount_login(&mock_server, 200).await;

    Mock::given(method("PUT"))
        .and(path("/acs/api/v1/groups/qa_demo"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("PUT"))
        .and(path_regex(r"^/acs/api/v1/acls/[^/]+$"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&mock_server)
        .await;
    Mock::given(method("PUT"))
        .and(path_regex(r"^/acs/api/v1/acls/[^/]+/groups/qa_demo/[a-z]+$"))
        .respond_with(ResponseTemplate::new(204))
        .expect(attachment_count(Tier::NonProd, GroupRole::Dev))
        .mount(&mock_server)
        .await;

    let group = UserGroup {
        gid: "qa_demo".to_string(),
        role: GroupRole::Dev,
    };
    let config = cluster_config(&mock_server.uri(), AuthFailurePolicy::Abort);
    let summary = local_non_prod_service()
        .group_pass(&config, &generate_cluster_schema("demo"), &group, Operation::Apply)
        .await;

    assert!(summary.succeeded());
    assert_eq!(summary.reports[0].attempted, 2);
}

#[tokio::test]
async fn test_group_pass_remove_reports_real_outcome() {
    let mock_server = MockServer::start().await;
    mount_login(&mock_server, 200).await;

    Mock::given(method("DELETE"))
        .and(path("/acs/api/v1/groups/qa_demo"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let group = UserGroup {
        gid: "qa_demo".to_string(),
        role: GroupRole::Devops,
    };
    let config = cluster_config(&mock_server.uri(), AuthFailurePolicy::Abort);
    let summary = local_non_prod_service()
        .group_pass(&config, &generate_cluster_schema("demo"), &group, Operation::Destroy)
        .await;

    assert!(!summary.succeeded());
}
