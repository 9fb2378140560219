use config::{AuthFailurePolicy, ClusterEndpointConfig, EndpointUrls, PlatformCredentials};
use provision::{ClusterApi, HttpClusterClient, Outcome};
use schema::{Action, ChildGroup, GroupRole, PermissionGrant, ServiceGroup, UserGroup};
use serde_json::json;
use wiremock::matchers::{basic_auth, body_json, header, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(url: &str) -> ClusterEndpointConfig {
    ClusterEndpointConfig {
        endpoint: PlatformCredentials {
            url: EndpointUrls::Single(url.to_string()),
            user: "provisioner".to_string(),
            password: "secret".to_string(),
            tls_verify: true,
            timeout_seconds: 5,
        },
        orchestrator: "marathon".to_string(),
        on_auth_failure: AuthFailurePolicy::Abort,
    }
}

fn client(server: &MockServer) -> HttpClusterClient {
    HttpClusterClient::new(&server.uri(), &config(&server.uri())).unwrap()
}

#[tokio::test]
async fn test_login_returns_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/acs/api/v1/auth/login"))
        .and(basic_auth("provisioner", "secret"))
        .and(body_json(json!({ "uid": "provisioner", "password": "secret" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "abc123" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let token = client(&mock_server)
        .login("provisioner", "secret")
        .await
        .unwrap();
    assert_eq!(token, "abc123");
}

#[tokio::test]
async fn test_login_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/acs/api/v1/auth/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let error = client(&mock_server)
        .login("provisioner", "wrong")
        .await
        .unwrap_err();
    assert!(error.is_authentication());
    assert!(error.to_string().contains("401"));
}

#[tokio::test]
async fn test_login_without_token_field() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/acs/api/v1/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "session": "x" })))
        .mount(&mock_server)
        .await;

    let error = client(&mock_server)
        .login("provisioner", "secret")
        .await
        .unwrap_err();
    assert!(error.is_authentication());
}

#[tokio::test]
async fn test_create_service_group_sends_token_and_body() {
    let mock_server = MockServer::start().await;
    let group = ServiceGroup {
        id: "/demo".to_string(),
        groups: vec![ChildGroup {
            id: "/demo/dev".to_string(),
        }],
    };

    Mock::given(method("POST"))
        .and(path("/service/marathon/v2/groups"))
        .and(header("Authorization", "token=abc123"))
        .and(body_json(json!({ "id": "/demo", "groups": [{ "id": "/demo/dev" }] })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    let outcome = client(&mock_server)
        .create_service_group("abc123", &group)
        .await;
    assert_eq!(outcome, Outcome::Success);
}

#[tokio::test]
async fn test_existing_entities_are_benign() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/service/marathon/v2/groups"))
        .respond_with(ResponseTemplate::new(409))
        .mount(&mock_server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/acs/api/v1/groups/dev_demo"))
        .and(body_json(json!({ "description": "dev_demo" })))
        .respond_with(ResponseTemplate::new(409))
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    let group = ServiceGroup {
        id: "/demo".to_string(),
        groups: Vec::new(),
    };
    let user_group = UserGroup {
        gid: "dev_demo".to_string(),
        role: GroupRole::Dev,
    };

    assert_eq!(
        client.create_service_group("t", &group).await,
        Outcome::BenignConflict,
    );
    assert_eq!(
        client.create_user_group("t", &user_group).await,
        Outcome::BenignConflict,
    );
}

#[tokio::test]
async fn test_delete_service_group_strips_leading_slash() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/service/marathon/v2/groups/demo"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let outcome = client(&mock_server)
        .delete_service_group("t", "/demo")
        .await;
    assert!(outcome.is_success());
}

#[tokio::test]
async fn test_delete_is_strict() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/service/marathon/v2/groups/demo"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/acs/api/v1/groups/dev_demo"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    assert!(!client.delete_service_group("t", "/demo").await.is_success());
    // The ACL service answers 204 on delete; 200 is not accepted.
    assert!(!client.delete_user_group("t", "dev_demo").await.is_success());
}

#[tokio::test]
async fn test_permission_grants_double_escape_resource_ids() {
    let mock_server = MockServer::start().await;
    let grants = vec![PermissionGrant {
        resource: "dcos:service:marathon:marathon:services:/demo".to_string(),
        actions: vec![Action::Read, Action::Update],
    }];
    let escaped = "/acs/api/v1/acls/dcos:service:marathon:marathon:services:%252Fdemo";

    Mock::given(method("PUT"))
        .and(path(escaped))
        .and(body_json(json!({ "description": "dcos:service:marathon:marathon:services:/demo" })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("PUT"))
        .and(path(format!("{escaped}/groups/dev_demo/read")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("PUT"))
        .and(path(format!("{escaped}/groups/dev_demo/update")))
        .respond_with(ResponseTemplate::new(409))
        .expect(1)
        .mount(&mock_server)
        .await;

    let outcome = client(&mock_server)
        .create_permission_grants("t", "dev_demo", &grants)
        .await;
    assert_eq!(outcome, Outcome::Success);
}

#[tokio::test]
async fn test_resource_registration_failure_is_not_fatal() {
    let mock_server = MockServer::start().await;
    let grants = vec![PermissionGrant {
        resource: "dcos:adminrouter:ops:mesos".to_string(),
        actions: vec![Action::Full],
    }];

    Mock::given(method("PUT"))
        .and(path("/acs/api/v1/acls/dcos:adminrouter:ops:mesos"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/acs/api/v1/acls/dcos:adminrouter:ops:mesos/groups/dev_demo/full"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let outcome = client(&mock_server)
        .create_permission_grants("t", "dev_demo", &grants)
        .await;
    assert!(outcome.is_success());
}

#[tokio::test]
async fn test_failed_attachment_fails_but_continues() {
    let mock_server = MockServer::start().await;
    let grants = vec![
        PermissionGrant {
            resource: "a".to_string(),
            actions: vec![Action::Read],
        },
        PermissionGrant {
            resource: "b".to_string(),
            actions: vec![Action::Read],
        },
    ];

    Mock::given(method("PUT"))
        .and(path_regex(r"^/acs/api/v1/acls/[ab]$"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&mock_server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/acs/api/v1/acls/a/groups/g/read"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/acs/api/v1/acls/b/groups/g/read"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let outcome = client(&mock_server)
        .create_permission_grants("t", "g", &grants)
        .await;
    assert!(!outcome.is_success());
}

#[tokio::test]
async fn test_custom_orchestrator_path() {
    let mock_server = MockServer::start().await;
    let mut config = config(&mock_server.uri());
    config.orchestrator = "marathon-user".to_string();

    Mock::given(method("DELETE"))
        .and(path("/service/marathon-user/v2/groups/demo"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpClusterClient::new(&mock_server.uri(), &config).unwrap();
    assert!(client.delete_service_group("t", "/demo").await.is_success());
}
