//! # Repository Manager Client
//!
//! Every operation of the repository manager goes through a single RPC
//! endpoint (`POST /service/extdirect`). A call succeeds only when the JSON
//! answer carries `result.success == true`; the HTTP status is not consulted.
//! The client pauses after every call, whatever its outcome.

use crate::error::ProvisionResult;
use crate::generator::IdGenerator;
use crate::outcome::Outcome;
use crate::pacing::PacingPolicy;
use crate::transport::build_http_client;
use async_trait::async_trait;
use config::RepositoryEndpointConfig;
use reqwest::Client;
use schema::{RepoUser, Repository, RepositoryKind, Role};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

const RPC_PATH: &str = "/service/extdirect";

const REPOSITORY_ACTION: &str = "coreui_Repository";
const ROLE_ACTION: &str = "coreui_Role";
const USER_ACTION: &str = "coreui_User";

/// ExtDirect request envelope.
#[derive(Debug, Serialize)]
pub struct RpcRequest {
    pub action: &'static str,
    pub method: &'static str,
    pub data: Value,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub tid: u32,
}

#[async_trait]
pub trait RepositoryApi: Send + Sync {
    fn endpoint(&self) -> &str;

    async fn create_repository(&self, repository: &Repository) -> Outcome;

    async fn delete_repository(&self, repository: &Repository) -> Outcome;

    async fn create_role(&self, role: &Role) -> Outcome;

    async fn delete_role(&self, role: &Role) -> Outcome;

    async fn create_user(&self, user: &RepoUser) -> Outcome;

    async fn delete_user(&self, user: &RepoUser) -> Outcome;
}

pub struct HttpRepositoryClient {
    client: Client,
    base_url: String,
    user: String,
    password: String,
    ids: Arc<dyn IdGenerator>,
    pacing: PacingPolicy,
}

impl HttpRepositoryClient {
    pub fn new(
        base_url: &str,
        config: &RepositoryEndpointConfig,
        ids: Arc<dyn IdGenerator>,
    ) -> ProvisionResult<Self> {
        Ok(Self {
            client: build_http_client(&config.endpoint)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            user: config.endpoint.user.clone(),
            password: config.endpoint.password.clone(),
            ids,
            pacing: PacingPolicy::from_millis(config.call_delay_ms),
        })
    }

    pub fn with_pacing(mut self, pacing: PacingPolicy) -> Self {
        self.pacing = pacing;
        self
    }

    fn request(&self, action: &'static str, method: &'static str, data: Value) -> RpcRequest {
        RpcRequest {
            action,
            method,
            data,
            kind: "rpc",
            tid: self.ids.transaction_id(),
        }
    }

    async fn call(&self, request: RpcRequest) -> Outcome {
        let url = format!("{}{}", self.base_url, RPC_PATH);
        let response = self
            .client
            .post(&url)
            .basic_auth(&self.user, Some(&self.password))
            .json(&request)
            .send()
            .await;

        let outcome = match response {
            Ok(response) => match response.json::<Value>().await {
                Ok(body) => rpc_outcome(&body),
                Err(e) => Outcome::Failure(format!("invalid RPC response: {e}")),
            },
            Err(e) => Outcome::Failure(e.to_string()),
        };

        debug!(
            action = request.action,
            method = request.method,
            tid = request.tid,
            %outcome,
            "Repository RPC finished"
        );

        self.pacing.pause().await;
        outcome
    }
}

fn rpc_outcome(body: &Value) -> Outcome {
    match body.pointer("/result/success") {
        Some(Value::Bool(true)) => Outcome::Success,
        Some(_) => Outcome::Failure("RPC reported no success".to_string()),
        None => Outcome::Failure("RPC response without result.success".to_string()),
    }
}

/// Creation payload for a hosted repository.
pub fn repository_payload(repository: &Repository) -> Value {
    match repository.kind {
        RepositoryKind::Docker { port } => json!({
            "attributes": {
                "docker": {
                    "httpsPort": port,
                    "forceBasicAuth": "true",
                    "v1Enabled": "true"
                },
                "storage": {
                    "blobStoreName": "default",
                    "strictContentTypeValidation": "true",
                    "writePolicy": "ALLOW"
                },
                "cleanup": {
                    "policyName": "None"
                }
            },
            "name": repository.name,
            "format": "",
            "type": "",
            "url": "",
            "online": "true",
            "undefined": ["false", "true"],
            "recipe": "docker-hosted"
        }),
        RepositoryKind::Raw => json!({
            "attributes": {
                "storage": {
                    "blobStoreName": "default",
                    "strictContentTypeValidation": "false",
                    "writePolicy": "ALLOW"
                },
                "cleanup": {
                    "policyName": "None"
                }
            },
            "name": repository.name,
            "format": "",
            "type": "",
            "url": "",
            "online": "true",
            "recipe": "raw-hosted"
        }),
    }
}

pub fn role_payload(role: &Role) -> Value {
    json!({
        "version": "",
        "source": "default",
        "id": role.name,
        "name": role.name,
        "description": role.name,
        "privileges": role.privileges,
        "roles": role.contained_roles
    })
}

pub fn user_payload(user: &RepoUser, password: &str) -> Value {
    json!({
        "userId": user.name,
        "version": "",
        "firstName": user.name,
        "lastName": user.name,
        "email": format!("{}@no.email", user.name),
        "status": "active",
        "roles": user.roles,
        "password": password
    })
}

#[async_trait]
impl RepositoryApi for HttpRepositoryClient {
    fn endpoint(&self) -> &str {
        &self.base_url
    }

    async fn create_repository(&self, repository: &Repository) -> Outcome {
        info!(
            name = %repository.name,
            kind = repository.kind.as_str(),
            "Creating repository"
        );
        let request = self.request(
            REPOSITORY_ACTION,
            "create",
            json!([repository_payload(repository)]),
        );
        let outcome = self.call(request).await;
        if !outcome.is_success() {
            error!(name = %repository.name, %outcome, "Creating repository failed");
        }
        outcome
    }

    async fn delete_repository(&self, repository: &Repository) -> Outcome {
        info!(
            name = %repository.name,
            kind = repository.kind.as_str(),
            "Deleting repository"
        );
        let request = self.request(REPOSITORY_ACTION, "remove", json!([repository.name]));
        let outcome = self.call(request).await;
        if !outcome.is_success() {
            error!(name = %repository.name, %outcome, "Deleting repository failed");
        }
        outcome
    }

    async fn create_role(&self, role: &Role) -> Outcome {
        info!(name = %role.name, "Creating role");
        let request = self.request(ROLE_ACTION, "create", json!([role_payload(role)]));
        let outcome = self.call(request).await;
        if !outcome.is_success() {
            error!(name = %role.name, %outcome, "Creating role failed");
        }
        outcome
    }

    async fn delete_role(&self, role: &Role) -> Outcome {
        info!(name = %role.name, "Deleting role");
        let request = self.request(ROLE_ACTION, "remove", json!([role.name]));
        let outcome = self.call(request).await;
        if !outcome.is_success() {
            error!(name = %role.name, %outcome, "Deleting role failed");
        }
        outcome
    }

    async fn create_user(&self, user: &RepoUser) -> Outcome {
        info!(name = %user.name, "Creating user");
        warn!(
            name = %user.name,
            "Generated user password is not stored; reset it in the repository manager"
        );
        let password = self.ids.credential();
        let request = self.request(USER_ACTION, "create", json!([user_payload(user, &password)]));
        let outcome = self.call(request).await;
        if !outcome.is_success() {
            error!(name = %user.name, %outcome, "Creating user failed");
        }
        outcome
    }

    async fn delete_user(&self, user: &RepoUser) -> Outcome {
        info!(name = %user.name, "Deleting user");
        let request = self.request(USER_ACTION, "remove", json!([user.name, "default"]));
        let outcome = self.call(request).await;
        if !outcome.is_success() {
            error!(name = %user.name, %outcome, "Deleting user failed");
        }
        outcome
    }
}
