use crate::error::{ProvisionError, ProvisionResult};
use crate::outcome::{
    CREATED_OR_EXISTS, NO_CONTENT_ONLY, NO_CONTENT_OR_EXISTS, OK_ONLY, Outcome, StatusPolicy,
};
use crate::transport::build_http_client;
use async_trait::async_trait;
use config::ClusterEndpointConfig;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder};
use schema::{PermissionGrant, ServiceGroup, UserGroup};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error, info, warn};

/// `/` inside a resource id as it must appear in an ACL URL. The platform
/// decodes nested identifiers twice.
pub const DOUBLE_ESCAPED_SLASH: &str = "%252F";

pub fn escape_resource_id(resource: &str) -> String {
    resource.replace('/', DOUBLE_ESCAPED_SLASH)
}

/// Operations on the cluster orchestrator and its access control service.
#[async_trait]
pub trait ClusterApi: Send + Sync {
    fn endpoint(&self) -> &str;

    async fn login(&self, user: &str, password: &str) -> ProvisionResult<String>;

    async fn create_service_group(&self, token: &str, group: &ServiceGroup) -> Outcome;

    async fn delete_service_group(&self, token: &str, id: &str) -> Outcome;

    async fn create_user_group(&self, token: &str, group: &UserGroup) -> Outcome;

    async fn delete_user_group(&self, token: &str, gid: &str) -> Outcome;

    /// Registers every resource of `grants` and attaches each
    /// `(resource, action)` pair to `gid`. Only attachment failures count.
    async fn create_permission_grants(
        &self,
        token: &str,
        gid: &str,
        grants: &[PermissionGrant],
    ) -> Outcome;
}

pub struct HttpClusterClient {
    client: Client,
    base_url: String,
    orchestrator: String,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

impl HttpClusterClient {
    pub fn new(base_url: &str, config: &ClusterEndpointConfig) -> ProvisionResult<Self> {
        Ok(Self {
            client: build_http_client(&config.endpoint)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            orchestrator: config.orchestrator.clone(),
        })
    }

    fn groups_url(&self) -> String {
        format!("{}/service/{}/v2/groups", self.base_url, self.orchestrator)
    }

    fn user_group_url(&self, gid: &str) -> String {
        format!("{}/acs/api/v1/groups/{}", self.base_url, gid)
    }

    fn acl_url(&self, resource: &str) -> String {
        format!(
            "{}/acs/api/v1/acls/{}",
            self.base_url,
            escape_resource_id(resource),
        )
    }

    async fn send(&self, request: RequestBuilder, token: &str, policy: &StatusPolicy) -> Outcome {
        let response = request
            .header(AUTHORIZATION, format!("token={}", token))
            .send()
            .await;

        match response {
            Ok(response) => {
                let status = response.status().as_u16();
                debug!(url = %response.url(), status, "Cluster API response");
                Outcome::from_status(status, policy)
            }
            Err(e) => Outcome::Failure(e.to_string()),
        }
    }
}

#[async_trait]
impl ClusterApi for HttpClusterClient {
    fn endpoint(&self) -> &str {
        &self.base_url
    }

    async fn login(&self, user: &str, password: &str) -> ProvisionResult<String> {
        let url = format!("{}/acs/api/v1/auth/login", self.base_url);
        info!(url = %url, "Requesting cluster API token");

        let response = self
            .client
            .post(&url)
            .basic_auth(user, Some(password))
            .json(&json!({ "uid": user, "password": password }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProvisionError::authentication(
                &self.base_url,
                format!("login returned status {}", status.as_u16()),
            ));
        }

        let body: LoginResponse = response
            .json()
            .await
            .map_err(|e| ProvisionError::authentication(&self.base_url, e))?;

        Ok(body.token)
    }

    async fn create_service_group(&self, token: &str, group: &ServiceGroup) -> Outcome {
        info!(id = %group.id, "Creating service group");
        let request = self.client.post(self.groups_url()).json(group);
        let outcome = self.send(request, token, &CREATED_OR_EXISTS).await;
        if !outcome.is_success() {
            error!(id = %group.id, %outcome, "Creating service group failed");
        }
        outcome
    }

    async fn delete_service_group(&self, token: &str, id: &str) -> Outcome {
        info!(id = %id, "Deleting service group");
        let url = format!("{}/{}", self.groups_url(), id.trim_start_matches('/'));
        let outcome = self.send(self.client.delete(url), token, &OK_ONLY).await;
        if !outcome.is_success() {
            error!(id = %id, %outcome, "Deleting service group failed");
        }
        outcome
    }

    async fn create_user_group(&self, token: &str, group: &UserGroup) -> Outcome {
        info!(gid = %group.gid, role = %group.role, "Creating user group");
        let request = self
            .client
            .put(self.user_group_url(&group.gid))
            .json(&json!({ "description": group.gid }));
        let outcome = self.send(request, token, &CREATED_OR_EXISTS).await;
        if !outcome.is_success() {
            error!(gid = %group.gid, %outcome, "Creating user group failed");
        }
        outcome
    }

    async fn delete_user_group(&self, token: &str, gid: &str) -> Outcome {
        info!(gid = %gid, "Deleting user group");
        let request = self.client.delete(self.user_group_url(gid));
        let outcome = self.send(request, token, &NO_CONTENT_ONLY).await;
        if !outcome.is_success() {
            error!(gid = %gid, %outcome, "Deleting user group failed");
        }
        outcome
    }

    async fn create_permission_grants(
        &self,
        token: &str,
        gid: &str,
        grants: &[PermissionGrant],
    ) -> Outcome {
        info!(gid = %gid, resources = grants.len(), "Creating permissions for user group");

        // A resource may already be registered by a sibling group's grant.
        for grant in grants {
            let request = self
                .client
                .put(self.acl_url(&grant.resource))
                .json(&json!({ "description": grant.resource }));
            let outcome = self.send(request, token, &CREATED_OR_EXISTS).await;
            if !outcome.is_success() {
                warn!(resource = %grant.resource, %outcome, "Registering ACL resource failed");
            }
        }

        let mut result = Outcome::BenignConflict;
        for grant in grants {
            for action in &grant.actions {
                let url = format!("{}/groups/{}/{}", self.acl_url(&grant.resource), gid, action);
                let request = self.client.put(url).json(&json!({}));
                let outcome = self.send(request, token, &NO_CONTENT_OR_EXISTS).await;
                if !outcome.is_success() {
                    error!(
                        gid = %gid,
                        resource = %grant.resource,
                        action = %action,
                        %outcome,
                        "Granting permission failed"
                    );
                }
                result = result.combine(outcome);
            }
        }

        if grants.is_empty() {
            result = Outcome::Success;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_resource_id() {
        assert_eq!(
            escape_resource_id("dcos:secrets:default:/demo/dev"),
            "dcos:secrets:default:%252Fdemo%252Fdev",
        );
        assert_eq!(
            escape_resource_id("dcos:adminrouter:ops:mesos"),
            "dcos:adminrouter:ops:mesos",
        );
    }
}
