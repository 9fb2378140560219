//! # Reconciler
//!
//! Walks a desired-state document against one platform endpoint, strictly in
//! sequence. Every entity is attempted exactly once; a failed entity never
//! stops the pass. The aggregate result of a pass is the logical AND of all
//! its outcomes and is reported through [`PassReport`].

use crate::cluster::ClusterApi;
use crate::outcome::Outcome;
use crate::repository::RepositoryApi;
use schema::{ClusterSchema, RepositorySchema, Tier, UserGroup, creation_order};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Operation {
    Apply,
    Destroy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Platform {
    Cluster,
    Repository,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassFailure {
    pub entity_type: String,
    pub entity_id: String,
    pub error: String,
}

/// Result of one pass against one endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassReport {
    pub platform: Platform,
    pub operation: Operation,
    pub endpoint: String,
    pub attempted: u32,
    pub failures: Vec<PassFailure>,
    /// Set when the pass never reached the endpoint's entities.
    pub aborted: Option<String>,
}

impl PassReport {
    pub fn new(platform: Platform, operation: Operation, endpoint: &str) -> Self {
        Self {
            platform,
            operation,
            endpoint: endpoint.to_string(),
            attempted: 0,
            failures: Vec::new(),
            aborted: None,
        }
    }

    pub fn record(&mut self, entity_type: &str, entity_id: &str, outcome: &Outcome) {
        self.attempted += 1;
        if let Outcome::Failure(reason) = outcome {
            self.add_failure(entity_type, entity_id, reason);
        }
    }

    pub fn add_failure(&mut self, entity_type: &str, entity_id: &str, error: impl ToString) {
        self.failures.push(PassFailure {
            entity_type: entity_type.to_string(),
            entity_id: entity_id.to_string(),
            error: error.to_string(),
        });
    }

    pub fn abort(&mut self, reason: impl ToString) {
        self.aborted = Some(reason.to_string());
    }

    pub fn succeeded(&self) -> bool {
        self.failures.is_empty() && self.aborted.is_none()
    }

    pub fn log_summary(&self) {
        if self.succeeded() {
            info!(
                platform = %self.platform,
                operation = %self.operation,
                endpoint = %self.endpoint,
                attempted = self.attempted,
                "Pass completed"
            );
        } else {
            error!(
                platform = %self.platform,
                operation = %self.operation,
                endpoint = %self.endpoint,
                attempted = self.attempted,
                failed = self.failures.len(),
                aborted = self.aborted.as_deref().unwrap_or("no"),
                "Pass completed with failures"
            );
        }
    }
}

/// Authenticated view of one cluster endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterSession {
    pub token: String,
    pub tier: Tier,
}

pub async fn apply_repository(api: &dyn RepositoryApi, schema: &RepositorySchema) -> PassReport {
    let mut report = PassReport::new(Platform::Repository, Operation::Apply, api.endpoint());

    for repository in &schema.repositories {
        let outcome = api.create_repository(repository).await;
        report.record("repository", &repository.name, &outcome);
    }

    let order = creation_order(&schema.roles);
    if order.has_cycle() {
        let names: Vec<&str> = order.cyclic.iter().map(|r| r.name.as_str()).collect();
        warn!(roles = ?names, "Role containment cycle, creating remaining roles lexically");
        report.add_failure("role", &names.join(","), "containment cycle");
    }
    for role in order.creation() {
        let outcome = api.create_role(role).await;
        report.record("role", &role.name, &outcome);
    }

    for user in &schema.users {
        let outcome = api.create_user(user).await;
        report.record("user", &user.name, &outcome);
    }

    report.log_summary();
    report
}

pub async fn destroy_repository(api: &dyn RepositoryApi, schema: &RepositorySchema) -> PassReport {
    let mut report = PassReport::new(Platform::Repository, Operation::Destroy, api.endpoint());

    for repository in &schema.repositories {
        let outcome = api.delete_repository(repository).await;
        report.record("repository", &repository.name, &outcome);
    }

    let order = creation_order(&schema.roles);
    if order.has_cycle() {
        let names: Vec<&str> = order.cyclic.iter().map(|r| r.name.as_str()).collect();
        warn!(roles = ?names, "Role containment cycle, deleting remaining roles lexically");
        report.add_failure("role", &names.join(","), "containment cycle");
    }
    for role in order.removal() {
        let outcome = api.delete_role(role).await;
        report.record("role", &role.name, &outcome);
    }

    for user in &schema.users {
        let outcome = api.delete_user(user).await;
        report.record("user", &user.name, &outcome);
    }

    report.log_summary();
    report
}

async fn create_group_with_grants(
    api: &dyn ClusterApi,
    session: &ClusterSession,
    schema: &ClusterSchema,
    group: &UserGroup,
    report: &mut PassReport,
) {
    let outcome = api.create_user_group(&session.token, group).await;
    report.record("user_group", &group.gid, &outcome);

    let grants = schema.grants.get(session.tier, group.role);
    info!(
        gid = %group.gid,
        tier = %session.tier,
        role = %group.role,
        resources = grants.len(),
        "Selected permission table"
    );
    let outcome = api
        .create_permission_grants(&session.token, &group.gid, grants)
        .await;
    report.record("permissions", &group.gid, &outcome);
}

pub async fn apply_cluster(
    api: &dyn ClusterApi,
    session: &ClusterSession,
    schema: &ClusterSchema,
) -> PassReport {
    let mut report = PassReport::new(Platform::Cluster, Operation::Apply, api.endpoint());

    let outcome = api
        .create_service_group(&session.token, &schema.service_group)
        .await;
    report.record("service_group", &schema.service_group.id, &outcome);

    for group in &schema.user_groups {
        create_group_with_grants(api, session, schema, group, &mut report).await;
    }

    report.log_summary();
    report
}

/// Removes the service group and the user groups. Grants disappear with
/// their group and are not revoked one by one.
pub async fn destroy_cluster(
    api: &dyn ClusterApi,
    session: &ClusterSession,
    schema: &ClusterSchema,
) -> PassReport {
    let mut report = PassReport::new(Platform::Cluster, Operation::Destroy, api.endpoint());

    let outcome = api
        .delete_service_group(&session.token, &schema.service_group.id)
        .await;
    report.record("service_group", &schema.service_group.id, &outcome);

    for group in &schema.user_groups {
        let outcome = api.delete_user_group(&session.token, &group.gid).await;
        report.record("user_group", &group.gid, &outcome);
    }

    report.log_summary();
    report
}

/// Creates one extra user group of a context together with the grants of
/// its role for the session's tier.
pub async fn add_user_group(
    api: &dyn ClusterApi,
    session: &ClusterSession,
    schema: &ClusterSchema,
    group: &UserGroup,
) -> PassReport {
    let mut report = PassReport::new(Platform::Cluster, Operation::Apply, api.endpoint());
    create_group_with_grants(api, session, schema, group, &mut report).await;
    report.log_summary();
    report
}

pub async fn remove_user_group(
    api: &dyn ClusterApi,
    session: &ClusterSession,
    gid: &str,
) -> PassReport {
    let mut report = PassReport::new(Platform::Cluster, Operation::Destroy, api.endpoint());
    let outcome = api.delete_user_group(&session.token, gid).await;
    report.record("user_group", gid, &outcome);
    report.log_summary();
    report
}
