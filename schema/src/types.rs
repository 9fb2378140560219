use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Deployment classification of a cluster endpoint.
///
/// Selects which permission table applies to a user group.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Tier {
    Prod,
    NonProd,
}

/// Role tag carried by a cluster user group.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GroupRole {
    Dev,
    Devops,
}

/// Action verb of an ACL grant. The `Display` form is the URL path segment.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
    Full,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildGroup {
    pub id: String,
}

/// Top-level orchestrator group of a context. Serializes to the group
/// creation payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceGroup {
    pub id: String,
    pub groups: Vec<ChildGroup>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserGroup {
    pub gid: String,
    pub role: GroupRole,
}

/// One resource id pattern and the actions granted on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGrant {
    pub resource: String,
    pub actions: Vec<Action>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleGrants {
    pub dev: Vec<PermissionGrant>,
    pub devops: Vec<PermissionGrant>,
}

impl RoleGrants {
    pub fn get(&self, role: GroupRole) -> &[PermissionGrant] {
        match role {
            GroupRole::Dev => &self.dev,
            GroupRole::Devops => &self.devops,
        }
    }
}

/// Permission grants for every `(tier, role)` pair of a context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionTables {
    pub prod: RoleGrants,
    pub non_prod: RoleGrants,
}

impl PermissionTables {
    pub fn get(&self, tier: Tier, role: GroupRole) -> &[PermissionGrant] {
        match tier {
            Tier::Prod => self.prod.get(role),
            Tier::NonProd => self.non_prod.get(role),
        }
    }
}

/// Desired state of a context on the cluster orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterSchema {
    pub service_group: ServiceGroup,
    pub user_groups: Vec<UserGroup>,
    pub grants: PermissionTables,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RepositoryKind {
    Docker { port: u16 },
    Raw,
}

impl RepositoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepositoryKind::Docker { .. } => "docker",
            RepositoryKind::Raw => "raw",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    #[serde(flatten)]
    pub kind: RepositoryKind,
}

/// Repository-manager role. `contained_roles` must exist before this role
/// is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub name: String,
    pub privileges: Vec<String>,
    pub contained_roles: Vec<String>,
}

/// Repository-manager user. The password is generated at creation time and
/// is not part of the desired state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoUser {
    pub name: String,
    pub roles: Vec<String>,
}

/// Desired state of a context on the repository manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySchema {
    pub repositories: Vec<Repository>,
    pub roles: Vec<Role>,
    pub users: Vec<RepoUser>,
}
