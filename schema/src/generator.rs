//! # Schema Generator
//!
//! Maps a context name (and the docker port of its image repository) to the
//! desired state on both platforms. Both functions are total and deterministic.

use crate::grants::permission_tables;
use crate::types::{
    ChildGroup, ClusterSchema, GroupRole, RepoUser, Repository, RepositoryKind, RepositorySchema,
    Role, ServiceGroup, UserGroup,
};

/// Sub-groups created below the service group of every context.
pub const STAGES: &[&str] = &["dev", "lpt", "pen", "rc", "scrub", "uat"];

/// Desired repository-manager state for a context.
///
/// Produces a docker repository named after the context, a raw repository
/// `<name>-raw`, a read-only `<name>-dev` role, a `<name>-devops` role that
/// contains it, and one user per role.
pub fn generate_repository_schema(name: &str, port: u16) -> RepositorySchema {
    let dev_role = format!("{name}-dev");
    let devops_role = format!("{name}-devops");

    RepositorySchema {
        repositories: vec![
            Repository {
                name: name.to_string(),
                kind: RepositoryKind::Docker { port },
            },
            Repository {
                name: format!("{name}-raw"),
                kind: RepositoryKind::Raw,
            },
        ],
        roles: vec![
            Role {
                name: dev_role.clone(),
                privileges: vec![
                    format!("nx-repository-view-docker-{name}-browse"),
                    format!("nx-repository-view-docker-{name}-read"),
                    format!("nx-repository-view-raw-{name}-raw-browse"),
                    format!("nx-repository-view-raw-{name}-raw-read"),
                ],
                contained_roles: Vec::new(),
            },
            Role {
                name: devops_role.clone(),
                privileges: vec![
                    format!("nx-repository-admin-docker-{name}-*"),
                    format!("nx-repository-admin-raw-{name}-raw-*"),
                    format!("nx-repository-view-docker-{name}-*"),
                    format!("nx-repository-view-raw-{name}-raw-*"),
                ],
                contained_roles: vec![dev_role.clone()],
            },
        ],
        users: vec![
            RepoUser {
                name: format!("{name}_dev"),
                roles: vec![dev_role],
            },
            RepoUser {
                name: format!("{name}_devops"),
                roles: vec![devops_role],
            },
        ],
    }
}

/// Desired cluster state for a context: the service group with its stage
/// sub-groups, a `dev_<name>` and a `devops_<name>` user group, and the
/// permission tables of both tiers.
pub fn generate_cluster_schema(name: &str) -> ClusterSchema {
    let id = format!("/{name}");

    ClusterSchema {
        service_group: ServiceGroup {
            groups: STAGES
                .iter()
                .map(|stage| ChildGroup {
                    id: format!("{id}/{stage}"),
                })
                .collect(),
            id,
        },
        user_groups: vec![
            UserGroup {
                gid: format!("dev_{name}"),
                role: GroupRole::Dev,
            },
            UserGroup {
                gid: format!("devops_{name}"),
                role: GroupRole::Devops,
            },
        ],
        grants: permission_tables(name),
    }
}
