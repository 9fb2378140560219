//! # Context Schema
//!
//! Pure desired-state generation for a provisioning context.
//!
//! This crate provides:
//! - The value types that describe every resource of a context
//! - The generators mapping `(context_name, port)` to desired-state documents
//! - The literal permission tables keyed by tier and group role
//! - The tier classifier for cluster endpoints
//! - Dependency ordering for repository roles
//!
//! Nothing in here performs I/O.

pub mod generator;
pub mod grants;
pub mod order;
pub mod tier;
pub mod types;

pub use generator::{generate_cluster_schema, generate_repository_schema};
pub use order::{RoleOrder, creation_order};
pub use tier::{TierClassifier, classify};
pub use types::{
    Action, ChildGroup, ClusterSchema, GroupRole, PermissionGrant, PermissionTables, RepoUser,
    Repository, RepositoryKind, RepositorySchema, Role, RoleGrants, ServiceGroup, Tier, UserGroup,
};
