//! # Provisioning
//!
//! Platform clients and the reconciler that brings a cluster orchestrator and
//! a repository manager into the desired state of a context.
//!
//! This crate provides:
//! - [`HttpClusterClient`] for the orchestrator REST and ACL APIs
//! - [`HttpRepositoryClient`] for the repository manager RPC API
//! - The reconciliation passes in [`reconcile`]
//! - [`ProvisionService`], which runs passes against every configured URL
//!
//! All calls are issued one after the other; nothing runs concurrently.

pub mod cluster;
pub mod error;
pub mod generator;
pub mod outcome;
pub mod pacing;
pub mod reconcile;
pub mod repository;
pub mod service;
pub mod transport;

pub use cluster::{ClusterApi, HttpClusterClient, escape_resource_id};
pub use error::{ProvisionError, ProvisionResult};
pub use generator::{FixedIdGenerator, IdGenerator, RandomIdGenerator};
pub use outcome::{Outcome, StatusPolicy};
pub use pacing::PacingPolicy;
pub use reconcile::{ClusterSession, Operation, PassFailure, PassReport, Platform};
pub use repository::{HttpRepositoryClient, RepositoryApi};
pub use service::{ProvisionService, Summary};
