//! # Configuration System
//!
//! Platform endpoint configuration for ctxprov.
//!
//! This crate provides:
//! - Configuration structures for the cluster orchestrator and the
//!   repository manager
//! - Configuration file loading (YAML/TOML), keyed by cluster name
//! - Configuration validation
//!
//! # Best Practices
//!
//! - Uses `validator` crate for input validation
//! - Provides clear error messages for invalid configuration
//! - Never prints credentials

pub mod config;
pub mod file_loader;

pub use config::{
    AuthFailurePolicy, ClusterEndpointConfig, EndpointUrls, PlatformCredentials,
    RepositoryEndpointConfig,
};
pub use file_loader::{ConfigFileError, load_document, load_platform_config};
pub use validator::Validate;
