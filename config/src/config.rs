//! # Platform Configuration Structures
//!
//! One configuration document exists per platform. Each document maps a
//! cluster name to the endpoint settings of that platform for the cluster:
//!
//! ```yaml
//! dcos_tru:
//!   url:
//!     - https://master1.example.com
//!     - https://master2.example.com
//!   user: provisioner
//!   password: secret
//!   tls_verify: false
//! ```
//!
//! All structures:
//! - Use `serde` for deserialization, with defaults for every optional field
//! - Use `validator` for input validation
//! - Redact credentials from `Debug` output

use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{Display, EnumString};
use url::Url;
use validator::Validate;

/// Endpoint URL(s) of a platform: a single URL or a list of URLs that all
/// receive the same operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EndpointUrls {
    Single(String),
    Multiple(Vec<String>),
}

impl EndpointUrls {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let urls: &[String] = match self {
            EndpointUrls::Single(url) => std::slice::from_ref(url),
            EndpointUrls::Multiple(urls) => urls,
        };
        urls.iter().map(|u| u.trim_end_matches('/'))
    }

    pub fn len(&self) -> usize {
        match self {
            EndpointUrls::Single(_) => 1,
            EndpointUrls::Multiple(urls) => urls.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Connection settings shared by both platforms.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Describes how to reach and authenticate against one platform of one
/// cluster.
///
/// ## Fields
/// - `url`: Endpoint URL or list of URLs (required, http or https)
/// - `user`: API user (required)
/// - `password`: API password (required, redacted in `Debug`)
/// - `tls_verify`: Verify server certificates (default: true)
/// - `timeout_seconds`: Per-request timeout (default: 30, range: 1-300)
#[derive(Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct PlatformCredentials {
    #[validate(custom(function = "validate_urls"))]
    pub url: EndpointUrls,

    #[validate(length(min = 1))]
    pub user: String,

    #[validate(length(min = 1))]
    pub password: String,

    #[serde(default = "default_tls_verify")]
    pub tls_verify: bool,

    #[serde(default = "default_timeout_seconds")]
    #[validate(range(min = 1, max = 300))]
    pub timeout_seconds: u64,
}

impl fmt::Debug for PlatformCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformCredentials")
            .field("url", &self.url)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("tls_verify", &self.tls_verify)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

fn default_tls_verify() -> bool {
    true
}

fn default_timeout_seconds() -> u64 {
    30
}

fn validate_urls(urls: &EndpointUrls) -> Result<(), validator::ValidationError> {
    if urls.is_empty() {
        return Err(validator::ValidationError::new("No endpoint URL configured"));
    }

    for url in urls.iter() {
        match Url::parse(url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") && parsed.has_host() => {}
            _ => return Err(validator::ValidationError::new("Invalid endpoint URL")),
        }
    }

    Ok(())
}

/// What a cluster pass does when no API token can be obtained.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AuthFailurePolicy {
    /// Skip every operation against the endpoint and report failure.
    #[default]
    Abort,
    /// Continue with an empty token; every call will most likely be rejected.
    Proceed,
}

/// Cluster orchestrator settings for one cluster.
///
/// # M-CANONICAL-DOCS
///
/// ## Fields
/// - `url`, `user`, `password`, `tls_verify`, `timeout_seconds`: see
///   [`PlatformCredentials`]
/// - `orchestrator`: Service name of the app orchestrator behind
///   `/service/<orchestrator>` (default: "marathon")
/// - `on_auth_failure`: `abort` (default) or `proceed`
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct ClusterEndpointConfig {
    #[serde(flatten)]
    #[validate(nested)]
    pub endpoint: PlatformCredentials,

    #[serde(default = "default_orchestrator")]
    #[validate(length(min = 1, max = 63))]
    pub orchestrator: String,

    #[serde(default)]
    pub on_auth_failure: AuthFailurePolicy,
}

fn default_orchestrator() -> String {
    "marathon".to_string()
}

/// Repository manager settings for one cluster.
///
/// # M-CANONICAL-DOCS
///
/// ## Fields
/// - `url`, `user`, `password`, `tls_verify`, `timeout_seconds`: see
///   [`PlatformCredentials`]
/// - `call_delay_ms`: Pause after every RPC call (default: 1000, max: 60000)
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct RepositoryEndpointConfig {
    #[serde(flatten)]
    #[validate(nested)]
    pub endpoint: PlatformCredentials,

    #[serde(default = "default_call_delay_ms")]
    #[validate(range(max = 60000))]
    pub call_delay_ms: u64,
}

fn default_call_delay_ms() -> u64 {
    1000
}
