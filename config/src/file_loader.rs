//! # Configuration File Loading
//!
//! Loads the entry of one cluster from a platform configuration file.
//!
//! Supports automatic format detection based on file extension. Only the
//! requested cluster's entry is deserialized and validated, so a broken entry
//! for another cluster does not prevent loading.

use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;
use validator::Validate;

/// Configuration file loading error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse TOML: {0}")]
    TomlParse(String),

    #[error("Failed to parse YAML: {0}")]
    YamlParse(String),

    #[error("Config file has no extension")]
    NoExtension,

    #[error("Unsupported config file format: {0}")]
    UnsupportedFormat(String),

    #[error("Cluster {cluster} not found in {path} (available: {available:?})")]
    UnknownCluster {
        cluster: String,
        path: String,
        available: Vec<String>,
    },

    #[error("Invalid entry for cluster {cluster}: {reason}")]
    InvalidEntry { cluster: String, reason: String },

    #[error("Invalid settings for cluster {cluster}: {source}")]
    Validation {
        cluster: String,
        #[source]
        source: validator::ValidationErrors,
    },
}

type Document = BTreeMap<String, serde_json::Value>;

fn read(path: &Path) -> Result<String, ConfigFileError> {
    std::fs::read_to_string(path)
        .map_err(|_e| ConfigFileError::FileNotFound(path.display().to_string()))
}

fn parse_toml(contents: &str) -> Result<Document, ConfigFileError> {
    toml::from_str(contents).map_err(|e| ConfigFileError::TomlParse(e.to_string()))
}

fn parse_yaml(contents: &str) -> Result<Document, ConfigFileError> {
    serde_yaml::from_str(contents).map_err(|e| ConfigFileError::YamlParse(e.to_string()))
}

/// Parse a platform configuration file into its per-cluster entries.
///
/// ## Supported Formats
/// - `.toml`: TOML format
/// - `.yaml`: YAML format
/// - `.yml`: YAML format
pub fn load_document(path: &Path) -> Result<Document, ConfigFileError> {
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or(ConfigFileError::NoExtension)?;

    match extension.to_lowercase().as_str() {
        "toml" => parse_toml(&read(path)?),
        "yaml" | "yml" => parse_yaml(&read(path)?),
        other => Err(ConfigFileError::UnsupportedFormat(other.to_string())),
    }
}

/// Load and validate the settings of `cluster` from a platform configuration
/// file.
///
/// # M-CANONICAL-DOCS
///
/// ## Usage
/// ```rust,no_run
/// use config::{ClusterEndpointConfig, load_platform_config};
/// use std::path::Path;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let cfg: ClusterEndpointConfig =
///         load_platform_config(Path::new("/etc/ctxprov/dcos.yml"), "dcos_tru")?;
///     println!("orchestrator: {}", cfg.orchestrator);
///     Ok(())
/// }
/// ```
///
/// ## Error Handling
/// Returns `ConfigFileError` for:
/// - File not found
/// - Invalid file extension or syntax
/// - Unknown cluster name
/// - Missing required fields or failed validation
pub fn load_platform_config<T>(path: &Path, cluster: &str) -> Result<T, ConfigFileError>
where
    T: DeserializeOwned + Validate
{
    let mut document = load_document(path)?;

    let Some(entry) = document.remove(cluster) else {
        return Err(ConfigFileError::UnknownCluster {
            cluster: cluster.to_string(),
            path: path.display().to_string(),
            available: document.into_keys().collect(),
        });
    };

    let config: T =
        serde_json::from_value(entry).map_err(|e| ConfigFileError::InvalidEntry {
            cluster: cluster.to_string(),
            reason: e.to_string(),
        })?;

    config
        .validate()
        .map_err(|source| ConfigFileError::Validation {
            cluster: cluster.to_string(),
            source,
        })?;

    debug!(path = %path.display(), cluster = %cluster, "Loaded platform configuration");
    Ok(config)
}
