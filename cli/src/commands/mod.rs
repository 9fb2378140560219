pub mod manage_group;
pub mod provision_context;

use anyhow::Result;
use clap::{Parser, Subcommand};
use config::{ClusterEndpointConfig, RepositoryEndpointConfig, load_platform_config};
use provision::Summary;
use regex::Regex;
use schema::{Tier, TierClassifier};
use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;

use crate::output;
use crate::ux_error;

#[derive(Parser)]
#[command(
    name = "ctxprov",
    author,
    version,
    about = "ctxprov - provision contexts on the cluster and the repository manager",
    long_about = "Creates or removes every resource of a named context: the service group, user \
                  groups and permissions on the cluster orchestrator, and the repositories, \
                  roles and users on the repository manager.\n\nEndpoints and credentials are \
                  read from one configuration file per platform, keyed by cluster name."
)]
pub struct Cli {
    /// Log debug details of every request
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Create or delete all resources of a context")]
    ProvisionContext(provision_context::ProvisionContextArgs),

    #[command(about = "Add or remove one user group of a context")]
    ManageGroup(manage_group::ManageGroupArgs),
}

const PATH_SEGMENT_PATTERN: &str = r"^[A-Za-z0-9][A-Za-z0-9_.-]*$";

fn parse_path_segment(value: &str, what: &str) -> Result<String, String> {
    let pattern = Regex::new(PATH_SEGMENT_PATTERN).map_err(|e| e.to_string())?;
    if pattern.is_match(value) {
        Ok(value.to_string())
    } else {
        Err(format!(
            "'{value}' is not a valid {what} (letters, digits, '_', '.', '-'; must start with a \
             letter or digit)",
        ))
    }
}

/// Context names become path segments on both platforms.
pub fn parse_context_name(value: &str) -> Result<String, String> {
    parse_path_segment(value, "context name")
}

/// Group ids are sent unescaped in cluster API paths.
pub fn parse_group_id(value: &str) -> Result<String, String> {
    parse_path_segment(value, "group id")
}

pub fn load_cluster_config(
    command: &str,
    path: &Path,
    cluster: &str,
) -> Result<ClusterEndpointConfig> {
    load_platform_config(path, cluster)
        .map_err(|e| ux_error::config_error(&e, path, command, "--cfg-cluster").into())
}

pub fn load_repository_config(
    command: &str,
    path: &Path,
    cluster: &str,
) -> Result<RepositoryEndpointConfig> {
    load_platform_config(path, cluster)
        .map_err(|e| ux_error::config_error(&e, path, command, "--cfg-repository").into())
}

/// Tier of one cluster endpoint, as shown by `--dry-run`.
#[derive(Debug, Serialize)]
pub struct EndpointTier {
    pub url: String,
    pub tier: Tier,
}

pub fn classify_endpoints(config: &ClusterEndpointConfig) -> Vec<EndpointTier> {
    let classifier = TierClassifier::default();
    config
        .endpoint
        .url
        .iter()
        .map(|url| EndpointTier {
            url: url.to_string(),
            tier: classifier.classify(url),
        })
        .collect()
}

pub fn print_plan<T: Serialize>(plan: &T) -> Result<ExitCode> {
    print!("{}", serde_yaml::to_string(plan)?);
    output::hint("Remove --dry-run to apply changes");
    Ok(ExitCode::SUCCESS)
}

/// Maps the aggregate result of all passes to the process exit status.
pub fn finish(summary: &Summary) -> ExitCode {
    for report in &summary.reports {
        output::pass_line(report);
    }

    if summary.succeeded() {
        output::success("All operations succeeded");
        ExitCode::SUCCESS
    } else {
        output::error(&format!(
            "{} of {} passes reported failures, see the log for details",
            summary.failed_passes(),
            summary.reports.len(),
        ));
        ExitCode::FAILURE
    }
}
