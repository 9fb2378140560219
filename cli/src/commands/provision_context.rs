//! provision-context command - create or delete a whole context
//!
//! Runs the repository manager pass first and the cluster pass second. Both
//! passes always run; a failure in the first does not skip the second.

use anyhow::Result;
use clap::{ArgGroup, Args};
use colored::Colorize;
use provision::{Operation, ProvisionService};
use schema::{ClusterSchema, RepositorySchema, generate_cluster_schema, generate_repository_schema};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

use super::{
    EndpointTier, classify_endpoints, finish, load_cluster_config, load_repository_config,
    parse_context_name, print_plan,
};
use crate::output;

const COMMAND: &str = "provision-context";

#[derive(Args)]
#[command(group(ArgGroup::new("action").required(true).args(["create", "delete"])))]
pub struct ProvisionContextArgs {
    /// Create every resource of the context
    #[arg(long)]
    pub create: bool,

    /// Delete every resource of the context
    #[arg(long)]
    pub delete: bool,

    /// Cluster name, the key into both configuration files
    #[arg(long)]
    pub cluster: String,

    /// Context name
    #[arg(long, value_parser = parse_context_name)]
    pub name: String,

    /// HTTPS port of the context's docker repository
    #[arg(long, required_if_eq("create", "true"))]
    pub port: Option<u16>,

    /// Cluster orchestrator configuration file (YAML or TOML)
    #[arg(long, env = "CTXPROV_CLUSTER_CONFIG", default_value = "/tmp/dcos.yml")]
    pub cfg_cluster: PathBuf,

    /// Repository manager configuration file (YAML or TOML)
    #[arg(long, env = "CTXPROV_REPOSITORY_CONFIG", default_value = "/tmp/nexus.yml")]
    pub cfg_repository: PathBuf,

    /// Print the desired state without contacting any platform
    #[arg(long)]
    pub dry_run: bool,
}

impl ProvisionContextArgs {
    fn operation(&self) -> Operation {
        if self.create {
            Operation::Apply
        } else {
            Operation::Destroy
        }
    }
}

#[derive(Serialize)]
struct ContextPlan<'a> {
    context: &'a str,
    cluster: &'a str,
    operation: Operation,
    cluster_endpoints: Vec<EndpointTier>,
    repository_endpoints: Vec<String>,
    repository: &'a RepositorySchema,
    orchestrator: &'a ClusterSchema,
}

pub async fn run(args: ProvisionContextArgs) -> Result<ExitCode> {
    let cluster_config = load_cluster_config(COMMAND, &args.cfg_cluster, &args.cluster)?;
    let repository_config = load_repository_config(COMMAND, &args.cfg_repository, &args.cluster)?;

    let operation = args.operation();
    // Deleting never sends the port; any value yields the same names.
    let port = args.port.unwrap_or_default();
    let repository_schema = generate_repository_schema(&args.name, port);
    let cluster_schema = generate_cluster_schema(&args.name);

    info!(
        context = %args.name,
        cluster = %args.cluster,
        port = ?args.port,
        operation = %operation,
        "Provisioning context"
    );

    if args.dry_run {
        return print_plan(&ContextPlan {
            context: &args.name,
            cluster: &args.cluster,
            operation,
            cluster_endpoints: classify_endpoints(&cluster_config),
            repository_endpoints: repository_config
                .endpoint
                .url
                .iter()
                .map(str::to_string)
                .collect(),
            repository: &repository_schema,
            orchestrator: &cluster_schema,
        });
    }

    let verb = match operation {
        Operation::Apply => "Creating",
        Operation::Destroy => "Deleting",
    };
    output::header(&format!("{verb} context {}", args.name.cyan()));

    let service = ProvisionService::default();
    let mut summary = service
        .repository_pass(&repository_config, &repository_schema, operation)
        .await;
    summary.merge(
        service
            .cluster_pass(&cluster_config, &cluster_schema, operation)
            .await,
    );

    Ok(finish(&summary))
}
