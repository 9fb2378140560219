use anyhow::Result;
use clap::{ArgGroup, Args};
use colored::Colorize;
use provision::{Operation, ProvisionService};
use schema::{GroupRole, PermissionGrant, UserGroup, generate_cluster_schema};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

use super::{
    EndpointTier, classify_endpoints, finish, load_cluster_config, parse_context_name,
    parse_group_id, print_plan,
};
use crate::output;

const COMMAND: &str = "manage-group";

#[derive(Args)]
#[command(group(ArgGroup::new("action").required(true).args(["add", "remove"])))]
pub struct ManageGroupArgs {
    /// Create the user group and grant it the role's permissions
    #[arg(long)]
    pub add: bool,

    /// Delete the user group
    #[arg(long)]
    pub remove: bool,

    /// Cluster name, the key into the configuration file
    #[arg(long)]
    pub cluster: String,

    /// Context the group belongs to
    #[arg(long, value_parser = parse_context_name)]
    pub name: String,

    /// User group id
    #[arg(long, value_parser = parse_group_id)]
    pub gid: String,

    /// Role whose permission table is granted: dev or devops
    #[arg(long)]
    pub role: GroupRole,

    /// Cluster orchestrator configuration file (YAML or TOML)
    #[arg(long, env = "CTXPROV_CLUSTER_CONFIG", default_value = "/tmp/dcos.yml")]
    pub cfg_cluster: PathBuf,

    /// Print the group and its grants without contacting the cluster
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Serialize)]
struct GroupPlan<'a> {
    context: &'a str,
    cluster: &'a str,
    operation: Operation,
    group: &'a UserGroup,
    endpoints: Vec<GroupEndpointPlan<'a>>,
}

#[derive(Serialize)]
struct GroupEndpointPlan<'a> {
    #[serde(flatten)]
    endpoint: EndpointTier,
    grants: &'a [PermissionGrant],
}

pub async fn run(args: ManageGroupArgs) -> Result<ExitCode> {
    let config = load_cluster_config(COMMAND, &args.cfg_cluster, &args.cluster)?;

    let operation = if args.add {
        Operation::Apply
    } else {
        Operation::Destroy
    };
    let schema = generate_cluster_schema(&args.name);
    let group = UserGroup {
        gid: args.gid.clone(),
        role: args.role,
    };

    info!(
        context = %args.name,
        cluster = %args.cluster,
        gid = %group.gid,
        role = %group.role,
        operation = %operation,
        "Managing user group"
    );

    if args.dry_run {
        let endpoints = classify_endpoints(&config)
            .into_iter()
            .map(|endpoint| GroupEndpointPlan {
                grants: match operation {
                    Operation::Apply => schema.grants.get(endpoint.tier, group.role),
                    Operation::Destroy => &[],
                },
                endpoint,
            })
            .collect();
        return print_plan(&GroupPlan {
            context: &args.name,
            cluster: &args.cluster,
            operation,
            group: &group,
            endpoints,
        });
    }

    let verb = match operation {
        Operation::Apply => "Adding",
        Operation::Destroy => "Removing",
    };
    output::header(&format!(
        "{verb} user group {} ({}) of context {}",
        group.gid.cyan(),
        group.role,
        args.name.cyan(),
    ));

    let summary = ProvisionService::default()
        .group_pass(&config, &schema, &group, operation)
        .await;

    Ok(finish(&summary))
}
