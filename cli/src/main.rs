use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod commands;
mod output;
mod ux_error;

use commands::{Cli, Commands};
use ux_error::UxError;

/// Exit status for usage and configuration errors, matching clap's own.
const USAGE_ERROR: u8 = 2;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::ProvisionContext(args) => commands::provision_context::run(args).await,
        Commands::ManageGroup(args) => commands::manage_group::run(args).await,
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            match e.downcast_ref::<UxError>() {
                Some(ux) => ux.display(),
                None => output::error(&format!("{e:#}")),
            }
            ExitCode::from(USAGE_ERROR)
        }
    }
}
