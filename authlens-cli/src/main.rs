//! authlens -- single-pass auth log analyzer.
//!
//! Resolves configuration, initializes logging and metric descriptions,
//! then runs the analysis and maps failures to process exit codes.

mod cli;
mod commands;
mod error;
mod logging;
mod output;
mod render;

use std::process::ExitCode;

use clap::Parser;

use authlens_core::config::AuthlensConfig;

use crate::cli::Cli;
use crate::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    // file and env first, flags last, then a single validation pass
    let (mut config, ignored_env) = AuthlensConfig::resolve(cli.config.as_deref()).await?;
    commands::analyze::apply_cli_overrides(&cli, &mut config);
    config.validate()?;

    logging::init_tracing(&config.general)?;
    authlens_core::metrics::describe_all();
    for var in &ignored_env {
        var.warn();
    }
    tracing::debug!(config = ?cli.config, "configuration resolved");

    commands::analyze::execute(&cli, &config).await
}
