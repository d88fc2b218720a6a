// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dwat contributors

//! dwat - Data Warehouse Analysis Tool
//!
//! Build data lineage graphs from workflow DAG definitions and SQL tasks.

use clap::Parser;
use miette::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dwat::cli::{Cli, Commands};
use dwat::config::DwatConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; stderr keeps stdout for exported graphs
    let default_filter = if cli.verbose { "dwat=debug" } else { "dwat=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Change to specified directory if provided
    if let Some(ref dir) = cli.directory {
        std::env::set_current_dir(dir).map_err(|e| {
            miette::miette!("Failed to change to directory '{}': {}", dir.display(), e)
        })?;
    }

    let config = DwatConfig::load(cli.config.as_deref())?;

    // Dispatch to command handlers
    match cli.command {
        Commands::Lineage {
            path,
            output,
            format,
            open,
        } => dwat::cli::lineage::run(path, output, format, open, &config, cli.verbose).await,
        Commands::Dags { path, format } => {
            dwat::cli::dags::run(path, format, &config, cli.verbose).await
        }
        Commands::Sql {
            path,
            vars,
            list_vars,
            strict,
        } => dwat::cli::sql::run(path, vars, list_vars, strict, &config, cli.verbose).await,
        Commands::Trace {
            node,
            path,
            upstream,
        } => dwat::cli::trace::run(node, path, upstream, &config, cli.verbose).await,
        Commands::Watch {
            path,
            output,
            debounce,
        } => dwat::cli::watch::run(path, output, debounce, &config, cli.verbose).await,
    }
}
