// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dwat contributors

//! CLI command definitions and handlers
//!
//! Defines the command-line interface for dwat.

pub mod dags;
pub mod lineage;
pub mod sql;
pub mod trace;
pub mod watch;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::ReportFormat;

/// Data warehouse analysis tool
///
/// Build data lineage from workflow DAG definitions and SQL tasks.
#[derive(Parser, Debug)]
#[clap(
    name = "dwat",
    version,
    about = "Data warehouse analysis tool: lineage from workflow DAGs and SQL",
    long_about = None,
    after_help = "Examples:\n\
        dwat lineage dags/ --open         Build and open the HTML lineage report\n\
        dwat lineage dags/ -f json        Print the lineage graph as JSON\n\
        dwat dags dags/                   List tasks found in workflow files\n\
        dwat trace table:dim_customer     Show everything a table depends on\n\n\
        See 'dwat <command> --help' for more information on a specific command."
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[clap(short, long, global = true)]
    pub verbose: bool,

    /// Change to directory before executing
    #[clap(short = 'C', long, global = true, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Configuration file (default: .dwat.yaml if present)
    #[clap(long, global = true, env = "DWAT_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the lineage graph and write it as a report
    Lineage {
        /// Directory containing workflow YAML files
        path: Option<PathBuf>,

        /// Output file (html defaults to the configured output, other formats to stdout)
        #[clap(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[clap(short, long, value_enum)]
        format: Option<ReportFormat>,

        /// Open the HTML report in a browser
        #[clap(long)]
        open: bool,
    },

    /// List the tasks declared in workflow files
    Dags {
        /// Directory containing workflow YAML files
        path: Option<PathBuf>,

        /// Output format
        #[clap(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Render SQL task files with template variables
    Sql {
        /// Directory containing SQL files
        path: Option<PathBuf>,

        /// Template variable (repeatable)
        #[clap(long = "var", value_name = "KEY=VALUE", value_parser = parse_key_val)]
        vars: Vec<(String, String)>,

        /// Only list the variables each file references
        #[clap(long)]
        list_vars: bool,

        /// Fail on undefined variables
        #[clap(long)]
        strict: bool,
    },

    /// Show the upstream or downstream lineage of a node
    Trace {
        /// Node id, e.g. table:dim_customer or orders_pipeline:load
        node: String,

        /// Directory containing workflow YAML files
        path: Option<PathBuf>,

        /// Show what the node depends on instead of what depends on it
        #[clap(short, long)]
        upstream: bool,
    },

    /// Rebuild the HTML report whenever workflow files change
    Watch {
        /// Directory containing workflow YAML files
        path: Option<PathBuf>,

        /// Report output file
        #[clap(short, long)]
        output: Option<PathBuf>,

        /// Debounce delay in milliseconds
        #[clap(long)]
        debounce: Option<u64>,
    },
}

/// Output format for listing commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Parse a `KEY=VALUE` pair
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    if key.is_empty() {
        return Err(format!("empty variable name in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}
