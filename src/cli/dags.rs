// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dwat contributors

//! Dags command - list tasks declared in workflow files

use colored::Colorize;
use miette::Result;
use std::path::PathBuf;

use super::OutputFormat;
use crate::config::DwatConfig;
use crate::sources::{extract_tasks, DirectorySupplier, RecordSupplier, TaskSummary};
use crate::utils::print_header;

/// Run the dags command
pub async fn run(
    path: Option<PathBuf>,
    format: OutputFormat,
    config: &DwatConfig,
    verbose: bool,
) -> Result<()> {
    let dir = path.unwrap_or_else(|| config.dags_dir.clone());
    let dags = DirectorySupplier::new(&dir).load()?;
    let tasks = extract_tasks(&dags);

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&tasks)
                .map_err(|e| miette::miette!("Failed to serialize tasks: {}", e))?;
            println!("{}", json);
        }
        OutputFormat::Text => print_text(&tasks, verbose),
    }

    Ok(())
}

fn print_text(tasks: &[TaskSummary], verbose: bool) {
    if tasks.is_empty() {
        println!("{}", "No tasks found.".dimmed());
        return;
    }

    print_header("Workflow tasks");

    let mut current: Option<&str> = None;
    for task in tasks {
        if current != Some(task.dag.as_str()) {
            if current.is_some() {
                println!();
            }
            println!("{}", task.dag.bold());
            current = Some(task.dag.as_str());
        }

        let id = task.id.as_deref().unwrap_or("<no id>");
        let operator = task.operator.as_deref().unwrap_or("-");
        println!("  {} {}", id.cyan(), operator.dimmed());

        if let Some(ref file) = task.source_file {
            println!("      file: {}", file);
        }
        if verbose {
            if let Some(ref params) = task.params {
                for (key, value) in params {
                    println!("      {}: {}", key, value);
                }
            }
        }
    }

    println!();
    println!("{} task(s)", tasks.len());
}
