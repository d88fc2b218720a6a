// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dwat contributors

//! Trace command - walk lineage from one node

use colored::Colorize;
use miette::Result;
use std::path::PathBuf;

use super::lineage::load_graph;
use crate::config::DwatConfig;
use crate::lineage::LineageIndex;
use crate::utils::{kind_label, print_info, print_warning};

/// Run the trace command
pub async fn run(
    node: String,
    path: Option<PathBuf>,
    upstream: bool,
    config: &DwatConfig,
    _verbose: bool,
) -> Result<()> {
    let dir = path.unwrap_or_else(|| config.dags_dir.clone());
    let graph = load_graph(&dir, false)?;
    let index = LineageIndex::build(&graph);

    let (direction, found) = if upstream {
        ("upstream of", index.upstream(&node)?)
    } else {
        ("downstream of", index.downstream(&node)?)
    };

    println!("{} {}", direction.bold(), node.cyan());

    if found.is_empty() {
        println!("  {}", "(nothing)".dimmed());
        return Ok(());
    }

    for id in &found {
        match graph.node(id) {
            Some(n) => print_info(&format!("{} [{}]", id, kind_label(n.kind))),
            // Dependency ids that never became nodes
            None => print_warning(&format!("{} [{}]", id, "unresolved".dimmed())),
        }
    }

    Ok(())
}
