// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dwat contributors

//! Lineage command - build the graph and export it

use colored::Colorize;
use miette::Result;
use std::path::{Path, PathBuf};

use crate::config::{DwatConfig, ReportFormat};
use crate::errors::DwatError;
use crate::lineage::{build_graph, to_dot, to_mermaid, to_text, LineageGraph};
use crate::report;
use crate::sources::{DirectorySupplier, RecordSupplier};
use crate::utils::{create_spinner, kind_label, print_success};

/// Run the lineage command
pub async fn run(
    path: Option<PathBuf>,
    output: Option<PathBuf>,
    format: Option<ReportFormat>,
    open: bool,
    config: &DwatConfig,
    verbose: bool,
) -> Result<()> {
    let dir = path.unwrap_or_else(|| config.dags_dir.clone());
    let format = format.unwrap_or(config.format);

    // Keep stdout clean when the graph itself is printed there
    let to_stdout = format != ReportFormat::Html && output.is_none();
    let graph = load_graph(&dir, to_stdout)?;

    if format == ReportFormat::Html {
        let output = output.unwrap_or_else(|| config.output.clone());
        report::write_report(&graph, &output)?;
        print_summary(&graph, &output, verbose);

        if open {
            report::open_in_browser(&output)?;
        }
        return Ok(());
    }

    if open {
        eprintln!(
            "{}: --open only applies to html output",
            "Warning".yellow()
        );
    }

    let rendered = render(&graph, format)?;
    match output {
        Some(output) => {
            if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .map_err(|e| DwatError::write_failed(parent, e))?;
            }
            std::fs::write(&output, rendered).map_err(|e| DwatError::write_failed(&output, e))?;
            print_summary(&graph, &output, verbose);
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

/// Load workflow files from `dir` and build their lineage graph
pub(crate) fn load_graph(dir: &Path, quiet: bool) -> Result<LineageGraph> {
    let supplier = DirectorySupplier::new(dir);
    let spinner = create_spinner(
        &format!("Loading workflows from {}", supplier.root().display()),
        quiet,
    );
    let dags = supplier.load();
    spinner.finish_and_clear();

    Ok(build_graph(&dags?))
}

fn render(graph: &LineageGraph, format: ReportFormat) -> Result<String> {
    let rendered = match format {
        ReportFormat::Html => report::render_html(graph)?,
        ReportFormat::Json => {
            let mut json = graph.to_json()?;
            json.push('\n');
            json
        }
        ReportFormat::Dot => to_dot(graph),
        ReportFormat::Mermaid => to_mermaid(graph),
        ReportFormat::Text => to_text(graph),
    };
    Ok(rendered)
}

fn print_summary(graph: &LineageGraph, output: &Path, verbose: bool) {
    print_success(&format!(
        "{} ({} nodes, {} edges)",
        output.display().to_string().bold(),
        graph.nodes().len(),
        graph.edges().len()
    ));

    if verbose {
        for (kind, count) in graph.kind_counts() {
            println!("    {:>4} {}", count, kind_label(kind));
        }
    }
}
