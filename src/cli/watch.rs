// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dwat contributors

//! Watch command - rebuild the lineage report on file changes

use colored::Colorize;
use miette::Result;
use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebouncedEventKind};
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::time::Duration;

use crate::config::DwatConfig;
use crate::errors::DwatError;
use crate::lineage::build_graph;
use crate::report;
use crate::sources::{DirectorySupplier, RecordSupplier, DAG_EXTENSIONS};

/// Run the watch command
pub async fn run(
    path: Option<PathBuf>,
    output: Option<PathBuf>,
    debounce: Option<u64>,
    config: &DwatConfig,
    verbose: bool,
) -> Result<()> {
    let dir = path.unwrap_or_else(|| config.dags_dir.clone());
    let output = output.unwrap_or_else(|| config.output.clone());
    let debounce_ms = debounce.unwrap_or(config.watch.debounce_ms);

    if !dir.is_dir() {
        return Err(DwatError::DirectoryNotFound { path: dir }.into());
    }

    println!("{}", "Starting watch mode...".bold());
    println!(
        "Watching {} for changes (debounce: {}ms)",
        dir.display(),
        debounce_ms
    );
    println!("Press {} to exit.", "Ctrl+C".cyan());
    println!();

    let (tx, rx) = channel();

    let mut debouncer =
        new_debouncer(Duration::from_millis(debounce_ms), tx).map_err(|e| DwatError::Watch {
            message: format!("failed to create file watcher: {}", e),
        })?;

    debouncer
        .watcher()
        .watch(&dir, RecursiveMode::Recursive)
        .map_err(|e| DwatError::Watch {
            message: format!("failed to watch {}: {}", dir.display(), e),
        })?;

    let mut rebuilder = Rebuilder::new(&dir, &output);
    rebuilder.rebuild();

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let relevant: Vec<_> = events
                    .iter()
                    .filter(|e| is_workflow_file(&e.path))
                    .filter(|e| matches!(e.kind, DebouncedEventKind::Any))
                    .collect();

                if !relevant.is_empty() {
                    println!();
                    println!("{}", "─".repeat(50).dimmed());
                    println!(
                        "{}: {} file(s) changed",
                        "Change detected".yellow(),
                        relevant.len()
                    );

                    if verbose {
                        for event in &relevant {
                            println!("  {}", event.path.display());
                        }
                    }

                    rebuilder.rebuild();
                }
            }
            Ok(Err(e)) => {
                eprintln!("{}: {:?}", "Watch error".red(), e);
            }
            Err(e) => {
                // Channel closed
                eprintln!("{}: {}", "Channel error".red(), e);
                break;
            }
        }
    }

    Ok(())
}

fn is_workflow_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| DAG_EXTENSIONS.contains(&e))
}

/// Rebuilds the report, skipping the write when the graph is unchanged
struct Rebuilder {
    dir: PathBuf,
    output: PathBuf,
    last_fingerprint: Option<String>,
}

impl Rebuilder {
    fn new(dir: &Path, output: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            output: output.to_path_buf(),
            last_fingerprint: None,
        }
    }

    /// Returns whether the report was written
    fn rebuild(&mut self) -> bool {
        let start = std::time::Instant::now();

        let dags = match DirectorySupplier::new(&self.dir).load() {
            Ok(dags) => dags,
            Err(e) => {
                eprintln!("{}: {}", "Failed to load workflows".red(), e);
                return false;
            }
        };

        let graph = build_graph(&dags);
        let fingerprint = match graph.fingerprint() {
            Ok(f) => f,
            Err(e) => {
                eprintln!("{}: {}", "Failed to serialize graph".red(), e);
                return false;
            }
        };

        if self.last_fingerprint.as_deref() == Some(fingerprint.as_str()) {
            println!("{}", "Lineage unchanged, report not rewritten".dimmed());
            return false;
        }

        if let Err(e) = report::write_report(&graph, &self.output) {
            eprintln!("{}: {}", "Failed to write report".red(), e);
            return false;
        }

        println!(
            "{} {} ({} nodes, {} edges, {:.2}s)",
            "Report written".green(),
            self.output.display(),
            graph.nodes().len(),
            graph.edges().len(),
            start.elapsed().as_secs_f64()
        );
        self.last_fingerprint = Some(fingerprint);
        true
    }
}
