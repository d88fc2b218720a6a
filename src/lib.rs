// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dwat contributors

//! # dwat - Data Warehouse Analysis Tool
//!
//! `dwat` turns workflow DAG definitions (Airflow-style YAML) into a data
//! lineage graph: workflows, their tasks, and the tables those tasks read
//! and write.
//!
//! ## Features
//!
//! - **Lineage graph** - Nodes for workflows, tasks and tables, classified
//!   as staging, dimension, fact, source, table or task
//! - **Stable interchange** - Order-preserving `{"nodes": [...], "edges": [...]}` JSON
//! - **Reports** - Self-contained HTML visualization, DOT, Mermaid and text
//! - **Tracing** - Upstream/downstream queries over the graph
//! - **SQL templates** - Render task SQL with `{{ variable }}` substitution
//!
//! ## Quick Start
//!
//! ```bash
//! # Build and open the lineage report
//! dwat lineage dags/ --open
//!
//! # Print the graph as JSON
//! dwat lineage dags/ -f json
//!
//! # Everything a table depends on
//! dwat trace table:dim_customer dags/ --upstream
//! ```
//!
//! ## Library use
//!
//! ```no_run
//! use dwat::sources::{DirectorySupplier, RecordSupplier};
//!
//! let dags = DirectorySupplier::new("dags").load()?;
//! let graph = dwat::build_graph(&dags);
//! println!("{}", graph.to_json()?);
//! # Ok::<(), dwat::DwatError>(())
//! ```

pub mod cli;
pub mod config;
pub mod errors;
pub mod lineage;
pub mod report;
pub mod sources;
pub mod utils;

// Re-export commonly used types
pub use errors::{DwatError, DwatResult};
pub use lineage::{build_graph, Edge, LineageGraph, LineageIndex, Node, NodeKind};
pub use sources::{DagSet, TaskRecord, WorkflowDocument};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
