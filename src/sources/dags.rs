// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dwat contributors

//! Workflow (DAG) file loading

use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

use super::records::{Params, WorkflowDocument};
use super::{discover_files, DagSet};
use crate::errors::{DwatError, DwatResult};

/// Extensions recognised as workflow documents, in discovery order
pub const DAG_EXTENSIONS: [&str; 2] = ["yml", "yaml"];

/// Load a single workflow file
pub fn load_dag(path: &Path) -> DwatResult<Option<WorkflowDocument>> {
    let content = std::fs::read_to_string(path).map_err(|e| DwatError::read_failed(path, e))?;
    parse_dag(path, &content)
}

/// Parse workflow YAML; `path` is only used for diagnostics
pub fn parse_dag(path: &Path, content: &str) -> DwatResult<Option<WorkflowDocument>> {
    let value: serde_yaml::Value =
        serde_yaml::from_str(content).map_err(|e| DwatError::YamlParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    WorkflowDocument::from_value(path, value)
}

/// Load every workflow file under a directory
///
/// All `.yml` files come first, then all `.yaml` files, each group sorted by
/// path. Any unreadable or unparsable file fails the whole load.
pub fn load_dags(dir: &Path) -> DwatResult<DagSet> {
    let mut dags = DagSet::new();

    for extension in DAG_EXTENSIONS {
        for path in discover_files(dir, extension)? {
            debug!(path = %path.display(), "loading workflow");
            let document = load_dag(&path)?;
            dags.insert(path, document);
        }
    }

    info!("Loaded {} workflow file(s) from {}", dags.len(), dir.display());
    Ok(dags)
}

/// Flat view of one task, as listed by `dwat dags`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskSummary {
    pub dag: String,
    pub id: Option<String>,
    pub operator: Option<String>,
    pub source_file: Option<String>,
    pub params: Option<Params>,
}

/// List every task of every non-empty workflow
pub fn extract_tasks(dags: &DagSet) -> Vec<TaskSummary> {
    dags.iter()
        .filter_map(|entry| entry.document.as_ref())
        .flat_map(|doc| {
            doc.tasks.iter().flatten().map(move |task| TaskSummary {
                dag: doc.name.clone(),
                id: task.id.clone(),
                operator: task.operator.clone(),
                source_file: task.source_file.clone(),
                params: task.params.clone(),
            })
        })
        .collect()
}
