// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dwat contributors

//! Lineage graph construction
//!
//! Walks workflow records in supplier order and emits workflow, task and
//! table nodes plus the edges between them. Malformed pieces are skipped,
//! never reported as errors.

use tracing::debug;

use super::classify::{classify_table, classify_task};
use super::{Edge, LineageGraph, Node, NodeKind};
use crate::sources::{DagSet, TaskRecord, WorkflowDocument};

/// Build the lineage graph for a set of workflow records
pub fn build_graph(dags: &DagSet) -> LineageGraph {
    LineageBuilder::new().build(dags)
}

/// Builder for lineage graphs
#[derive(Debug, Default)]
pub struct LineageBuilder {
    graph: LineageGraph,
}

impl LineageBuilder {
    /// Create a builder with an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the builder, adding every record in `dags`
    pub fn build(mut self, dags: &DagSet) -> LineageGraph {
        for entry in dags.iter() {
            let Some(ref document) = entry.document else {
                debug!(path = %entry.path.display(), "skipping empty workflow document");
                continue;
            };
            self.add_workflow(&entry.path.display().to_string(), document);
        }

        self.graph
    }

    /// Add one workflow and all of its tasks
    pub fn add_workflow(&mut self, file: &str, document: &WorkflowDocument) {
        let dag = document.name.as_str();
        let dag_id = Node::dag_id(dag);

        self.graph.add_node(
            Node::new(dag_id.as_str(), dag, NodeKind::Dag).with_source_file(Some(file.to_string())),
        );

        let Some(ref tasks) = document.tasks else {
            debug!(dag = %dag, "workflow declares no tasks");
            return;
        };

        for task in tasks {
            self.add_task(dag, &dag_id, task);
        }
    }

    fn add_task(&mut self, dag: &str, dag_id: &str, task: &TaskRecord) {
        let Some(task_name) = task.id.as_deref().filter(|id| !id.is_empty()) else {
            debug!(dag = %dag, "skipping task without an id");
            return;
        };
        let task_id = Node::task_id(dag, task_name);

        self.graph.add_node(
            Node::new(task_id.as_str(), task_name, classify_task(task))
                .with_dag(dag)
                .with_operator(task.operator.clone())
                .with_source_file(task.source_file.clone())
                .with_params(task.params.clone()),
        );

        self.graph.add_edge(Edge::new(dag_id, task_id.as_str()));

        for dep in &task.depends_on {
            if dep == task_name {
                debug!(dag = %dag, task = %task_name, "dropping self-dependency");
                continue;
            }
            self.graph
                .add_edge(Edge::new(Node::task_id(dag, dep), task_id.as_str()));
        }

        if let Some(source) = task.source_table() {
            self.add_table(&source);
            self.graph
                .add_edge(Edge::new(Node::table_id(&source), task_id.as_str()));
        }

        if let Some(target) = task.target_table() {
            self.add_table(&target);
            self.graph
                .add_edge(Edge::new(task_id.as_str(), Node::table_id(&target)));
        }
    }

    fn add_table(&mut self, table: &str) {
        self.graph
            .add_node(Node::new(Node::table_id(table), table, classify_table(table)));
    }
}
