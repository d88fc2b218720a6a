// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dwat contributors

//! Lineage graph
//!
//! Nodes are workflows (`dag:<name>`), tasks (`<dag>:<task>`) and tables
//! (`table:<name>`). Edges point in the direction data flows: workflow to
//! task, upstream task to downstream task, table to the task reading it, task
//! to the table it writes.
//!
//! The serialized form (`{"nodes": [...], "edges": [...]}`) is the contract
//! with the report renderer. Unset optional fields are omitted rather than
//! written as `null`, and both sequences keep insertion order.

mod builder;
mod classify;
mod export;
mod query;

pub use builder::{build_graph, LineageBuilder};
pub use classify::{classify_table, classify_task};
pub use export::{to_dot, to_mermaid, to_text};
pub use query::LineageIndex;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::DwatResult;
use crate::sources::Params;

/// Semantic role of a node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Dag,
    Staging,
    Dimension,
    Fact,
    Table,
    #[default]
    Task,
    Source,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dag => "dag",
            Self::Staging => "staging",
            Self::Dimension => "dimension",
            Self::Fact => "fact",
            Self::Table => "table",
            Self::Task => "task",
            Self::Source => "source",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A graph vertex; identity is its `id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,

    pub label: String,

    #[serde(rename = "type", default)]
    pub kind: NodeKind,

    /// Owning workflow, set on task nodes only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dag: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Params>,
}

impl Node {
    /// Create a node with no optional fields set
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
            dag: None,
            operator: None,
            source_file: None,
            params: None,
        }
    }

    pub fn with_dag(mut self, dag: impl Into<String>) -> Self {
        self.dag = Some(dag.into());
        self
    }

    pub fn with_operator(mut self, operator: Option<String>) -> Self {
        self.operator = operator;
        self
    }

    pub fn with_source_file(mut self, source_file: Option<String>) -> Self {
        self.source_file = source_file;
        self
    }

    pub fn with_params(mut self, params: Option<Params>) -> Self {
        self.params = params;
        self
    }

    /// Id of a workflow node
    pub fn dag_id(dag: &str) -> String {
        format!("dag:{}", dag)
    }

    /// Id of a task node
    pub fn task_id(dag: &str, task: &str) -> String {
        format!("{}:{}", dag, task)
    }

    /// Id of a table node
    pub fn table_id(table: &str) -> String {
        format!("table:{}", table)
    }
}

/// A directed edge; duplicates are kept
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Serialized shape of a graph
#[derive(Serialize, Deserialize)]
struct GraphRepr {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

/// Insertion-ordered graph of unique nodes and (possibly repeated) edges
///
/// Edge endpoints are not required to name a node in the graph: a task may
/// depend on a task that was never declared.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "GraphRepr")]
pub struct LineageGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl From<GraphRepr> for LineageGraph {
    fn from(repr: GraphRepr) -> Self {
        let mut graph = Self::new();
        for node in repr.nodes {
            graph.add_node(node);
        }
        graph.edges = repr.edges;
        graph
    }
}

impl PartialEq for LineageGraph {
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes && self.edges == other.edges
    }
}

impl LineageGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node unless one with the same id exists
    ///
    /// The first node added for an id wins; later ones are dropped, not
    /// merged. Returns whether the node was inserted.
    pub fn add_node(&mut self, node: Node) -> bool {
        if self.index.contains_key(&node.id) {
            return false;
        }
        self.index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
        true
    }

    /// Append an edge
    pub fn add_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Look up a node by id
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Number of nodes of each kind, in first-seen order
    pub fn kind_counts(&self) -> Vec<(NodeKind, usize)> {
        let mut counts: Vec<(NodeKind, usize)> = Vec::new();
        for node in &self.nodes {
            match counts.iter_mut().find(|(kind, _)| *kind == node.kind) {
                Some((_, n)) => *n += 1,
                None => counts.push((node.kind, 1)),
            }
        }
        counts
    }

    /// Ordered interchange representation
    pub fn to_value(&self) -> DwatResult<serde_json::Value> {
        serde_json::to_value(self).map_err(Into::into)
    }

    /// Pretty JSON with two-space indentation
    pub fn to_json(&self) -> DwatResult<String> {
        serde_json::to_string_pretty(self).map_err(Into::into)
    }

    /// Single-line JSON
    pub fn to_json_compact(&self) -> DwatResult<String> {
        serde_json::to_string(self).map_err(Into::into)
    }

    /// Parse the interchange JSON back into a graph
    pub fn from_json(json: &str) -> DwatResult<Self> {
        serde_json::from_str(json).map_err(Into::into)
    }

    /// BLAKE3 digest of the compact JSON form
    pub fn fingerprint(&self) -> DwatResult<String> {
        let json = self.to_json_compact()?;
        Ok(blake3::hash(json.as_bytes()).to_hex().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_writer_wins() {
        let mut graph = LineageGraph::new();
        assert!(graph.add_node(Node::new("table:orders", "orders", NodeKind::Table)));
        assert!(!graph.add_node(
            Node::new("table:orders", "orders v2", NodeKind::Fact).with_dag("other")
        ));

        assert_eq!(graph.nodes().len(), 1);
        let node = graph.node("table:orders").unwrap();
        assert_eq!(node.label, "orders");
        assert_eq!(node.kind, NodeKind::Table);
        assert!(node.dag.is_none());
    }

    #[test]
    fn test_edges_are_not_deduplicated() {
        let mut graph = LineageGraph::new();
        graph.add_edge(Edge::new("a", "b"));
        graph.add_edge(Edge::new("a", "b"));
        assert_eq!(graph.edges().len(), 2);
    }

    #[test]
    fn test_unset_fields_are_omitted() {
        let mut graph = LineageGraph::new();
        graph.add_node(Node::new("dag:d", "d", NodeKind::Dag));
        graph.add_node(
            Node::new("d:t", "t", NodeKind::Task)
                .with_dag("d")
                .with_operator(Some("PythonOperator".into())),
        );
        graph.add_edge(Edge::new("dag:d", "d:t"));
        graph.add_edge(Edge::new("d:t", "table:x").with_label("writes"));

        assert_eq!(
            graph.to_value().unwrap(),
            json!({
                "nodes": [
                    {"id": "dag:d", "label": "d", "type": "dag"},
                    {"id": "d:t", "label": "t", "type": "task", "dag": "d", "operator": "PythonOperator"}
                ],
                "edges": [
                    {"source": "dag:d", "target": "d:t"},
                    {"source": "d:t", "target": "table:x", "label": "writes"}
                ]
            })
        );
        assert!(!graph.to_json().unwrap().contains("null"));
    }

    #[test]
    fn test_empty_params_are_kept() {
        let node = Node::new("d:t", "t", NodeKind::Task).with_params(Some(Params::new()));
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["params"], json!({}));
    }

    #[test]
    fn test_json_round_trip_rebuilds_index() {
        let mut graph = LineageGraph::new();
        graph.add_node(Node::new("table:raw_orders", "raw_orders", NodeKind::Source));
        graph.add_edge(Edge::new("table:raw_orders", "d:t"));

        let parsed = LineageGraph::from_json(&graph.to_json().unwrap()).unwrap();
        assert_eq!(parsed, graph);
        assert!(parsed.contains_node("table:raw_orders"));
        assert_eq!(parsed.to_json().unwrap(), graph.to_json().unwrap());
    }

    #[test]
    fn test_from_json_drops_duplicate_ids() {
        let json = r#"{"nodes":[{"id":"x","label":"first"},{"id":"x","label":"second"}],"edges":[]}"#;
        let graph = LineageGraph::from_json(json).unwrap();
        assert_eq!(graph.nodes().len(), 1);
        assert_eq!(graph.node("x").unwrap().label, "first");
        assert_eq!(graph.node("x").unwrap().kind, NodeKind::Task);
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let mut a = LineageGraph::new();
        a.add_node(Node::new("dag:d", "d", NodeKind::Dag));
        let b = a.clone();
        assert_eq!(a.fingerprint().unwrap(), b.fingerprint().unwrap());

        a.add_edge(Edge::new("dag:d", "d:t"));
        assert_ne!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
    }

    #[test]
    fn test_kind_counts() {
        let mut graph = LineageGraph::new();
        graph.add_node(Node::new("dag:d", "d", NodeKind::Dag));
        graph.add_node(Node::new("table:a", "a", NodeKind::Table));
        graph.add_node(Node::new("table:b", "b", NodeKind::Table));
        assert_eq!(
            graph.kind_counts(),
            vec![(NodeKind::Dag, 1), (NodeKind::Table, 2)]
        );
    }
}
