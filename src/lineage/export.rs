// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dwat contributors

//! Text exports of a lineage graph (DOT, Mermaid, plain text)

use super::{LineageGraph, NodeKind};

/// Fill colour per role
fn fill_color(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Dag => "#f1f5f9",
        NodeKind::Source => "#f3e8ff",
        NodeKind::Staging => "#e0e7ff",
        NodeKind::Dimension => "#fce7f3",
        NodeKind::Fact => "#ccfbf1",
        NodeKind::Table => "#dbeafe",
        NodeKind::Task => "#dcfce7",
    }
}

fn dot_style(kind: NodeKind) -> String {
    let shape = match kind {
        NodeKind::Dag => "shape=folder, style=filled",
        NodeKind::Source => "shape=cylinder, style=filled",
        _ => "shape=box, style=\"rounded,filled\"",
    };
    format!("{}, fillcolor=\"{}\"", shape, fill_color(kind))
}

fn escape_dot(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Generate a DOT digraph
///
/// Edge endpoints without a node are emitted implicitly by Graphviz.
pub fn to_dot(graph: &LineageGraph) -> String {
    let mut out = String::from("digraph lineage {\n");
    out.push_str("    rankdir=LR;\n");
    out.push_str("    node [fontname=\"Helvetica\"];\n\n");

    for node in graph.nodes() {
        out.push_str(&format!(
            "    \"{}\" [label=\"{}\", {}];\n",
            escape_dot(&node.id),
            escape_dot(&node.label),
            dot_style(node.kind)
        ));
    }

    if !graph.edges().is_empty() {
        out.push('\n');
    }

    for edge in graph.edges() {
        out.push_str(&format!(
            "    \"{}\" -> \"{}\"",
            escape_dot(&edge.source),
            escape_dot(&edge.target)
        ));
        if let Some(ref label) = edge.label {
            out.push_str(&format!(" [label=\"{}\"]", escape_dot(label)));
        }
        out.push_str(";\n");
    }

    out.push_str("}\n");
    out
}

/// Mermaid node ids cannot contain ':' and friends
fn mermaid_id(id: &str) -> String {
    id.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

fn escape_mermaid(label: &str) -> String {
    label.replace('"', "#quot;")
}

/// Generate a Mermaid flowchart
pub fn to_mermaid(graph: &LineageGraph) -> String {
    let mut out = String::from("graph LR\n");

    for node in graph.nodes() {
        let id = mermaid_id(&node.id);
        let label = escape_mermaid(&node.label);
        let shape = match node.kind {
            NodeKind::Dag => format!("{}[/\"{}\"/]", id, label),
            NodeKind::Source => format!("{}[(\"{}\")]", id, label),
            NodeKind::Task => format!("{}(\"{}\")", id, label),
            _ => format!("{}[\"{}\"]", id, label),
        };
        out.push_str(&format!("    {}\n", shape));
    }

    for edge in graph.edges() {
        let from = mermaid_id(&edge.source);
        let to = mermaid_id(&edge.target);
        match edge.label {
            Some(ref label) => out.push_str(&format!(
                "    {} -->|{}| {}\n",
                from,
                escape_mermaid(label),
                to
            )),
            None => out.push_str(&format!("    {} --> {}\n", from, to)),
        }
    }

    for (kind, _) in graph.kind_counts() {
        out.push_str(&format!("    classDef {} fill:{}\n", kind, fill_color(kind)));
    }
    for node in graph.nodes() {
        out.push_str(&format!(
            "    class {} {}\n",
            mermaid_id(&node.id),
            node.kind
        ));
    }

    out
}

/// Generate a plain-text summary grouped by workflow
pub fn to_text(graph: &LineageGraph) -> String {
    let mut out = String::new();

    for dag in graph.nodes().iter().filter(|n| n.kind == NodeKind::Dag) {
        out.push_str(&format!("{} ({})\n", dag.label, dag.id));

        let tasks = graph
            .nodes()
            .iter()
            .filter(|n| n.dag.as_deref() == Some(dag.label.as_str()));

        for task in tasks {
            out.push_str(&format!("  - {} [{}]", task.label, task.kind));
            if let Some(ref operator) = task.operator {
                out.push_str(&format!(" {}", operator));
            }

            let upstream: Vec<&str> = graph
                .edges()
                .iter()
                .filter(|e| e.target == task.id && e.source != dag.id)
                .map(|e| e.source.as_str())
                .collect();
            if !upstream.is_empty() {
                out.push_str(&format!(" <- {}", upstream.join(", ")));
            }

            let downstream: Vec<&str> = graph
                .edges()
                .iter()
                .filter(|e| e.source == task.id && e.target.starts_with("table:"))
                .map(|e| e.target.as_str())
                .collect();
            if !downstream.is_empty() {
                out.push_str(&format!(" -> {}", downstream.join(", ")));
            }

            out.push('\n');
        }
    }

    let tables: Vec<String> = graph
        .nodes()
        .iter()
        .filter(|n| n.id.starts_with("table:"))
        .map(|n| format!("{} [{}]", n.label, n.kind))
        .collect();
    if !tables.is_empty() {
        out.push_str(&format!("tables: {}\n", tables.join(", ")));
    }

    out
}
