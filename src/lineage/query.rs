// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dwat contributors

//! Upstream/downstream lineage queries

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Bfs, Reversed};
use std::collections::HashMap;

use super::LineageGraph;
use crate::errors::{DwatError, DwatResult};

/// Traversable view of a lineage graph
///
/// Every edge endpoint becomes a vertex, including dangling dependency ids
/// that have no node of their own.
pub struct LineageIndex {
    graph: DiGraph<String, ()>,
    id_to_index: HashMap<String, NodeIndex>,
}

impl LineageIndex {
    /// Index a lineage graph
    pub fn build(lineage: &LineageGraph) -> Self {
        let mut index = Self {
            graph: DiGraph::new(),
            id_to_index: HashMap::new(),
        };

        for node in lineage.nodes() {
            index.vertex(&node.id);
        }

        for edge in lineage.edges() {
            let from = index.vertex(&edge.source);
            let to = index.vertex(&edge.target);
            index.graph.add_edge(from, to, ());
        }

        index
    }

    fn vertex(&mut self, id: &str) -> NodeIndex {
        if let Some(&idx) = self.id_to_index.get(id) {
            return idx;
        }
        let idx = self.graph.add_node(id.to_string());
        self.id_to_index.insert(id.to_string(), idx);
        idx
    }

    fn start(&self, id: &str) -> DwatResult<NodeIndex> {
        self.id_to_index
            .get(id)
            .copied()
            .ok_or_else(|| DwatError::NodeNotFound { id: id.to_string() })
    }

    /// Everything `id` (transitively) reads from, nearest first
    pub fn upstream(&self, id: &str) -> DwatResult<Vec<String>> {
        let start = self.start(id)?;
        let reversed = Reversed(&self.graph);
        let mut bfs = Bfs::new(reversed, start);
        let mut found = Vec::new();
        while let Some(nx) = bfs.next(reversed) {
            if nx != start {
                found.push(self.graph[nx].clone());
            }
        }
        Ok(found)
    }

    /// Everything (transitively) fed by `id`, nearest first
    pub fn downstream(&self, id: &str) -> DwatResult<Vec<String>> {
        let start = self.start(id)?;
        let mut bfs = Bfs::new(&self.graph, start);
        let mut found = Vec::new();
        while let Some(nx) = bfs.next(&self.graph) {
            if nx != start {
                found.push(self.graph[nx].clone());
            }
        }
        Ok(found)
    }

    /// Direct predecessors of `id`
    pub fn parents(&self, id: &str) -> DwatResult<Vec<String>> {
        let node = self.start(id)?;
        let mut parents: Vec<String> = self
            .graph
            .neighbors_directed(node, petgraph::Direction::Incoming)
            .map(|n| self.graph[n].clone())
            .collect();
        parents.sort();
        parents.dedup();
        Ok(parents)
    }

    /// Whether data can flow from `from` to `to`
    pub fn feeds(&self, from: &str, to: &str) -> bool {
        let (Some(&a), Some(&b)) = (self.id_to_index.get(from), self.id_to_index.get(to)) else {
            return false;
        };
        petgraph::algo::has_path_connecting(&self.graph, a, b, None)
    }
}
