//! Node registry for a mapping run, backed by petgraph::DiGraph.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::config::{ArchitecturalRole, FileNode, RiskLevel};

/// Files discovered from the entry point, their import edges and the log of
/// unresolved imports and unreadable files.
///
/// Outgoing edges live on each node in declaration order. An edge is mirrored
/// into the petgraph structure once both endpoints exist, which is what cycle
/// detection runs on.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    graph: DiGraph<FileNode, ()>,
    /// O(1) canonical id → NodeIndex lookup.
    id_index: HashMap<String, NodeIndex>,
    errors: Vec<String>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node. The first registration of an id wins; later ones are
    /// ignored and the existing index is returned.
    pub fn add_node(&mut self, node: FileNode) -> NodeIndex {
        if let Some(&idx) = self.id_index.get(&node.id) {
            return idx;
        }
        let id = node.id.clone();
        let idx = self.graph.add_node(node);
        self.id_index.insert(id, idx);
        idx
    }

    pub fn contains(&self, id: &str) -> bool {
        self.id_index.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&FileNode> {
        self.id_index
            .get(id)
            .and_then(|&idx| self.graph.node_weight(idx))
    }

    /// Append a resolved import target to `from`'s outgoing list.
    pub fn add_import(&mut self, from: &str, to: &str) {
        if let Some(node) = self.node_mut(from) {
            node.imports.push(to.to_string());
        }
    }

    /// Record `from` on `to`'s incoming list. No-op unless both nodes exist.
    pub fn add_back_edge(&mut self, from: &str, to: &str) {
        let (Some(&from_idx), Some(&to_idx)) = (self.id_index.get(from), self.id_index.get(to))
        else {
            return;
        };
        self.graph[to_idx].imported_by.push(from.to_string());
        self.graph.add_edge(from_idx, to_idx, ());
    }

    pub fn record_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    fn node_mut(&mut self, id: &str) -> Option<&mut FileNode> {
        let idx = *self.id_index.get(id)?;
        self.graph.node_weight_mut(idx)
    }

    // --- Queries ---

    /// Nodes in discovery order.
    pub fn nodes(&self) -> impl Iterator<Item = &FileNode> {
        self.graph.node_weights()
    }

    /// Nodes sorted by canonical id.
    pub fn sorted_nodes(&self) -> Vec<&FileNode> {
        let mut nodes: Vec<&FileNode> = self.nodes().collect();
        nodes.sort_by(|a, b| a.id.cmp(&b.id));
        nodes
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// `(from, to)` pairs derived from the outgoing lists.
    pub fn edges(&self) -> Vec<(String, String)> {
        self.nodes()
            .flat_map(|n| n.imports.iter().map(move |to| (n.id.clone(), to.clone())))
            .collect()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes().map(|n| n.imports.len()).sum()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Groups of files that import each other, each sorted by id. Self-imports
    /// count as a cycle of one.
    pub fn import_cycles(&self) -> Vec<Vec<String>> {
        let mut cycles: Vec<Vec<String>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| {
                scc.len() > 1 || scc.iter().any(|&idx| self.graph.contains_edge(idx, idx))
            })
            .map(|scc| {
                let mut ids: Vec<String> =
                    scc.into_iter().map(|idx| self.graph[idx].id.clone()).collect();
                ids.sort();
                ids
            })
            .collect();
        cycles.sort();
        cycles
    }

    pub fn risk_distribution(&self) -> BTreeMap<RiskLevel, usize> {
        let mut counts = BTreeMap::new();
        for node in self.nodes() {
            *counts.entry(node.risk).or_insert(0) += 1;
        }
        counts
    }

    pub fn role_distribution(&self) -> BTreeMap<ArchitecturalRole, usize> {
        let mut counts = BTreeMap::new();
        for node in self.nodes() {
            *counts.entry(node.role).or_insert(0) += 1;
        }
        counts
    }

    /// Union of every node's external dependencies.
    pub fn external_dependencies(&self) -> BTreeSet<String> {
        self.nodes()
            .flat_map(|n| n.external_deps.iter().cloned())
            .collect()
    }
}
