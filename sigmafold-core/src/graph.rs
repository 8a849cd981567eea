// Copyright 2025 Sigmafold Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Shape co-occurrence graph
//!
//! Weighted undirected graph whose nodes are shape identifiers. An edge's
//! weight counts how many sequence folding-instance pairs co-occur on its
//! endpoints. Edges are keyed by the lexicographically ordered endpoint
//! pair, so storage is canonical: two graphs built from permuted inputs
//! compare equal. No self-loops; duplicate increments accumulate weight.

use crate::records::ShapeId;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Weighted undirected shape co-occurrence graph
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShapeGraph {
    nodes: BTreeSet<ShapeId>,
    edges: BTreeMap<(ShapeId, ShapeId), u32>,
}

fn ordered_pair(a: &str, b: &str) -> (ShapeId, ShapeId) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

impl ShapeGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconstruct a graph from a persisted node/edge list
    pub fn from_parts(
        nodes: impl IntoIterator<Item = ShapeId>,
        edges: impl IntoIterator<Item = (ShapeId, ShapeId, u32)>,
    ) -> Self {
        let mut graph = Self::new();
        for node in nodes {
            graph.add_node(node);
        }
        for (a, b, weight) in edges {
            graph.add_edge_weight(&a, &b, weight);
        }
        graph
    }

    /// Add a node if absent
    pub fn add_node(&mut self, id: impl Into<ShapeId>) {
        self.nodes.insert(id.into());
    }

    /// Increment the weight of the undirected edge (a, b) by one, creating
    /// the edge with weight 1 (and its endpoints) if absent.
    ///
    /// Self-loops are ignored: `a == b` is a no-op.
    pub fn increment_edge(&mut self, a: &str, b: &str) {
        self.add_edge_weight(a, b, 1);
    }

    /// Add `weight` to the undirected edge (a, b), creating endpoints as
    /// needed. Self-loops and zero weights are ignored.
    pub fn add_edge_weight(&mut self, a: &str, b: &str, weight: u32) {
        if a == b || weight == 0 {
            return;
        }
        self.nodes.insert(a.to_string());
        self.nodes.insert(b.to_string());
        *self.edges.entry(ordered_pair(a, b)).or_insert(0) += weight;
    }

    /// Edge weight between two nodes, 0 when no edge exists
    pub fn weight(&self, a: &str, b: &str) -> u32 {
        if a == b {
            return 0;
        }
        self.edges.get(&ordered_pair(a, b)).copied().unwrap_or(0)
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.nodes.contains(id)
    }

    pub fn has_edge(&self, a: &str, b: &str) -> bool {
        self.weight(a, b) > 0
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Sum of all edge weights
    pub fn total_weight(&self) -> u64 {
        self.edges.values().map(|&w| w as u64).sum()
    }

    /// Weighted degree of a node (sum of incident edge weights)
    pub fn degree(&self, id: &str) -> u64 {
        self.edges
            .iter()
            .filter(|((a, b), _)| a == id || b == id)
            .map(|(_, &w)| w as u64)
            .sum()
    }

    /// Nodes in lexicographic order
    pub fn nodes(&self) -> impl Iterator<Item = &ShapeId> {
        self.nodes.iter()
    }

    /// Edges as (a, b, weight) triples, a < b, in lexicographic order
    pub fn edges(&self) -> impl Iterator<Item = (&ShapeId, &ShapeId, u32)> {
        self.edges.iter().map(|((a, b), &w)| (a, b, w))
    }

    /// Neighbors of a node together with the connecting edge weight
    pub fn neighbors(&self, id: &str) -> Vec<(&ShapeId, u32)> {
        self.edges
            .iter()
            .filter_map(|((a, b), &w)| {
                if a == id {
                    Some((b, w))
                } else if b == id {
                    Some((a, w))
                } else {
                    None
                }
            })
            .collect()
    }

    /// Remove a node and every edge incident to it
    pub fn remove_node(&mut self, id: &str) {
        if self.nodes.remove(id) {
            self.edges.retain(|(a, b), _| a != id && b != id);
        }
    }

    /// Strip degenerate nodes (identifier length < 2) and their incident
    /// edges. Run once before a built graph is considered final.
    pub fn strip_degenerate(&mut self) {
        let degenerate: Vec<ShapeId> = self
            .nodes
            .iter()
            .filter(|id| id.len() < 2)
            .cloned()
            .collect();
        for id in degenerate {
            self.remove_node(&id);
        }
    }

    /// Symmetric adjacency matrix plus the node index assignment used to
    /// build it. The index assignment is stable for the lifetime of the
    /// returned pair.
    pub fn adjacency_matrix(&self) -> (Vec<ShapeId>, Vec<Vec<f64>>) {
        let ids: Vec<ShapeId> = self.nodes.iter().cloned().collect();
        let index: HashMap<&str, usize> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.as_str(), i))
            .collect();

        let n = ids.len();
        let mut matrix = vec![vec![0.0; n]; n];
        for ((a, b), &w) in &self.edges {
            let (i, j) = (index[a.as_str()], index[b.as_str()]);
            matrix[i][j] = w as f64;
            matrix[j][i] = w as f64;
        }

        (ids, matrix)
    }
}

/// A community assignment over every node of one graph, plus the
/// modularity score of that assignment. Recomputed per request, never
/// persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    /// Node -> community id; ids are contiguous starting at 0
    pub membership: BTreeMap<ShapeId, u32>,
    /// Modularity Q of this assignment
    pub modularity: f64,
    /// Number of distinct communities
    pub community_count: u32,
}

impl Partition {
    /// Members of each community, keyed by community id
    pub fn communities(&self) -> BTreeMap<u32, Vec<&ShapeId>> {
        let mut out: BTreeMap<u32, Vec<&ShapeId>> = BTreeMap::new();
        for (node, &community) in &self.membership {
            out.entry(community).or_default().push(node);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_weight_accumulates() {
        let mut g = ShapeGraph::new();
        g.increment_edge("UR", "DL");
        g.increment_edge("DL", "UR");
        assert_eq!(g.weight("UR", "DL"), 2);
        assert_eq!(g.weight("DL", "UR"), 2);
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.node_count(), 2);
    }

    #[test]
    fn test_no_self_loops() {
        let mut g = ShapeGraph::new();
        g.increment_edge("UR", "UR");
        assert_eq!(g.edge_count(), 0);
        assert_eq!(g.weight("UR", "UR"), 0);
    }

    #[test]
    fn test_strip_degenerate_removes_incident_edges() {
        let mut g = ShapeGraph::new();
        g.increment_edge("X", "UR");
        g.increment_edge("UR", "DL");
        g.strip_degenerate();
        assert!(!g.has_node("X"));
        assert!(!g.has_edge("X", "UR"));
        assert_eq!(g.weight("UR", "DL"), 1);
        assert_eq!(g.node_count(), 2);
    }

    #[test]
    fn test_canonical_equality_under_permuted_insertion() {
        let mut a = ShapeGraph::new();
        a.increment_edge("UR", "DL");
        a.increment_edge("DL", "RD");

        let mut b = ShapeGraph::new();
        b.increment_edge("RD", "DL");
        b.increment_edge("DL", "UR");

        assert_eq!(a, b);
    }

    #[test]
    fn test_adjacency_matrix_symmetric() {
        let mut g = ShapeGraph::new();
        g.increment_edge("UR", "DL");
        g.increment_edge("UR", "DL");
        g.increment_edge("UR", "RD");

        let (ids, matrix) = g.adjacency_matrix();
        assert_eq!(ids.len(), 3);
        for i in 0..ids.len() {
            for j in 0..ids.len() {
                assert_eq!(matrix[i][j], matrix[j][i]);
            }
            assert_eq!(matrix[i][i], 0.0);
        }
        assert_eq!(g.degree("UR"), 3);
        assert_eq!(g.total_weight(), 3);
    }

    #[test]
    fn test_from_parts_round_trip() {
        let mut g = ShapeGraph::new();
        g.add_node("LONE");
        g.increment_edge("UR", "DL");

        let nodes: Vec<_> = g.nodes().cloned().collect();
        let edges: Vec<_> = g
            .edges()
            .map(|(a, b, w)| (a.clone(), b.clone(), w))
            .collect();
        let rebuilt = ShapeGraph::from_parts(nodes, edges);
        assert_eq!(g, rebuilt);
    }
}
