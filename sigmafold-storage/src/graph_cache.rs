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

//! Graph persistence
//!
//! Persists a built co-occurrence graph as a node/edge list keyed by `n`,
//! stamped with the fingerprint of the record collections it was built
//! from. A load only hits when the stored fingerprint matches the current
//! records, so stale upstream data cannot mask as a valid graph. Corrupt
//! or stale files are misses, never errors.

use crate::atomic::write_json_atomic;
use serde::{Deserialize, Serialize};
use sigmafold_core::{Result, ShapeGraph, ShapeId};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const GRAPH_FILE_VERSION: u32 = 1;

/// On-disk graph representation
#[derive(Debug, Serialize, Deserialize)]
struct GraphFile {
    version: u32,
    n: u32,
    fingerprint: String,
    nodes: Vec<ShapeId>,
    edges: Vec<(ShapeId, ShapeId, u32)>,
}

/// Disk-backed memo for built graphs, one file per chain length
pub struct GraphCache {
    cache_dir: PathBuf,
}

impl GraphCache {
    pub fn new<P: AsRef<Path>>(cache_dir: P) -> Self {
        Self {
            cache_dir: cache_dir.as_ref().to_path_buf(),
        }
    }

    fn graph_path(&self, n: u32) -> PathBuf {
        self.cache_dir.join(format!("graph_{n}.json"))
    }

    /// Restore the graph for `n` if a cached copy exists and was built
    /// from records with the given fingerprint
    pub fn load(&self, n: u32, fingerprint: &str) -> Option<ShapeGraph> {
        let path = self.graph_path(n);
        if !path.exists() {
            debug!(n, "no cached graph");
            return None;
        }

        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!(n, path = %path.display(), error = %e, "graph cache unreadable, rebuilding");
                return None;
            }
        };

        let file: GraphFile = match serde_json::from_str(&contents) {
            Ok(file) => file,
            Err(e) => {
                warn!(n, path = %path.display(), error = %e, "graph cache corrupt, rebuilding");
                return None;
            }
        };

        if file.version != GRAPH_FILE_VERSION {
            warn!(n, version = file.version, "graph cache version mismatch, rebuilding");
            return None;
        }
        if file.fingerprint != fingerprint {
            warn!(n, "graph cache stale (record fingerprint changed), rebuilding");
            return None;
        }

        let graph = ShapeGraph::from_parts(file.nodes, file.edges);
        info!(
            n,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "loaded graph from cache"
        );
        Some(graph)
    }

    /// Persist the graph for `n`, stamped with the record fingerprint
    pub fn store(&self, n: u32, fingerprint: &str, graph: &ShapeGraph) -> Result<()> {
        let file = GraphFile {
            version: GRAPH_FILE_VERSION,
            n,
            fingerprint: fingerprint.to_string(),
            nodes: graph.nodes().cloned().collect(),
            edges: graph
                .edges()
                .map(|(a, b, w)| (a.clone(), b.clone(), w))
                .collect(),
        };

        write_json_atomic(&self.graph_path(n), &file)?;
        info!(
            n,
            nodes = file.nodes.len(),
            edges = file.edges.len(),
            "stored graph to cache"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_graph() -> ShapeGraph {
        let mut g = ShapeGraph::new();
        g.add_node("LONE");
        g.increment_edge("UR", "DL");
        g.increment_edge("UR", "DL");
        g.increment_edge("DL", "RD");
        g
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = GraphCache::new(dir.path());
        let graph = sample_graph();

        cache.store(10, "fp", &graph).unwrap();
        let loaded = cache.load(10, "fp").unwrap();
        assert_eq!(loaded, graph);
    }

    #[test]
    fn test_absent_is_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = GraphCache::new(dir.path());
        assert!(cache.load(10, "fp").is_none());
    }

    #[test]
    fn test_fingerprint_mismatch_is_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = GraphCache::new(dir.path());
        cache.store(10, "fp-old", &sample_graph()).unwrap();
        assert!(cache.load(10, "fp-new").is_none());
        assert!(cache.load(10, "fp-old").is_some());
    }

    #[test]
    fn test_corrupt_file_is_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = GraphCache::new(dir.path());
        std::fs::write(dir.path().join("graph_10.json"), "{broken").unwrap();
        assert!(cache.load(10, "fp").is_none());
    }

    #[test]
    fn test_keyed_by_n() {
        let dir = tempfile::tempdir().unwrap();
        let cache = GraphCache::new(dir.path());
        cache.store(10, "fp", &sample_graph()).unwrap();
        assert!(cache.load(11, "fp").is_none());
    }
}
