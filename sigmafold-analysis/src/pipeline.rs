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

//! Analysis pipeline
//!
//! Wires the record store, graph cache, builder, detector, and layout
//! engine together behind the two entry points the presentation layer
//! calls: "(re)build graph for n" and "partition graph for n". Graphs are
//! read-through/write-through cached against the fingerprint of the
//! records they were built from; partitions and layouts are recomputed on
//! every request and never persisted.

use crate::builder::build_graph;
use crate::layout::spring_layout;
use crate::leiden::LeidenDetector;
use sigmafold_core::{
    decode_shapes, AnalysisConfig, DecodeReport, Partition, RecordSet, Result, ShapeDecoder,
    ShapeGraph, ShapeId,
};
use sigmafold_storage::{record_fingerprint, GraphCache, RecordStore, UpstreamSource};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// The analysis pipeline for one data directory
pub struct Pipeline<S> {
    config: AnalysisConfig,
    store: RecordStore<S>,
    cache: GraphCache,
}

impl<S: UpstreamSource> Pipeline<S> {
    pub fn new(config: AnalysisConfig, source: S) -> Self {
        let store = RecordStore::new(&config.data_dir, source);
        let cache = GraphCache::new(&config.data_dir);
        Self {
            config,
            store,
            cache,
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Record collections for `n`, fetched or loaded once per process
    pub fn records(&self, n: u32) -> Result<Arc<RecordSet>> {
        self.config.validate_n(n)?;
        self.store.fetch(n)
    }

    /// The co-occurrence graph for `n`: cached copy when the records have
    /// not changed, otherwise a cold build that is persisted immediately
    pub fn graph(&self, n: u32) -> Result<ShapeGraph> {
        self.config.validate_n(n)?;
        let records = self.store.fetch(n)?;
        let fingerprint = record_fingerprint(&records);

        if let Some(graph) = self.cache.load(n, &fingerprint) {
            return Ok(graph);
        }
        self.build_and_store(n, &records, &fingerprint)
    }

    /// Force a cold build for `n`, replacing whatever the cache holds
    pub fn rebuild(&self, n: u32) -> Result<ShapeGraph> {
        self.config.validate_n(n)?;
        let records = self.store.fetch(n)?;
        let fingerprint = record_fingerprint(&records);
        self.build_and_store(n, &records, &fingerprint)
    }

    fn build_and_store(
        &self,
        n: u32,
        records: &RecordSet,
        fingerprint: &str,
    ) -> Result<ShapeGraph> {
        let graph = build_graph(n, records)?;
        info!(
            n,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "built co-occurrence graph"
        );
        self.cache.store(n, fingerprint, &graph)?;
        Ok(graph)
    }

    /// Partition the graph for `n` into communities; recomputed per call
    pub fn partition(&self, n: u32) -> Result<Partition> {
        let graph = self.graph(n)?;
        let partition =
            LeidenDetector::with_config(self.config.detect.clone()).partition(n, &graph)?;
        info!(
            n,
            communities = partition.community_count,
            modularity = partition.modularity,
            "partitioned graph"
        );
        Ok(partition)
    }

    /// Spring embedding of the graph for `n`; recomputed per call
    pub fn layout(&self, n: u32) -> Result<BTreeMap<ShapeId, (f64, f64)>> {
        let graph = self.graph(n)?;
        spring_layout(n, &graph, &self.config.layout)
    }

    /// Decode every graph node's shape to its matrix form, reporting
    /// per-shape failures instead of aborting
    pub fn shape_matrices(&self, n: u32, decoder: &dyn ShapeDecoder) -> Result<DecodeReport> {
        let graph = self.graph(n)?;
        Ok(decode_shapes(decoder, graph.nodes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigmafold_core::SigmafoldError;

    struct EmptyUpstream;

    impl UpstreamSource for EmptyUpstream {
        fn fetch_sequence_data(&self, _n: u32) -> Result<Vec<sigmafold_core::SequenceRecord>> {
            Ok(vec![])
        }

        fn fetch_shape_data(&self, _n: u32) -> Result<Vec<sigmafold_core::ShapeRecord>> {
            Ok(vec![])
        }
    }

    fn pipeline_in(dir: &std::path::Path) -> Pipeline<EmptyUpstream> {
        let config = AnalysisConfig {
            data_dir: dir.to_path_buf(),
            ..Default::default()
        };
        Pipeline::new(config, EmptyUpstream)
    }

    #[test]
    fn test_out_of_range_n_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline_in(dir.path());
        assert!(matches!(
            pipeline.graph(7),
            Err(SigmafoldError::OutOfRange { n: 7, min: 8, max: 14 })
        ));
        assert!(matches!(
            pipeline.partition(15),
            Err(SigmafoldError::OutOfRange { n: 15, .. })
        ));
    }

    #[test]
    fn test_empty_records_build_empty_graph_and_partition_fails() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline_in(dir.path());

        let graph = pipeline.graph(10).unwrap();
        assert!(graph.is_empty());

        assert!(matches!(
            pipeline.partition(10),
            Err(SigmafoldError::EmptyGraph { n: 10 })
        ));
    }
}
