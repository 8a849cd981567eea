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

//! Benchmark for graph construction and community detection over a
//! synthetic record population.
//!
//! Run with: cargo bench -p sigmafold-analysis --bench build_bench

use sigmafold_analysis::{build_graph, LeidenDetector};
use sigmafold_core::{RecordSet, SequenceRecord, ShapeRecord};
use std::time::Instant;

fn synthetic_records(sequence_count: usize, shapes_per_sequence: usize) -> RecordSet {
    let shape_pool: Vec<String> = (0..200).map(|i| format!("SHAPE{i:03}")).collect();

    let mut sequences = Vec::new();
    let mut id = 0usize;
    for s in 0..sequence_count {
        let sequence = format!("SEQ{s:05}");
        for k in 0..shapes_per_sequence {
            // deterministic spread over the shape pool
            let shape = &shape_pool[(s * 31 + k * 17) % shape_pool.len()];
            id += 1;
            sequences.push(SequenceRecord {
                sequence_id: id.to_string(),
                sequence: sequence.clone(),
                degeneracy: 1,
                length: 12,
                energy: -4.0,
                shape_mapping: shape.clone(),
                path: String::new(),
            });
        }
    }

    let shapes = shape_pool.into_iter().map(ShapeRecord::new).collect();
    RecordSet::new(sequences, shapes)
}

fn bench_build(records: &RecordSet) {
    println!("\n=== Graph Build Benchmark ===");
    let iterations = 20;

    let start = Instant::now();
    let mut nodes = 0;
    let mut edges = 0;
    for _ in 0..iterations {
        let graph = build_graph(12, records).expect("build succeeds");
        nodes = graph.node_count();
        edges = graph.edge_count();
    }
    let elapsed = start.elapsed();

    println!(
        "build: {} records -> {} nodes / {} edges, {:?}/iter",
        records.sequences.len(),
        nodes,
        edges,
        elapsed / iterations
    );
}

fn bench_partition(records: &RecordSet) {
    println!("\n=== Community Detection Benchmark ===");
    let graph = build_graph(12, records).expect("build succeeds");
    let detector = LeidenDetector::new();
    let iterations = 10;

    let start = Instant::now();
    let mut communities = 0;
    for _ in 0..iterations {
        let partition = detector.partition(12, &graph).expect("partition succeeds");
        communities = partition.community_count;
    }
    let elapsed = start.elapsed();

    println!(
        "partition: {} nodes -> {} communities, {:?}/iter",
        graph.node_count(),
        communities,
        elapsed / iterations
    );
}

fn main() {
    let records = synthetic_records(2000, 4);
    bench_build(&records);
    bench_partition(&records);
}
