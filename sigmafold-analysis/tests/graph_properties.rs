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

//! Property tests for graph construction: permutation invariance and
//! weight symmetry over arbitrary record populations.

use proptest::prelude::*;
use sigmafold_analysis::build_graph;
use sigmafold_core::{RecordSet, SequenceRecord, ShapeRecord};

fn record(id: usize, sequence: String, mapping: String) -> SequenceRecord {
    SequenceRecord {
        sequence_id: id.to_string(),
        sequence,
        degeneracy: 1,
        length: 8,
        energy: 0.0,
        shape_mapping: mapping,
        path: String::new(),
    }
}

/// A small pool of shape ids, including a degenerate one
fn shape_id_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("UR".to_string()),
        Just("DL".to_string()),
        Just("RD".to_string()),
        Just("LU".to_string()),
        Just("URD".to_string()),
        Just("X".to_string()),
    ]
}

fn record_set_strategy() -> impl Strategy<Value = RecordSet> {
    let row = ("[a-d]{3}", shape_id_strategy());
    prop::collection::vec(row, 0..40).prop_map(|rows| {
        let sequences = rows
            .into_iter()
            .enumerate()
            .map(|(i, (sequence, mapping))| record(i, sequence, mapping))
            .collect();
        let shapes = vec![
            ShapeRecord::new("UR"),
            ShapeRecord::new("DL"),
            ShapeRecord::new("RD"),
            ShapeRecord::new("X"),
        ];
        RecordSet::new(sequences, shapes)
    })
}

proptest! {
    #[test]
    fn prop_build_is_permutation_invariant(records in record_set_strategy(), seed in any::<u64>()) {
        let baseline = build_graph(10, &records).unwrap();

        let mut shuffled = records.clone();
        // deterministic shuffle driven by the seed
        let len = shuffled.sequences.len();
        if len > 1 {
            for i in (1..len).rev() {
                let j = (seed as usize).wrapping_mul(i.wrapping_add(7)) % (i + 1);
                shuffled.sequences.swap(i, j);
            }
        }
        shuffled.shapes.reverse();

        let permuted = build_graph(10, &shuffled).unwrap();
        prop_assert_eq!(baseline, permuted);
    }

    #[test]
    fn prop_weights_symmetric_and_no_degenerate_nodes(records in record_set_strategy()) {
        let graph = build_graph(10, &records).unwrap();

        for node in graph.nodes() {
            prop_assert!(node.len() >= 2);
        }
        let edges: Vec<_> = graph.edges().map(|(a, b, w)| (a.clone(), b.clone(), w)).collect();
        for (a, b, w) in edges {
            prop_assert!(w > 0);
            prop_assert_eq!(graph.weight(&a, &b), graph.weight(&b, &a));
        }
    }
}
