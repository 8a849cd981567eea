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

//! Co-occurrence graph construction
//!
//! Every sequence groups the folding instances that share its `sequence`
//! value; each unordered pair of shape mappings inside one group adds one
//! to the weight of the edge between those shapes. Duplicate mappings in a
//! group pair against every other row, so recurring shape pairs amplify
//! weight; self-pairs never create a loop. Degenerate shape ids (length
//! < 2) are stripped, with their incident edges, before the graph is
//! returned.

use sigmafold_core::{RecordSet, Result, ShapeGraph, SigmafoldError};
use std::collections::HashMap;
use tracing::debug;

/// Build the shape co-occurrence graph for chain length `n` from its
/// record collections.
///
/// Deterministic for identically-ordered input and invariant under input
/// permutation: weight summation is commutative and the graph stores
/// edges canonically.
pub fn build_graph(n: u32, records: &RecordSet) -> Result<ShapeGraph> {
    let mut graph = ShapeGraph::new();

    // Nodes come from the shape collection; degenerate placeholders are
    // left out up front.
    for shape in &records.shapes {
        if !shape.is_degenerate() {
            graph.add_node(shape.shape_id.clone());
        }
    }

    // Group folding instances by sequence value, preserving multiplicity
    // and encounter order within each group.
    let mut groups: HashMap<&str, Vec<&str>> = HashMap::new();
    for record in &records.sequences {
        if record.sequence.is_empty() {
            return Err(SigmafoldError::InvalidRecord {
                n,
                reason: format!("record '{}' has an empty sequence", record.sequence_id),
            });
        }
        if record.shape_mapping.is_empty() {
            return Err(SigmafoldError::InvalidRecord {
                n,
                reason: format!("record '{}' has no shape_mapping", record.sequence_id),
            });
        }
        groups
            .entry(record.sequence.as_str())
            .or_default()
            .push(record.shape_mapping.as_str());
    }

    for (sequence, mappings) in &groups {
        debug!(sequence, instances = mappings.len(), "pairing folding instances");
        for i in 0..mappings.len() {
            for j in (i + 1)..mappings.len() {
                // increment_edge skips self-pairs, so a sequence folding
                // into the same shape twice adds no loop
                graph.increment_edge(mappings[i], mappings[j]);
            }
        }
    }

    // Edge pairing creates nodes implicitly, so degenerate ids referenced
    // only by mappings can still be present at this point.
    graph.strip_degenerate();

    Ok(graph)
}
