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

//! Sequence and shape record types
//!
//! A sequence record describes one folding instance of a symbolic chain:
//! the same `sequence` value may appear in several records, each naming a
//! different `shape_mapping`. A shape record names a folded conformation;
//! identifiers shorter than two symbols are degenerate placeholders and are
//! excluded from any final graph.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identifier of a folded conformation; its structure encodes the geometry
pub type ShapeId = String;

/// Canonical column order for persisted sequence records
pub const SEQUENCE_COLUMNS: [&str; 7] = [
    "sequence_id",
    "sequence",
    "degeneracy",
    "length",
    "energy",
    "shape_mapping",
    "path",
];

/// One folding instance of a sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceRecord {
    /// Upstream row identifier
    pub sequence_id: String,
    /// The symbol string that folds
    pub sequence: String,
    /// Count of equivalent foldings
    pub degeneracy: u64,
    /// Chain length
    pub length: u32,
    /// Folding energy
    pub energy: f64,
    /// Shape this folding instance resolves to
    pub shape_mapping: ShapeId,
    /// Auxiliary provenance data
    pub path: String,
}

/// A folded conformation plus presentation-only metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeRecord {
    /// Shape identifier; length < 2 marks a degenerate placeholder
    pub shape_id: ShapeId,
    /// Extra upstream columns, round-tripped opaquely for presentation
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl ShapeRecord {
    pub fn new(shape_id: impl Into<ShapeId>) -> Self {
        Self {
            shape_id: shape_id.into(),
            metadata: BTreeMap::new(),
        }
    }

    /// Degenerate shapes never become graph nodes
    pub fn is_degenerate(&self) -> bool {
        self.shape_id.len() < 2
    }
}

/// Both record collections for one chain length, treated as read-only
/// inputs once fetched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSet {
    pub sequences: Vec<SequenceRecord>,
    pub shapes: Vec<ShapeRecord>,
}

impl RecordSet {
    pub fn new(sequences: Vec<SequenceRecord>, shapes: Vec<ShapeRecord>) -> Self {
        Self { sequences, shapes }
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty() && self.shapes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_shape() {
        assert!(ShapeRecord::new("X").is_degenerate());
        assert!(ShapeRecord::new("").is_degenerate());
        assert!(!ShapeRecord::new("UR").is_degenerate());
    }

    #[test]
    fn test_sequence_columns_order() {
        assert_eq!(SEQUENCE_COLUMNS[0], "sequence_id");
        assert_eq!(SEQUENCE_COLUMNS[5], "shape_mapping");
        assert_eq!(SEQUENCE_COLUMNS.len(), 7);
    }
}
