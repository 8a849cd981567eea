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

//! Record-collection fingerprinting
//!
//! The graph cache is only valid for the exact records it was built from,
//! so cached graphs carry a fingerprint of the input collections instead of
//! relying on file presence alone. The fingerprint is order-insensitive:
//! each record is hashed on its own and the sorted per-record digests are
//! folded into one blake3 hash, so a permuted upstream export fingerprints
//! identically.
//!
//! Records are hashed through a canonical byte encoding (length-prefixed
//! strings, little-endian integers, `f64::to_bits` for energy) rather than
//! a serialized form, so any field value a source can produce hashes,
//! including non-finite floats.

use sigmafold_core::{RecordSet, SequenceRecord, ShapeRecord};

// Domain separators so a sequence record and a shape record with
// coincidentally equal bytes hash differently
const TAG_SEQUENCE: &[u8] = &[0];
const TAG_SHAPE: &[u8] = &[1];

/// Hex-encoded blake3 fingerprint of both record collections
pub fn record_fingerprint(records: &RecordSet) -> String {
    let mut digests: Vec<[u8; 32]> =
        Vec::with_capacity(records.sequences.len() + records.shapes.len());

    for record in &records.sequences {
        digests.push(hash_sequence(record));
    }
    for record in &records.shapes {
        digests.push(hash_shape(record));
    }
    digests.sort_unstable();

    let mut hasher = blake3::Hasher::new();
    for digest in &digests {
        hasher.update(digest);
    }
    hex::encode(hasher.finalize().as_bytes())
}

fn hash_sequence(record: &SequenceRecord) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    hasher.update(TAG_SEQUENCE);
    update_str(&mut hasher, &record.sequence_id);
    update_str(&mut hasher, &record.sequence);
    hasher.update(&record.degeneracy.to_le_bytes());
    hasher.update(&record.length.to_le_bytes());
    hasher.update(&record.energy.to_bits().to_le_bytes());
    update_str(&mut hasher, &record.shape_mapping);
    update_str(&mut hasher, &record.path);
    *hasher.finalize().as_bytes()
}

fn hash_shape(record: &ShapeRecord) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    hasher.update(TAG_SHAPE);
    update_str(&mut hasher, &record.shape_id);
    // BTreeMap iterates in key order, so the encoding is canonical
    for (key, value) in &record.metadata {
        update_str(&mut hasher, key);
        update_str(&mut hasher, &value.to_string());
    }
    *hasher.finalize().as_bytes()
}

/// Length-prefixed string bytes, so adjacent fields cannot alias
fn update_str(hasher: &mut blake3::Hasher, s: &str) {
    hasher.update(&(s.len() as u64).to_le_bytes());
    hasher.update(s.as_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigmafold_core::{SequenceRecord, ShapeRecord};

    fn record(id: &str, sequence: &str, mapping: &str) -> SequenceRecord {
        SequenceRecord {
            sequence_id: id.into(),
            sequence: sequence.into(),
            degeneracy: 1,
            length: sequence.len() as u32,
            energy: -1.0,
            shape_mapping: mapping.into(),
            path: String::new(),
        }
    }

    #[test]
    fn test_order_insensitive() {
        let a = RecordSet::new(
            vec![record("1", "HP", "UR"), record("2", "PH", "DL")],
            vec![ShapeRecord::new("UR"), ShapeRecord::new("DL")],
        );
        let b = RecordSet::new(
            vec![record("2", "PH", "DL"), record("1", "HP", "UR")],
            vec![ShapeRecord::new("DL"), ShapeRecord::new("UR")],
        );
        assert_eq!(record_fingerprint(&a), record_fingerprint(&b));
    }

    #[test]
    fn test_content_sensitive() {
        let a = RecordSet::new(vec![record("1", "HP", "UR")], vec![]);
        let b = RecordSet::new(vec![record("1", "HP", "RD")], vec![]);
        assert_ne!(record_fingerprint(&a), record_fingerprint(&b));
    }

    #[test]
    fn test_adjacent_fields_do_not_alias() {
        // "AB" + "C" must not hash like "A" + "BC"
        let a = RecordSet::new(vec![record("1", "AB", "C1")], vec![]);
        let b = RecordSet::new(vec![record("1A", "B", "C1")], vec![]);
        assert_ne!(record_fingerprint(&a), record_fingerprint(&b));
    }

    #[test]
    fn test_non_finite_energy_hashes() {
        let mut with_nan = record("1", "HP", "UR");
        with_nan.energy = f64::NAN;
        let mut with_inf = record("1", "HP", "UR");
        with_inf.energy = f64::INFINITY;

        let nan_fp = record_fingerprint(&RecordSet::new(vec![with_nan], vec![]));
        let inf_fp = record_fingerprint(&RecordSet::new(vec![with_inf], vec![]));
        let finite_fp = record_fingerprint(&RecordSet::new(vec![record("1", "HP", "UR")], vec![]));
        assert_ne!(nan_fp, inf_fp);
        assert_ne!(nan_fp, finite_fp);
    }

    #[test]
    fn test_metadata_participates() {
        let plain = ShapeRecord::new("UR");
        let mut tagged = ShapeRecord::new("UR");
        tagged
            .metadata
            .insert("compactness".into(), serde_json::json!(0.8));

        let a = record_fingerprint(&RecordSet::new(vec![], vec![plain]));
        let b = record_fingerprint(&RecordSet::new(vec![], vec![tagged]));
        assert_ne!(a, b);
    }

    #[test]
    fn test_hex_encoded_32_bytes() {
        let fp = record_fingerprint(&RecordSet::new(vec![], vec![]));
        assert_eq!(fp.len(), 64);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
