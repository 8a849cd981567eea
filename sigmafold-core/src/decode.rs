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

//! Shape decoder contract
//!
//! Decoding a shape identifier into its 2-D occupancy matrix is the job of
//! an external collaborator; only the contract lives here. A malformed
//! identifier fails that one shape, never the pipeline: per-item outcomes
//! are collected into a [`DecodeReport`] so callers can observe partial
//! failure instead of having it swallowed.

use crate::error::DecodeError;
use crate::records::ShapeId;
use ndarray::Array2;
use std::collections::BTreeMap;
use tracing::warn;

/// Turns a shape identifier into a 2-D numeric matrix for visualization
pub trait ShapeDecoder {
    fn decode(&self, shape_id: &str) -> Result<Array2<f64>, DecodeError>;
}

/// Per-shape decode outcomes for one batch
#[derive(Debug, Clone, Default)]
pub struct DecodeReport {
    /// Successfully decoded matrices, keyed by shape id
    pub matrices: BTreeMap<ShapeId, Array2<f64>>,
    /// Shapes that failed to decode
    pub failures: Vec<DecodeError>,
}

impl DecodeReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Decode a batch of shape identifiers, collecting per-item results.
///
/// Failures are logged at `warn` and reported; they do not abort the batch.
pub fn decode_shapes<'a, D, I>(decoder: &D, shape_ids: I) -> DecodeReport
where
    D: ShapeDecoder + ?Sized,
    I: IntoIterator<Item = &'a ShapeId>,
{
    let mut report = DecodeReport::default();
    for shape_id in shape_ids {
        match decoder.decode(shape_id) {
            Ok(matrix) => {
                report.matrices.insert(shape_id.clone(), matrix);
            }
            Err(err) => {
                warn!(shape_id = %err.shape_id, reason = %err.reason, "shape decode failed");
                report.failures.push(err);
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedDecoder;

    impl ShapeDecoder for FixedDecoder {
        fn decode(&self, shape_id: &str) -> Result<Array2<f64>, DecodeError> {
            if shape_id.contains('?') {
                Err(DecodeError::new(shape_id, "unknown symbol"))
            } else {
                Ok(Array2::zeros((2, 2)))
            }
        }
    }

    #[test]
    fn test_partial_failure_is_reported() {
        let ids: Vec<ShapeId> = vec!["UR".into(), "D?".into(), "DL".into()];
        let report = decode_shapes(&FixedDecoder, &ids);

        assert_eq!(report.matrices.len(), 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].shape_id, "D?");
        assert!(!report.is_complete());
    }

    #[test]
    fn test_all_ok_is_complete() {
        let ids: Vec<ShapeId> = vec!["UR".into(), "DL".into()];
        let report = decode_shapes(&FixedDecoder, &ids);
        assert!(report.is_complete());
        assert_eq!(report.matrices.len(), 2);
    }
}
