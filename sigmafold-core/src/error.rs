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

//! Error taxonomy for the analysis pipeline
//!
//! Every failure carries the chain length `n` it occurred for, so callers
//! can tell "no data available" apart from "data available but malformed"
//! from "one shape failed to decode". Cache-file corruption is deliberately
//! absent here: a cache file that fails to parse is treated as a miss by
//! the storage layer, not propagated.

use thiserror::Error;

/// Result type for sigmafold operations
pub type Result<T> = std::result::Result<T, SigmafoldError>;

/// Errors that can occur in the analysis pipeline
#[derive(Debug, Error)]
pub enum SigmafoldError {
    /// Neither the on-disk cache nor the upstream source could supply
    /// record collections for this chain length
    #[error("no sequence or shape data available for n={n}")]
    DataUnavailable { n: u32 },

    /// A malformed sequence record aborts the build rather than being
    /// silently dropped
    #[error("invalid record for n={n}: {reason}")]
    InvalidRecord { n: u32, reason: String },

    /// A shape identifier could not be decoded to a matrix; recoverable
    /// per-shape, never fatal to graph construction
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Partitioning or layout requested on a graph with no nodes
    #[error("graph for n={n} has no nodes")]
    EmptyGraph { n: u32 },

    /// Chain length outside the configured closed range
    #[error("n={n} outside supported range [{min}, {max}]")]
    OutOfRange { n: u32, min: u32, max: u32 },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A shape identifier that could not be decoded to its matrix form
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("shape id '{shape_id}' could not be decoded: {reason}")]
pub struct DecodeError {
    /// The offending identifier
    pub shape_id: String,
    /// What went wrong
    pub reason: String,
}

impl DecodeError {
    pub fn new(shape_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            shape_id: shape_id.into(),
            reason: reason.into(),
        }
    }
}
