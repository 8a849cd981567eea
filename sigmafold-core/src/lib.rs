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

//! Sigmafold Core
//!
//! Fundamental data structures for shape co-occurrence analysis:
//! sequence/shape records, the weighted co-occurrence graph, the error
//! taxonomy, configuration, and the shape-decoder contract.

pub mod config;
pub mod decode;
pub mod error;
pub mod graph;
pub mod records;

pub use config::{AnalysisConfig, DetectorConfig, LayoutConfig};
pub use decode::{decode_shapes, DecodeReport, ShapeDecoder};
pub use error::{DecodeError, Result, SigmafoldError};
pub use graph::{Partition, ShapeGraph};
pub use records::{RecordSet, SequenceRecord, ShapeId, ShapeRecord, SEQUENCE_COLUMNS};
