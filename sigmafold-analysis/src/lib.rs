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

//! Sigmafold Analysis
//!
//! The algorithmic core: turns sequence/shape records into a weighted
//! co-occurrence graph, partitions it into communities by modularity
//! optimization, and computes a force-directed 2-D embedding. The
//! [`pipeline::Pipeline`] wires these onto the storage layer and exposes
//! the two mutating entry points the presentation layer calls.

pub mod builder;
pub mod layout;
pub mod leiden;
pub mod pipeline;

pub use builder::build_graph;
pub use layout::spring_layout;
pub use leiden::LeidenDetector;
pub use pipeline::Pipeline;
