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

//! Sigmafold Storage
//!
//! Disk-backed memoization for record collections and built graphs.
//! Cache files are JSON on durable storage; every write goes through an
//! atomic write-then-rename so a concurrent reader never sees a partial
//! file. Any cache file that fails to parse is treated as a miss and the
//! cold path runs instead.

mod atomic;
pub mod columnar;
pub mod fingerprint;
pub mod graph_cache;
pub mod record_store;

pub use columnar::{ColumnarError, ColumnarTable};
pub use fingerprint::record_fingerprint;
pub use graph_cache::GraphCache;
pub use record_store::{FileUpstream, RecordStore, UpstreamSource};
