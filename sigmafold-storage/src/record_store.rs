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

//! Record store with transparent on-disk caching
//!
//! Supplies both record collections for a chain length `n`. Lookup order:
//! in-process memo, then the columnar cache files, then the upstream
//! source. A cold fetch persists both collections so the next process run
//! never touches upstream; a warm fetch must not invoke the source at all.
//! Corrupt cache files are logged and treated as misses.

use crate::atomic::write_json_atomic;
use crate::columnar::ColumnarTable;
use parking_lot::RwLock;
use sigmafold_core::{RecordSet, Result, SequenceRecord, ShapeRecord, SigmafoldError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Read-only boundary to the upstream data source. Transport and schema
/// are the collaborator's business; implementations only have to answer
/// the two bulk queries.
pub trait UpstreamSource {
    /// Fetch all sequence data for `n`
    fn fetch_sequence_data(&self, n: u32) -> Result<Vec<SequenceRecord>>;

    /// Fetch all shape data for `n`
    fn fetch_shape_data(&self, n: u32) -> Result<Vec<ShapeRecord>>;
}

/// Upstream adapter reading columnar export files from a directory
/// (`sequences_{n}.json` / `shapes_{n}.json`)
pub struct FileUpstream {
    root: PathBuf,
}

impl FileUpstream {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn read_table(&self, file: String) -> Result<ColumnarTable> {
        let path = self.root.join(file);
        let contents = std::fs::read_to_string(&path)?;
        serde_json::from_str(&contents)
            .map_err(|e| SigmafoldError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
    }
}

impl UpstreamSource for FileUpstream {
    fn fetch_sequence_data(&self, n: u32) -> Result<Vec<SequenceRecord>> {
        self.read_table(format!("sequences_{n}.json"))?
            .to_sequences()
            .map_err(|e| SigmafoldError::InvalidRecord {
                n,
                reason: e.to_string(),
            })
    }

    fn fetch_shape_data(&self, n: u32) -> Result<Vec<ShapeRecord>> {
        self.read_table(format!("shapes_{n}.json"))?
            .to_shapes()
            .map_err(|e| SigmafoldError::InvalidRecord {
                n,
                reason: e.to_string(),
            })
    }
}

/// Record collections for one process run: fetched or loaded once per `n`,
/// then shared read-only
pub struct RecordStore<S> {
    cache_dir: PathBuf,
    source: S,
    memo: RwLock<HashMap<u32, Arc<RecordSet>>>,
}

impl<S: UpstreamSource> RecordStore<S> {
    pub fn new<P: AsRef<Path>>(cache_dir: P, source: S) -> Self {
        Self {
            cache_dir: cache_dir.as_ref().to_path_buf(),
            source,
            memo: RwLock::new(HashMap::new()),
        }
    }

    fn sequences_path(&self, n: u32) -> PathBuf {
        self.cache_dir.join(format!("sequences_{n}.json"))
    }

    fn shapes_path(&self, n: u32) -> PathBuf {
        self.cache_dir.join(format!("shapes_{n}.json"))
    }

    /// Fetch both record collections for `n`
    pub fn fetch(&self, n: u32) -> Result<Arc<RecordSet>> {
        if let Some(records) = self.memo.read().get(&n) {
            debug!(n, "record memo hit");
            return Ok(Arc::clone(records));
        }

        let records = match self.load_cached(n) {
            Some(records) => {
                info!(
                    n,
                    sequences = records.sequences.len(),
                    shapes = records.shapes.len(),
                    "loaded records from cache"
                );
                records
            }
            None => self.fetch_upstream(n)?,
        };

        let records = Arc::new(records);
        self.memo.write().insert(n, Arc::clone(&records));
        Ok(records)
    }

    /// Load both cache files; any absence or parse failure is a miss
    fn load_cached(&self, n: u32) -> Option<RecordSet> {
        let seq_path = self.sequences_path(n);
        let shape_path = self.shapes_path(n);
        if !seq_path.exists() || !shape_path.exists() {
            return None;
        }

        let sequences = match read_table(&seq_path).and_then(|t| {
            t.to_sequences()
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        }) {
            Ok(records) => records,
            Err(e) => {
                warn!(n, path = %seq_path.display(), error = %e, "sequence cache unreadable, refetching");
                return None;
            }
        };

        let shapes = match read_table(&shape_path).and_then(|t| {
            t.to_shapes()
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        }) {
            Ok(records) => records,
            Err(e) => {
                warn!(n, path = %shape_path.display(), error = %e, "shape cache unreadable, refetching");
                return None;
            }
        };

        Some(RecordSet::new(sequences, shapes))
    }

    /// Query upstream for both collections and persist them
    fn fetch_upstream(&self, n: u32) -> Result<RecordSet> {
        let sequences = match self.source.fetch_sequence_data(n) {
            Ok(records) => records,
            Err(e) => {
                error!(n, error = %e, "upstream sequence fetch failed with no usable cache");
                return Err(SigmafoldError::DataUnavailable { n });
            }
        };
        let shapes = match self.source.fetch_shape_data(n) {
            Ok(records) => records,
            Err(e) => {
                error!(n, error = %e, "upstream shape fetch failed with no usable cache");
                return Err(SigmafoldError::DataUnavailable { n });
            }
        };

        write_json_atomic(
            &self.sequences_path(n),
            &ColumnarTable::from_sequences(&sequences),
        )?;
        write_json_atomic(&self.shapes_path(n), &ColumnarTable::from_shapes(&shapes))?;
        info!(
            n,
            sequences = sequences.len(),
            shapes = shapes.len(),
            "fetched records from upstream and cached"
        );

        Ok(RecordSet::new(sequences, shapes))
    }
}

fn read_table(path: &Path) -> std::io::Result<ColumnarTable> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}
