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

//! Columnar record codec
//!
//! Self-describing split encoding for persisted record collections:
//! `{ "columns": [...], "data": [[cell, ...], ...] }`. Sequence files are
//! written in the canonical [`SEQUENCE_COLUMNS`] order and may be read in
//! any column order, but every canonical column must be present. Shape
//! files carry `shape_id` plus free presentation metadata columns that
//! round-trip opaquely.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sigmafold_core::{SequenceRecord, ShapeRecord, SEQUENCE_COLUMNS};
use std::collections::BTreeSet;
use thiserror::Error;

/// A decoded columnar file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnarTable {
    pub columns: Vec<String>,
    pub data: Vec<Vec<Value>>,
}

/// Structural problems in a columnar file
#[derive(Debug, Error)]
pub enum ColumnarError {
    #[error("missing column '{0}'")]
    MissingColumn(String),

    #[error("row {row}: column '{column}' has unexpected type")]
    BadCell { row: usize, column: String },

    #[error("row {row} has {got} cells, expected {want}")]
    RaggedRow { row: usize, got: usize, want: usize },
}

impl ColumnarTable {
    fn column_index(&self, name: &str) -> Result<usize, ColumnarError> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| ColumnarError::MissingColumn(name.to_string()))
    }

    fn cell<'a>(&self, row: &'a [Value], row_idx: usize, col: usize) -> Result<&'a Value, ColumnarError> {
        if row.len() != self.columns.len() {
            return Err(ColumnarError::RaggedRow {
                row: row_idx,
                got: row.len(),
                want: self.columns.len(),
            });
        }
        Ok(&row[col])
    }

    /// Encode sequence records in the canonical column order
    pub fn from_sequences(records: &[SequenceRecord]) -> Self {
        let data = records
            .iter()
            .map(|r| {
                vec![
                    Value::from(r.sequence_id.clone()),
                    Value::from(r.sequence.clone()),
                    Value::from(r.degeneracy),
                    Value::from(r.length),
                    Value::from(r.energy),
                    Value::from(r.shape_mapping.clone()),
                    Value::from(r.path.clone()),
                ]
            })
            .collect();
        Self {
            columns: SEQUENCE_COLUMNS.iter().map(|c| c.to_string()).collect(),
            data,
        }
    }

    /// Decode sequence records, accepting any column order but requiring
    /// every canonical column
    pub fn to_sequences(&self) -> Result<Vec<SequenceRecord>, ColumnarError> {
        let idx: Vec<usize> = SEQUENCE_COLUMNS
            .iter()
            .map(|name| self.column_index(name))
            .collect::<Result<_, _>>()?;

        let mut records = Vec::with_capacity(self.data.len());
        for (row_idx, row) in self.data.iter().enumerate() {
            records.push(SequenceRecord {
                sequence_id: as_string(self.cell(row, row_idx, idx[0])?, row_idx, "sequence_id")?,
                sequence: as_string(self.cell(row, row_idx, idx[1])?, row_idx, "sequence")?,
                degeneracy: as_u64(self.cell(row, row_idx, idx[2])?, row_idx, "degeneracy")?,
                length: as_u32(self.cell(row, row_idx, idx[3])?, row_idx, "length")?,
                energy: as_f64(self.cell(row, row_idx, idx[4])?, row_idx, "energy")?,
                shape_mapping: as_string(self.cell(row, row_idx, idx[5])?, row_idx, "shape_mapping")?,
                path: as_string(self.cell(row, row_idx, idx[6])?, row_idx, "path")?,
            });
        }
        Ok(records)
    }

    /// Encode shape records: `shape_id` first, then the union of metadata
    /// columns in sorted order
    pub fn from_shapes(records: &[ShapeRecord]) -> Self {
        let meta_columns: BTreeSet<String> = records
            .iter()
            .flat_map(|r| r.metadata.keys().cloned())
            .collect();

        let mut columns = vec!["shape_id".to_string()];
        columns.extend(meta_columns.iter().cloned());

        let data = records
            .iter()
            .map(|r| {
                let mut row = vec![Value::from(r.shape_id.clone())];
                for col in &meta_columns {
                    row.push(r.metadata.get(col).cloned().unwrap_or(Value::Null));
                }
                row
            })
            .collect();

        Self { columns, data }
    }

    /// Decode shape records; non-`shape_id` columns land in metadata
    pub fn to_shapes(&self) -> Result<Vec<ShapeRecord>, ColumnarError> {
        let id_idx = self.column_index("shape_id")?;

        let mut records = Vec::with_capacity(self.data.len());
        for (row_idx, row) in self.data.iter().enumerate() {
            let shape_id = as_string(self.cell(row, row_idx, id_idx)?, row_idx, "shape_id")?;
            let mut record = ShapeRecord::new(shape_id);
            for (col, cell) in self.columns.iter().zip(row.iter()) {
                if col != "shape_id" && !cell.is_null() {
                    record.metadata.insert(col.clone(), cell.clone());
                }
            }
            records.push(record);
        }
        Ok(records)
    }
}

fn as_string(v: &Value, row: usize, column: &str) -> Result<String, ColumnarError> {
    match v {
        Value::String(s) => Ok(s.clone()),
        // upstream exports sometimes carry numeric row ids
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(ColumnarError::BadCell {
            row,
            column: column.to_string(),
        }),
    }
}

fn as_u64(v: &Value, row: usize, column: &str) -> Result<u64, ColumnarError> {
    v.as_u64().ok_or_else(|| ColumnarError::BadCell {
        row,
        column: column.to_string(),
    })
}

fn as_u32(v: &Value, row: usize, column: &str) -> Result<u32, ColumnarError> {
    as_u64(v, row, column)?
        .try_into()
        .map_err(|_| ColumnarError::BadCell {
            row,
            column: column.to_string(),
        })
}

fn as_f64(v: &Value, row: usize, column: &str) -> Result<f64, ColumnarError> {
    v.as_f64().ok_or_else(|| ColumnarError::BadCell {
        row,
        column: column.to_string(),
    })
}
