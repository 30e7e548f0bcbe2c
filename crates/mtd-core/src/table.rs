//! Core table types for header-indexed TSV data

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A parsed table from a single TSV source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    /// Column definitions from the header row
    pub columns: Vec<Column>,
    /// Data rows (header excluded)
    pub rows: Vec<Row>,
    /// Source file path
    pub source_path: PathBuf,
}

impl Table {
    /// Create a new empty table
    pub fn new(source_path: PathBuf) -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
            source_path,
        }
    }

    /// Get the number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get the number of data rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Find a column by name (first match wins for duplicated headers)
    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Resolve an optional column to its position, `None` when absent
    pub fn optional_column(&self, name: &str) -> Option<usize> {
        self.find_column(name).map(|c| c.index)
    }

    /// Resolve a set of required columns to their positions.
    ///
    /// Fails with [`Error::Schema`] naming the whole required set when any
    /// of them is missing from the header.
    pub fn require_columns<const N: usize>(&self, names: [&str; N]) -> Result<[usize; N]> {
        let mut indices = [0usize; N];
        let mut complete = true;

        for (slot, name) in indices.iter_mut().zip(names.iter()) {
            match self.optional_column(name) {
                Some(index) => *slot = index,
                None => complete = false,
            }
        }

        if !complete {
            return Err(Error::Schema {
                path: self.source_path.clone(),
                columns: names.iter().map(|n| n.to_string()).collect(),
            });
        }

        Ok(indices)
    }
}

/// A column definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    /// Column name (e.g., "series_code")
    pub name: String,
    /// Column index (0-based)
    pub index: usize,
}

impl Column {
    /// Create a new column
    pub fn new(name: String, index: usize) -> Self {
        Self { name, index }
    }
}

/// A row of raw string fields
///
/// Rows are not padded to the header width; indexing past the end of a
/// short row yields `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub cells: Vec<String>,
}

impl Row {
    /// Create a new row
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }

    /// Get a cell by column index, `None` if the row is too short
    pub fn get(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(String::as_str)
    }

    /// Get a cell by index, treating a missing field as empty
    pub fn cell(&self, index: usize) -> &str {
        self.get(index).unwrap_or_default()
    }

    /// Get a cell for an optionally resolved column; absent columns read as empty
    pub fn optional_cell(&self, index: Option<usize>) -> &str {
        index.map(|i| self.cell(i)).unwrap_or_default()
    }
}
