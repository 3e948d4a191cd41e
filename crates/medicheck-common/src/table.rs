//! In-memory drug reference table loaded from a spreadsheet export.
//!
//! Tables are read once at startup and never mutated afterwards; callers
//! share them behind an `Arc`. Row order is the order of the source file
//! and is significant: every lookup returns the first matching row.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::Result;

/// One row of a reference table, keyed by column name.
///
/// Every field is optional. Blank cells are never stored, so a column that
/// is missing from the file and a column left empty read the same way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DrugRecord {
    fields: HashMap<String, String>,
}

impl DrugRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with_field(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(column, value);
        self
    }

    /// Set a cell. A blank value clears it.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        let column = column.into();
        let value = value.into();
        if value.trim().is_empty() {
            self.fields.remove(&column);
        } else {
            self.fields.insert(column, value);
        }
    }

    /// Trimmed cell value, or `None` when the cell is absent or blank.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .get(column)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn is_blank(&self, column: &str) -> bool {
        self.get(column).is_none()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Ordered collection of [`DrugRecord`]s plus the header row they came from.
#[derive(Debug, Clone, Default)]
pub struct DrugTable {
    columns: Vec<String>,
    rows: Vec<DrugRecord>,
}

impl DrugTable {
    pub fn new(columns: Vec<String>, rows: Vec<DrugRecord>) -> Self {
        Self { columns, rows }
    }

    /// Load a CSV export of a reference spreadsheet.
    pub fn load_csv(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading reference table from {:?}", path);

        let file = std::fs::File::open(path)?;
        let table = Self::from_reader(file)?;

        info!(
            path = %path.display(),
            rows = table.len(),
            columns = table.columns.len(),
            "Reference table loaded"
        );
        Ok(table)
    }

    /// Parse CSV data. Rows shorter than the header simply lack the
    /// trailing columns.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);

        let columns: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let mut row = DrugRecord::new();
            for (column, value) in columns.iter().zip(record.iter()) {
                row.insert(column.clone(), value);
            }
            if !row.is_empty() {
                rows.push(row);
            }
        }

        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[DrugRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First row where one of `columns` equals `name`, ignoring case and
    /// surrounding whitespace.
    pub fn find_exact(&self, name: &str, columns: &[&str]) -> Option<&DrugRecord> {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.rows.iter().find(|row| {
            columns
                .iter()
                .any(|col| row.get(col).is_some_and(|v| v.to_lowercase() == needle))
        })
    }
}
