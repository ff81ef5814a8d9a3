//! Table-level schema and the typed, materialized table.

use serde::{Deserialize, Serialize};

use super::column::ColumnDescriptor;
use super::types::Cell;
use crate::input::SourceMetadata;

/// Schema for an entire table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSchema {
    /// Table name (source file stem).
    pub name: String,
    /// Where the table was loaded from.
    pub source: SourceMetadata,
    /// Schemas for each column, in source order.
    pub columns: Vec<ColumnDescriptor>,
    /// Number of data rows.
    pub row_count: usize,
}

impl TableSchema {
    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

/// A table after type inference: schema plus typed rows.
#[derive(Debug, Clone)]
pub struct Table {
    pub schema: TableSchema,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn name(&self) -> &str {
        &self.schema.name
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// The first `n` rows, for display.
    pub fn head(&self, n: usize) -> &[Vec<Cell>] {
        &self.rows[..n.min(self.rows.len())]
    }
}
