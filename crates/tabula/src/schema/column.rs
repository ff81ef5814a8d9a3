//! Column descriptor and statistics.

use serde::{Deserialize, Serialize};

use super::types::{ColumnKind, SqlType};

/// Statistics computed for a column at load time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnStatistics {
    /// Total number of values (including missing).
    pub count: usize,
    /// Number of missing values.
    pub null_count: usize,
    /// Number of distinct non-missing values.
    pub unique_count: usize,
    /// Smallest value (numeric columns only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Largest value (numeric columns only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

/// Schema for a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name.
    pub name: String,
    /// Zero-based position in the table.
    pub position: usize,
    /// Text or numeric storage decision.
    pub kind: ColumnKind,
    /// Type used in the live store.
    pub sql_type: SqlType,
    /// Whether missing values are present.
    pub nullable: bool,
    /// Computed statistics.
    pub statistics: ColumnStatistics,
}

impl ColumnDescriptor {
    /// Create a descriptor; the kind is taken from the SQL type.
    pub fn new(name: impl Into<String>, position: usize, sql_type: SqlType) -> Self {
        Self {
            name: name.into(),
            position,
            kind: sql_type.kind(),
            sql_type,
            nullable: false,
            statistics: ColumnStatistics::default(),
        }
    }

    /// Attach statistics, updating `nullable` to match.
    pub fn with_statistics(mut self, statistics: ColumnStatistics) -> Self {
        self.nullable = statistics.null_count > 0;
        self.statistics = statistics;
        self
    }

    /// One-line type description used in the schema artifact.
    pub fn type_description(&self) -> String {
        format!("{} ({})", self.sql_type, self.kind)
    }
}
