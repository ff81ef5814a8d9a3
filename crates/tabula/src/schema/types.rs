//! Core type definitions for schema representation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Storage decision for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Values are kept verbatim as strings (identifiers, codes, free text).
    Text,
    /// Values are coerced to numbers; empty fields become missing.
    Numeric,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Text => "text",
            ColumnKind::Numeric => "numeric",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SQL column type used in the live store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SqlType {
    Text,
    Integer,
    Real,
}

impl SqlType {
    /// Type name as written in `CREATE TABLE`.
    pub fn as_sql(&self) -> &'static str {
        match self {
            SqlType::Text => "TEXT",
            SqlType::Integer => "INTEGER",
            SqlType::Real => "REAL",
        }
    }

    /// The column kind this SQL type belongs to.
    pub fn kind(&self) -> ColumnKind {
        match self {
            SqlType::Text => ColumnKind::Text,
            SqlType::Integer | SqlType::Real => ColumnKind::Numeric,
        }
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// A parsed numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Integer(i64),
    Real(f64),
}

impl Number {
    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::Integer(i) => i as f64,
            Number::Real(r) => r,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{}", i),
            Number::Real(r) => write!(f, "{}", r),
        }
    }
}

/// A materialized cell.
///
/// The variant is fixed by the column's [`ColumnKind`]: every cell in a text
/// column is `Text`, every cell in a numeric column is `Numeric`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    /// `None` marks a missing value.
    Numeric(Option<Number>),
}

impl Cell {
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Numeric(None))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Numeric(Some(n)) => write!(f, "{}", n),
            Cell::Numeric(None) => f.write_str("NULL"),
        }
    }
}
