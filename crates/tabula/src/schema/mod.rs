//! Schema types for representing inferred table structure.

mod column;
mod table;
mod types;

pub use column::{ColumnDescriptor, ColumnStatistics};
pub use table::{Table, TableSchema};
pub use types::{Cell, ColumnKind, Number, SqlType};
