//! Tabula: load a directory of CSV/TSV files into a typed, queryable store.
//!
//! Every file becomes one table. Each column is classified once at load time
//! as text or numeric, and that decision is used both for the SQL column type
//! and for the human-readable schema artifact.
//!
//! # Core Principles
//!
//! - **Identifiers survive**: zero-padded codes such as `00123` stay text
//! - **One decision per column**: store types and schema descriptions agree
//! - **Partial failure**: one broken file never blocks the others
//!
//! # Example
//!
//! ```no_run
//! use tabula::{Tabula, TabulaConfig};
//!
//! let tabula = Tabula::open(TabulaConfig::default()).unwrap();
//! println!("{}", tabula.list_table_names());
//! println!("{}", tabula.execute_query("SELECT postal FROM codes"));
//! ```

pub mod catalog;
pub mod error;
pub mod inference;
pub mod input;
pub mod query;
pub mod schema;
pub mod store;

mod tabula;

pub use crate::tabula::{
    error_text, parse_store_location, render_column_details, Tabula, TabulaConfig,
    DEFAULT_DATA_DIR, DEFAULT_DB_PATH, DEFAULT_SCHEMA_PATH,
};
pub use catalog::{Catalog, CatalogEntry, SchemaArtifact};
pub use error::{Result, TabulaError};
pub use inference::NumericSummary;
pub use input::{DataTable, Parser, ParserConfig, SourceMetadata};
pub use query::{QueryExecutor, QueryResult, QueryValue, MAX_RESULT_ROWS};
pub use schema::{Cell, ColumnDescriptor, ColumnKind, ColumnStatistics, Number, SqlType, Table, TableSchema};
pub use store::{LoadFailure, LoadReport, Materializer, Store, StoreLocation};
