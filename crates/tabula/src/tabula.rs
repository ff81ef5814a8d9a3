//! Main Tabula struct and public API.

use std::env;
use std::fmt::Write;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::catalog::{Catalog, SchemaArtifact};
use crate::error::{Result, TabulaError};
use crate::inference::NumericSummary;
use crate::input::ParserConfig;
use crate::query::{
    format_float, render_result, render_summaries, QueryExecutor, QueryResult,
};
use crate::schema::TableSchema;
use crate::store::{LoadReport, Materializer, Store, StoreLocation};

/// Default directory scanned for source files.
pub const DEFAULT_DATA_DIR: &str = "./csv";
/// Default SQLite database file.
pub const DEFAULT_DB_PATH: &str = "./tabula.db";
/// Default schema artifact file.
pub const DEFAULT_SCHEMA_PATH: &str = "./table_info.txt";

/// Configuration for a Tabula instance.
#[derive(Debug, Clone)]
pub struct TabulaConfig {
    /// Parser configuration applied to every source file.
    pub parser: ParserConfig,
    /// Directory scanned for `.csv`/`.tsv` files.
    pub data_dir: PathBuf,
    /// Where the live store keeps its tables.
    pub store: StoreLocation,
    /// Path of the schema artifact.
    pub schema_path: PathBuf,
}

impl Default for TabulaConfig {
    fn default() -> Self {
        Self {
            parser: ParserConfig::default(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            store: StoreLocation::File(PathBuf::from(DEFAULT_DB_PATH)),
            schema_path: PathBuf::from(DEFAULT_SCHEMA_PATH),
        }
    }
}

impl TabulaConfig {
    /// Defaults overridden by environment variables.
    ///
    /// - `TABULA_DATA_DIR`: source directory
    /// - `TABULA_DB_PATH`: database file, or `:memory:` for an in-memory store
    /// - `TABULA_SCHEMA_PATH`: schema artifact file
    /// - `TABULA_MAX_ROWS`: rows read per source file
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(dir) = env::var("TABULA_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(db) = env::var("TABULA_DB_PATH") {
            config.store = parse_store_location(&db);
        }
        if let Ok(path) = env::var("TABULA_SCHEMA_PATH") {
            config.schema_path = PathBuf::from(path);
        }
        if let Ok(max) = env::var("TABULA_MAX_ROWS") {
            let max = max.trim().parse::<usize>().map_err(|_| {
                TabulaError::Config(format!("TABULA_MAX_ROWS must be a positive integer, got '{}'", max))
            })?;
            config.parser.max_rows = Some(max);
        }

        Ok(config)
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn with_store(mut self, store: StoreLocation) -> Self {
        self.store = store;
        self
    }

    pub fn with_schema_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.schema_path = path.into();
        self
    }
}

/// `:memory:` selects an in-memory store; anything else is a file path.
pub fn parse_store_location(value: &str) -> StoreLocation {
    if value == ":memory:" {
        StoreLocation::InMemory
    } else {
        StoreLocation::File(PathBuf::from(value))
    }
}

/// Loaded tables plus the operations exposed to tool callers.
///
/// Build one with [`Tabula::open`] at startup and pass it to every call.
pub struct Tabula {
    config: TabulaConfig,
    materializer: Materializer,
    store: Store,
    artifact: SchemaArtifact,
    catalog: Catalog,
    executor: QueryExecutor,
    last_report: LoadReport,
}

impl Tabula {
    /// Open the store and load the data directory.
    pub fn open(config: TabulaConfig) -> Result<Self> {
        let store = Store::open(&config.store)?;
        let mut tabula = Self {
            materializer: Materializer::with_config(config.parser.clone()),
            artifact: SchemaArtifact::new(&config.schema_path),
            store,
            catalog: Catalog::new(),
            executor: QueryExecutor::new(),
            last_report: LoadReport::default(),
            config,
        };
        tabula.reload()?;
        Ok(tabula)
    }

    /// Re-scan the data directory, replacing every table and the artifact.
    ///
    /// The catalog always tracks the store. If the artifact cannot be
    /// written, the old one is removed so it never describes stale tables.
    pub fn reload(&mut self) -> Result<LoadReport> {
        let (catalog, report) = self
            .materializer
            .load_directory(&self.config.data_dir, &mut self.store);

        self.catalog = catalog;
        self.last_report = report.clone();

        if let Err(e) = self.artifact.write(&self.catalog) {
            warn!(path = %self.artifact.path().display(), error = %e, "failed to write schema artifact");
            self.artifact.discard();
            return Err(e);
        }

        info!(
            tables = report.loaded.len(),
            failures = report.failures.len(),
            dir = %self.config.data_dir.display(),
            "data directory loaded"
        );
        if !report.failures.is_empty() {
            warn!(count = report.failures.len(), "some files failed to load");
        }

        Ok(report)
    }

    pub fn config(&self) -> &TabulaConfig {
        &self.config
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn artifact(&self) -> &SchemaArtifact {
        &self.artifact
    }

    /// Report from the most recent load.
    pub fn last_report(&self) -> &LoadReport {
        &self.last_report
    }

    // =========================================================================
    // Typed operations
    // =========================================================================

    /// Table names recorded in the schema artifact, in load order.
    pub fn try_list_table_names(&self) -> Result<Vec<String>> {
        self.artifact.list_table_names()
    }

    /// Schema artifact block for one table.
    pub fn try_get_schema(&self, table_name: &str) -> Result<String> {
        self.artifact.get_schema(table_name)
    }

    /// Run a read-only query; at most ten rows are kept.
    pub fn try_execute_query(&self, query: &str) -> Result<QueryResult> {
        self.executor.execute(&self.store, query)
    }

    /// Schema of a loaded table from the live catalog.
    pub fn try_column_details(&self, table_name: &str) -> Result<&TableSchema> {
        self.catalog
            .get(table_name)
            .map(|entry| &entry.schema)
            .ok_or_else(|| TabulaError::TableNotFound(table_name.to_string()))
    }

    /// Run a query and summarize its numeric columns over every result row.
    pub fn try_describe_query(&self, query: &str) -> Result<(QueryResult, Vec<NumericSummary>)> {
        let mut result = self.executor.execute_all(&self.store, query)?;
        let summaries = result.numeric_summaries();
        result.truncate(self.executor.max_rows());
        Ok((result, summaries))
    }

    // =========================================================================
    // Text operations (tool surface)
    // =========================================================================

    /// Newline-separated table names.
    pub fn list_table_names(&self) -> String {
        match self.try_list_table_names() {
            Ok(names) => names.join("\n"),
            Err(e) => error_text(&e),
        }
    }

    pub fn get_schema(&self, table_name: &str) -> String {
        self.try_get_schema(table_name)
            .unwrap_or_else(|e| error_text(&e))
    }

    pub fn execute_query(&self, query: &str) -> String {
        match self.try_execute_query(query) {
            Ok(result) => render_result(&result, self.executor.max_rows()),
            Err(e) => error_text(&e),
        }
    }

    pub fn column_details(&self, table_name: &str) -> String {
        match self.try_column_details(table_name) {
            Ok(schema) => render_column_details(schema),
            Err(e) => error_text(&e),
        }
    }

    pub fn describe_query(&self, query: &str) -> String {
        match self.try_describe_query(query) {
            Ok((result, summaries)) => format!(
                "{}\n{}",
                render_result(&result, self.executor.max_rows()),
                render_summaries(&summaries)
            ),
            Err(e) => error_text(&e),
        }
    }
}

/// User-facing error string.
pub fn error_text(err: &TabulaError) -> String {
    format!("Error: {}", err)
}

/// Row/column counts and per-column statistics for one table.
pub fn render_column_details(schema: &TableSchema) -> String {
    let mut out = format!(
        "Table: {}\nRows: {}, Columns: {}\n\nColumn details:\n",
        schema.name,
        schema.row_count,
        schema.column_count()
    );

    for column in &schema.columns {
        let stats = &column.statistics;
        let _ = write!(
            out,
            "- {}: type={}, nulls={}, unique={}",
            column.name,
            column.type_description(),
            stats.null_count,
            stats.unique_count
        );
        if let (Some(min), Some(max)) = (stats.min, stats.max) {
            let _ = write!(out, ", min={}, max={}", format_float(min), format_float(max));
        }
        out.push('\n');
    }
    out
}
