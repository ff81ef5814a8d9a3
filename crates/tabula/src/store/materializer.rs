//! Turns a directory of delimited files into typed tables in the store.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::sqlite::Store;
use crate::catalog::{Catalog, CatalogEntry};
use crate::error::{Result, TabulaError};
use crate::inference::{classify_column, column_statistics, to_cell};
use crate::input::{table_name_for, Parser, ParserConfig, SUPPORTED_EXTENSIONS};
use crate::schema::{Cell, ColumnDescriptor, Table, TableSchema};

/// A file that could not be loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Outcome of loading a directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadReport {
    /// Tables loaded, in listing order.
    pub loaded: Vec<String>,
    /// Files that failed to load.
    pub failures: Vec<LoadFailure>,
    /// Table names produced by more than one file (last file wins).
    pub collisions: Vec<String>,
    /// Tables left over from an earlier load that were dropped.
    pub dropped: Vec<String>,
}

/// Reads source files, infers column types and writes typed tables.
pub struct Materializer {
    parser: Parser,
}

impl Materializer {
    pub fn new() -> Self {
        Self {
            parser: Parser::new(),
        }
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            parser: Parser::with_config(config),
        }
    }

    /// Parse one file and build its typed table.
    pub fn materialize_file(&self, path: impl AsRef<Path>) -> Result<Table> {
        let path = path.as_ref();
        let (data, source) = self.parser.parse_file(path)?;

        let mut columns = Vec::with_capacity(data.column_count());
        let mut typed_columns: Vec<Vec<Cell>> = Vec::with_capacity(data.column_count());

        for (index, header) in data.headers.iter().enumerate() {
            let classification = classify_column(&data, index);
            let cells = data
                .column_values(index)
                .enumerate()
                .map(|(row, value)| {
                    to_cell(value, classification.sql_type).ok_or_else(|| TabulaError::Parse {
                        row: row + 1,
                        column: index + 1,
                        message: format!("'{}' is not a number", value),
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            let refs: Vec<&Cell> = cells.iter().collect();
            let descriptor = ColumnDescriptor::new(header.clone(), index, classification.sql_type)
                .with_statistics(column_statistics(&refs));

            columns.push(descriptor);
            typed_columns.push(cells);
        }

        let rows = (0..data.row_count())
            .map(|row| typed_columns.iter().map(|col| col[row].clone()).collect())
            .collect();

        Ok(Table {
            schema: TableSchema {
                name: source.table_name(),
                source,
                columns,
                row_count: data.row_count(),
            },
            rows,
        })
    }

    /// Load every supported file in `dir` into the store.
    ///
    /// Each file is handled on its own: a failure is logged and recorded,
    /// and the remaining files still load. Tables in the store that this
    /// scan did not produce are dropped.
    pub fn load_directory(
        &self,
        dir: impl AsRef<Path>,
        store: &mut Store,
    ) -> (Catalog, LoadReport) {
        let dir = dir.as_ref();
        let mut catalog = Catalog::new();
        let mut report = LoadReport::default();

        let files = match discover_files(dir) {
            Ok(files) => files,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "cannot read data directory");
                report.failures.push(LoadFailure {
                    path: dir.to_path_buf(),
                    error: e.to_string(),
                });
                Vec::new()
            }
        };

        for path in files {
            match self.load_file(&path, store) {
                Ok(table) => {
                    let name = table.name().to_string();
                    // SQLite folds ASCII case in table names, so `Sales` and
                    // `sales` are the same table in the store.
                    let shadowed: Vec<String> = catalog
                        .names()
                        .filter(|n| *n != name && n.eq_ignore_ascii_case(&name))
                        .map(str::to_string)
                        .collect();
                    for old in shadowed {
                        warn!(table = %old, replaced_by = %name, "table name differs only in case; replacing it");
                        catalog.remove(&old);
                        report.collisions.push(old);
                    }
                    if catalog.insert(CatalogEntry::from_table(&table)) {
                        warn!(
                            table = %name,
                            file = %path.display(),
                            "table name already loaded from another file; replacing it"
                        );
                        report.collisions.push(name.clone());
                    }
                    info!(
                        table = %name,
                        rows = table.row_count(),
                        columns = table.schema.column_count(),
                        "table loaded"
                    );
                }
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "failed to load file");
                    report.failures.push(LoadFailure {
                        path,
                        error: e.to_string(),
                    });
                }
            }
        }

        match store.table_names() {
            Ok(existing) => {
                for stale in existing.into_iter().filter(|n| !catalog.contains(n)) {
                    match store.drop_table(&stale) {
                        Ok(()) => report.dropped.push(stale),
                        Err(e) => warn!(table = %stale, error = %e, "failed to drop stale table"),
                    }
                }
            }
            Err(e) => warn!(error = %e, "failed to list existing tables"),
        }

        report.loaded = catalog.names().map(str::to_string).collect();
        (catalog, report)
    }

    fn load_file(&self, path: &Path, store: &mut Store) -> Result<Table> {
        let table = self.materialize_file(path)?;
        store.replace_table(&table)?;
        Ok(table)
    }
}

impl Default for Materializer {
    fn default() -> Self {
        Self::new()
    }
}

/// Supported files in `dir`, sorted by file name.
pub fn discover_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| TabulaError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| TabulaError::io(dir, e))?.path();
        if !path.is_file() {
            continue;
        }
        let supported = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| SUPPORTED_EXTENSIONS.iter().any(|s| e.eq_ignore_ascii_case(s)))
            .unwrap_or(false);
        if supported && !table_name_for(&path).is_empty() {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}
