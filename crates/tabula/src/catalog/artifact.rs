//! The schema artifact: a plain-text description of every loaded table.
//!
//! The artifact is rewritten in full after each load. It describes tables
//! for humans and tools; queries never consult it.
//!
//! # Format
//!
//! ```text
//! # Table: codes
//! Source: codes.csv (csv, sha256:...)
//! Rows: 3
//! Columns: 1
//! Column details:
//! - postal: type=TEXT (text)
//! Sample rows (first 3):
//! | postal |
//! | --- |
//! | 00123 |
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use super::{Catalog, CatalogEntry};
use crate::error::{Result, TabulaError};

/// Number of materialized rows shown per table.
pub const SAMPLE_ROWS: usize = 3;

const TABLE_HEADER: &str = "# Table: ";

static TABLE_HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^# Table: (.*?)\r?$").expect("valid table header pattern"));

/// Reads and writes the schema artifact file.
#[derive(Debug, Clone)]
pub struct SchemaArtifact {
    path: PathBuf,
}

impl SchemaArtifact {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the artifact with a description of every catalog entry.
    ///
    /// Content goes to a sibling temp file first and is renamed into place.
    pub fn write(&self, catalog: &Catalog) -> Result<()> {
        let content = catalog
            .iter()
            .map(render_block)
            .collect::<Vec<_>>()
            .join("\n");

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| TabulaError::io(parent, e))?;
            }
        }

        let tmp = self.temp_path();
        fs::write(&tmp, content).map_err(|e| TabulaError::io(&tmp, e))?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(TabulaError::io(&self.path, e));
        }
        Ok(())
    }

    /// Remove the artifact file, if one exists.
    pub fn discard(&self) {
        if self.path.is_file() {
            if let Err(e) = fs::remove_file(&self.path) {
                warn!(path = %self.path.display(), error = %e, "failed to remove schema artifact");
            }
        }
    }

    /// Raw artifact contents.
    pub fn read(&self) -> Result<String> {
        fs::read_to_string(&self.path).map_err(|e| TabulaError::io(&self.path, e))
    }

    /// Every table name in the artifact, in the order written.
    pub fn list_table_names(&self) -> Result<Vec<String>> {
        let content = self.read()?;
        Ok(table_names(&content))
    }

    /// The artifact block for one table.
    pub fn get_schema(&self, table_name: &str) -> Result<String> {
        let content = self.read()?;
        find_block(&content, table_name)
            .ok_or_else(|| TabulaError::TableNotFound(table_name.to_string()))
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

/// Render the artifact block for one table.
pub fn render_block(entry: &CatalogEntry) -> String {
    let schema = &entry.schema;
    let mut lines = vec![
        format!("{}{}", TABLE_HEADER, schema.name),
        format!(
            "Source: {} ({}, {})",
            schema.source.file, schema.source.format, schema.source.hash
        ),
        format!("Rows: {}", schema.row_count),
        format!("Columns: {}", schema.column_count()),
        "Column details:".to_string(),
    ];

    for column in &schema.columns {
        lines.push(format!(
            "- {}: type={}",
            column.name,
            column.type_description()
        ));
    }

    lines.push(format!("Sample rows (first {}):", SAMPLE_ROWS));
    lines.push(markdown_row(schema.columns.iter().map(|c| c.name.clone())));
    lines.push(markdown_row(schema.columns.iter().map(|_| "---".to_string())));
    for row in &entry.sample {
        lines.push(markdown_row(row.iter().map(|c| c.to_string())));
    }

    let mut block = lines.join("\n");
    block.push('\n');
    block
}

fn markdown_row(cells: impl Iterator<Item = String>) -> String {
    let cells: Vec<String> = cells
        .map(|c| c.replace('|', "\\|").replace(['\r', '\n'], " "))
        .collect();
    format!("| {} |", cells.join(" | "))
}

fn table_names(content: &str) -> Vec<String> {
    TABLE_HEADER_RE
        .captures_iter(content)
        .map(|caps| caps[1].to_string())
        .collect()
}

fn find_block(content: &str, table_name: &str) -> Option<String> {
    let mut lines = content.lines();
    lines.find(|line| line.strip_prefix(TABLE_HEADER) == Some(table_name))?;

    let mut block = vec![format!("{}{}", TABLE_HEADER, table_name)];
    block.extend(
        lines
            .take_while(|line| !line.starts_with(TABLE_HEADER))
            .map(str::to_string),
    );
    while block.last().is_some_and(|l| l.trim().is_empty()) {
        block.pop();
    }
    Some(block.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::SourceMetadata;
    use crate::schema::{Cell, ColumnDescriptor, SqlType, TableSchema};
    use tempfile::TempDir;

    fn entry(name: &str) -> CatalogEntry {
        CatalogEntry {
            schema: TableSchema {
                name: name.to_string(),
                source: SourceMetadata::new(
                    PathBuf::from(format!("{}.csv", name)),
                    "sha256:abc".to_string(),
                    10,
                    "csv".to_string(),
                    1,
                    1,
                ),
                columns: vec![ColumnDescriptor::new("postal", 0, SqlType::Text)],
                row_count: 1,
            },
            sample: vec![vec![Cell::Text("00123".to_string())]],
        }
    }

    #[test]
    fn test_render_block() {
        let block = render_block(&entry("codes"));
        assert!(block.starts_with("# Table: codes\n"));
        assert!(block.contains("Columns: 1"));
        assert!(block.contains("- postal: type=TEXT (text)"));
        assert!(block.contains("| 00123 |"));
    }

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let artifact = SchemaArtifact::new(dir.path().join("table_info.txt"));

        let mut catalog = Catalog::new();
        catalog.insert(entry("b_table"));
        catalog.insert(entry("a_table"));
        artifact.write(&catalog).unwrap();

        assert_eq!(
            artifact.list_table_names().unwrap(),
            vec!["b_table", "a_table"]
        );

        let schema = artifact.get_schema("a_table").unwrap();
        assert!(schema.starts_with("# Table: a_table"));
        assert!(!schema.contains("b_table"));
        assert!(!dir.path().join("table_info.txt.tmp").exists());
    }

    #[test]
    fn test_prefix_names_are_distinct() {
        let content = format!("{}\n{}", render_block(&entry("codes")), render_block(&entry("codes_2")));
        let block = find_block(&content, "codes").unwrap();
        assert!(!block.contains("codes_2"));
        assert!(find_block(&content, "code").is_none());
    }

    #[test]
    fn test_missing_table_is_not_found() {
        let dir = TempDir::new().unwrap();
        let artifact = SchemaArtifact::new(dir.path().join("table_info.txt"));
        artifact.write(&Catalog::new()).unwrap();

        assert!(matches!(
            artifact.get_schema("nope"),
            Err(TabulaError::TableNotFound(_))
        ));
    }

    #[test]
    fn test_unreadable_artifact_is_io_error() {
        let artifact = SchemaArtifact::new("/nonexistent/dir/table_info.txt");
        assert!(matches!(
            artifact.list_table_names(),
            Err(TabulaError::Io { .. })
        ));
    }
}
