//! Loaded-table catalog and the schema artifact written alongside it.

mod artifact;

pub use artifact::{render_block, SchemaArtifact, SAMPLE_ROWS};

use indexmap::IndexMap;

use crate::schema::{Cell, Table, TableSchema};

/// What the catalog keeps about one loaded table.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub schema: TableSchema,
    /// First rows of the materialized table.
    pub sample: Vec<Vec<Cell>>,
}

impl CatalogEntry {
    pub fn from_table(table: &Table) -> Self {
        Self {
            schema: table.schema.clone(),
            sample: table.head(SAMPLE_ROWS).to_vec(),
        }
    }
}

/// Loaded tables in scan order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: IndexMap<String, CatalogEntry>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table. A table with the same name is replaced and the entry
    /// moves to the end; returns true when that happened.
    pub fn insert(&mut self, entry: CatalogEntry) -> bool {
        let replaced = self.entries.shift_remove(&entry.schema.name).is_some();
        self.entries.insert(entry.schema.name.clone(), entry);
        replaced
    }

    /// Remove a table, keeping the order of the rest.
    pub fn remove(&mut self, name: &str) -> Option<CatalogEntry> {
        self.entries.shift_remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
