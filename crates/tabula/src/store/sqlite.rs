//! SQLite-backed live store.

use std::path::{Path, PathBuf};

use rusqlite::types::{ToSqlOutput, Value, ValueRef};
use rusqlite::{params_from_iter, Connection, ToSql};
use tracing::debug;

use crate::error::{Result, TabulaError};
use crate::schema::{Cell, Number, Table};

impl ToSql for Cell {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Cell::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            Cell::Numeric(None) => ToSqlOutput::Owned(Value::Null),
            Cell::Numeric(Some(Number::Integer(i))) => ToSqlOutput::Owned(Value::Integer(*i)),
            Cell::Numeric(Some(Number::Real(r))) => ToSqlOutput::Owned(Value::Real(*r)),
        })
    }
}

/// Where the store keeps its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// Private in-memory database, gone when the store is dropped.
    InMemory,
    /// Database file on disk.
    File(PathBuf),
}

/// The live store holding every materialized table.
///
/// Owns its connection; column types declared here are authoritative for
/// query execution.
pub struct Store {
    conn: Connection,
    location: StoreLocation,
}

impl Store {
    /// Open the store at the given location.
    pub fn open(location: &StoreLocation) -> Result<Self> {
        match location {
            StoreLocation::InMemory => Self::in_memory(),
            StoreLocation::File(path) => Self::open_file(path),
        }
    }

    /// Open (or create) a database file.
    pub fn open_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| TabulaError::io(parent, e))?;
            }
        }
        let conn = Connection::open(path)?;
        Ok(Self {
            conn,
            location: StoreLocation::File(path.to_path_buf()),
        })
    }

    /// Open a private in-memory database.
    pub fn in_memory() -> Result<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
            location: StoreLocation::InMemory,
        })
    }

    pub fn location(&self) -> &StoreLocation {
        &self.location
    }

    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Replace a table with the given contents.
    ///
    /// Drop, create and inserts run in one transaction, so readers see
    /// either the old table or the complete new one.
    pub fn replace_table(&mut self, table: &Table) -> Result<()> {
        let name = quote_identifier(table.name());
        let columns: Vec<String> = table
            .schema
            .columns
            .iter()
            .map(|c| format!("{} {}", quote_identifier(&c.name), c.sql_type.as_sql()))
            .collect();

        let tx = self.conn.transaction()?;
        tx.execute(&format!("DROP TABLE IF EXISTS {}", name), [])?;
        tx.execute(
            &format!("CREATE TABLE {} ({})", name, columns.join(", ")),
            [],
        )?;

        {
            let placeholders = vec!["?"; table.schema.columns.len()].join(", ");
            let mut insert =
                tx.prepare(&format!("INSERT INTO {} VALUES ({})", name, placeholders))?;
            for row in &table.rows {
                insert.execute(params_from_iter(row.iter()))?;
            }
        }

        tx.commit()?;
        debug!(table = table.name(), rows = table.row_count(), "table replaced");
        Ok(())
    }

    /// Drop a table if it exists.
    pub fn drop_table(&mut self, name: &str) -> Result<()> {
        self.conn
            .execute(&format!("DROP TABLE IF EXISTS {}", quote_identifier(name)), [])?;
        Ok(())
    }

    /// Names of all user tables currently in the store.
    pub fn table_names(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite\\_%' ESCAPE '\\' ORDER BY name",
        )?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(names)
    }

    /// Declared column types of a table, in column order.
    pub fn column_types(&self, table: &str) -> Result<Vec<(String, String)>> {
        let mut stmt = self
            .conn
            .prepare(&format!("PRAGMA table_info({})", quote_identifier(table)))?;
        let columns = stmt
            .query_map([], |row| Ok((row.get::<_, String>(1)?, row.get::<_, String>(2)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        if columns.is_empty() {
            return Err(TabulaError::TableNotFound(table.to_string()));
        }
        Ok(columns)
    }
}

/// Quote an identifier for SQLite, doubling embedded quotes.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::SourceMetadata;
    use crate::schema::{ColumnDescriptor, SqlType, TableSchema};

    fn table(name: &str, rows: Vec<Vec<Cell>>) -> Table {
        let columns = vec![
            ColumnDescriptor::new("postal", 0, SqlType::Text),
            ColumnDescriptor::new("amount", 1, SqlType::Real),
        ];
        let source = SourceMetadata::new(
            PathBuf::from(format!("{}.csv", name)),
            String::new(),
            0,
            "csv".to_string(),
            rows.len(),
            2,
        );
        Table {
            schema: TableSchema {
                name: name.to_string(),
                source,
                columns,
                row_count: rows.len(),
            },
            rows,
        }
    }

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("codes"), "\"codes\"");
        assert_eq!(quote_identifier("a\"b"), "\"a\"\"b\"");
    }

    #[test]
    fn test_replace_table_twice() {
        let mut store = Store::in_memory().unwrap();
        let first = table(
            "codes",
            vec![vec![Cell::Text("00123".into()), Cell::Numeric(None)]],
        );
        store.replace_table(&first).unwrap();
        store.replace_table(&first).unwrap();

        let count: i64 = store
            .connection()
            .query_row("SELECT COUNT(*) FROM codes", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(store.table_names().unwrap(), vec!["codes"]);
    }

    #[test]
    fn test_column_types_match_schema() {
        let mut store = Store::in_memory().unwrap();
        store.replace_table(&table("codes", Vec::new())).unwrap();

        let types = store.column_types("codes").unwrap();
        assert_eq!(
            types,
            vec![
                ("postal".to_string(), "TEXT".to_string()),
                ("amount".to_string(), "REAL".to_string()),
            ]
        );
        assert!(matches!(
            store.column_types("missing"),
            Err(TabulaError::TableNotFound(_))
        ));
    }

    #[test]
    fn test_drop_table() {
        let mut store = Store::in_memory().unwrap();
        store.replace_table(&table("codes", Vec::new())).unwrap();
        store.drop_table("codes").unwrap();
        assert!(store.table_names().unwrap().is_empty());
    }

    #[test]
    fn test_table_names_only_skip_internal_tables() {
        let mut store = Store::in_memory().unwrap();
        store.replace_table(&table("sqlite1", Vec::new())).unwrap();
        store.replace_table(&table("sqlitex", Vec::new())).unwrap();
        store
            .connection()
            .execute_batch("CREATE TABLE t (id INTEGER PRIMARY KEY AUTOINCREMENT)")
            .unwrap();

        // `sqlite_sequence` appears once a table uses AUTOINCREMENT.
        assert_eq!(store.table_names().unwrap(), vec!["sqlite1", "sqlitex", "t"]);
    }
}
