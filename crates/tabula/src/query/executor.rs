//! Runs read-only queries against the live store.

use rusqlite::types::Value;
use rusqlite::Batch;
use serde::Serialize;
use tracing::debug;

use super::guard::ensure_read_only;
use crate::error::{Result, TabulaError};
use crate::inference::{summarize, NumericSummary};
use crate::store::Store;

/// Rows returned to the caller per query.
pub const MAX_RESULT_ROWS: usize = 10;

/// One value in a query result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl QueryValue {
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            QueryValue::Integer(i) => Some(i as f64),
            QueryValue::Real(r) => Some(r),
            _ => None,
        }
    }
}

impl From<Value> for QueryValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => QueryValue::Null,
            Value::Integer(i) => QueryValue::Integer(i),
            Value::Real(r) => QueryValue::Real(r),
            Value::Text(s) => QueryValue::Text(s),
            Value::Blob(b) => QueryValue::Blob(b),
        }
    }
}

/// Result of one query. `rows` may be truncated; the totals never are.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<QueryValue>>,
    pub total_rows: usize,
    pub total_columns: usize,
}

impl QueryResult {
    pub fn is_truncated(&self) -> bool {
        self.rows.len() < self.total_rows
    }

    /// Values of one column across the returned rows.
    pub fn column(&self, index: usize) -> impl Iterator<Item = &QueryValue> {
        self.rows.iter().filter_map(move |row| row.get(index))
    }

    /// Numeric summaries for every column holding at least one number.
    ///
    /// Only the returned rows are summarized; use
    /// [`QueryExecutor::execute_all`] to summarize a full result.
    pub fn numeric_summaries(&self) -> Vec<NumericSummary> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(index, _)| {
                self.column(*index).all(|v| {
                    matches!(v, QueryValue::Null | QueryValue::Integer(_) | QueryValue::Real(_))
                })
            })
            .filter_map(|(index, name)| {
                let values: Vec<f64> = self.column(index).filter_map(QueryValue::as_f64).collect();
                summarize(name.clone(), &values)
            })
            .collect()
    }

    /// Keep only the first `n` rows.
    pub fn truncate(&mut self, n: usize) {
        self.rows.truncate(n);
    }
}

/// Executes `SELECT` queries with a cap on returned rows.
#[derive(Debug, Clone)]
pub struct QueryExecutor {
    max_rows: usize,
}

impl QueryExecutor {
    pub fn new() -> Self {
        Self {
            max_rows: MAX_RESULT_ROWS,
        }
    }

    pub fn with_max_rows(max_rows: usize) -> Self {
        Self { max_rows }
    }

    pub fn max_rows(&self) -> usize {
        self.max_rows
    }

    /// Run a query, keeping at most `max_rows` rows.
    pub fn execute(&self, store: &Store, query: &str) -> Result<QueryResult> {
        self.run(store, query, Some(self.max_rows))
    }

    /// Run a query and keep every row.
    pub fn execute_all(&self, store: &Store, query: &str) -> Result<QueryResult> {
        self.run(store, query, None)
    }

    fn run(&self, store: &Store, query: &str, keep: Option<usize>) -> Result<QueryResult> {
        ensure_read_only(query)?;
        debug!(query, "executing query");

        // Only the first statement would run; refuse anything after it.
        let mut batch = Batch::new(store.connection(), query);
        let mut stmt = batch
            .next()
            .map_err(query_error)?
            .ok_or_else(|| TabulaError::Query("no statement to run".to_string()))?;
        if batch.next().map_err(query_error)?.is_some() {
            return Err(TabulaError::Query(
                "multiple statements are not allowed".to_string(),
            ));
        }
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let total_columns = columns.len();

        let mut result_rows = stmt.query([]).map_err(query_error)?;
        let mut rows = Vec::new();
        let mut total_rows = 0;

        while let Some(row) = result_rows.next().map_err(query_error)? {
            if keep.map_or(true, |k| rows.len() < k) {
                let values = (0..total_columns)
                    .map(|i| row.get::<_, Value>(i).map(QueryValue::from))
                    .collect::<rusqlite::Result<Vec<_>>>()
                    .map_err(query_error)?;
                rows.push(values);
            }
            total_rows += 1;
        }

        Ok(QueryResult {
            columns,
            rows,
            total_rows,
            total_columns,
        })
    }
}

impl Default for QueryExecutor {
    fn default() -> Self {
        Self::new()
    }
}

fn query_error(err: rusqlite::Error) -> TabulaError {
    TabulaError::Query(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_numbers(n: usize) -> Store {
        let store = Store::in_memory().unwrap();
        store
            .connection()
            .execute_batch("CREATE TABLE nums (n INTEGER, label TEXT)")
            .unwrap();
        for i in 0..n {
            store
                .connection()
                .execute(
                    "INSERT INTO nums VALUES (?1, ?2)",
                    rusqlite::params![i as i64, format!("row{}", i)],
                )
                .unwrap();
        }
        store
    }

    #[test]
    fn test_truncates_rows_but_reports_totals() {
        let store = store_with_numbers(25);
        let result = QueryExecutor::new()
            .execute(&store, "SELECT * FROM nums")
            .unwrap();

        assert_eq!(result.rows.len(), 10);
        assert_eq!(result.total_rows, 25);
        assert_eq!(result.total_columns, 2);
        assert!(result.is_truncated());
    }

    #[test]
    fn test_small_result_not_truncated() {
        let store = store_with_numbers(3);
        let result = QueryExecutor::new()
            .execute(&store, "SELECT n FROM nums ORDER BY n DESC")
            .unwrap();

        assert_eq!(result.rows.len(), 3);
        assert_eq!(result.rows[0], vec![QueryValue::Integer(2)]);
        assert!(!result.is_truncated());
    }

    #[test]
    fn test_execute_all_keeps_every_row() {
        let store = store_with_numbers(25);
        let result = QueryExecutor::new()
            .execute_all(&store, "SELECT n FROM nums")
            .unwrap();
        assert_eq!(result.rows.len(), 25);
    }

    #[test]
    fn test_rejected_before_execution() {
        let store = store_with_numbers(1);
        let err = QueryExecutor::new()
            .execute(&store, "DROP TABLE nums")
            .unwrap_err();
        assert!(matches!(err, TabulaError::QueryRejected(_)));
        assert_eq!(store.table_names().unwrap(), vec!["nums"]);
    }

    #[test]
    fn test_trailing_statement_is_query_error() {
        let store = store_with_numbers(2);
        let err = QueryExecutor::new()
            .execute(&store, "SELECT 1; DROP TABLE nums")
            .unwrap_err();
        match err {
            TabulaError::Query(message) => assert!(message.contains("multiple statements")),
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(store.table_names().unwrap(), vec!["nums"]);
    }

    #[test]
    fn test_trailing_semicolon_and_comment_allowed() {
        let store = store_with_numbers(2);
        let result = QueryExecutor::new()
            .execute(&store, "SELECT n FROM nums;  -- done\n")
            .unwrap();
        assert_eq!(result.total_rows, 2);
    }

    #[test]
    fn test_bad_reference_is_query_error() {
        let store = store_with_numbers(1);
        let err = QueryExecutor::new()
            .execute(&store, "SELECT missing FROM nums")
            .unwrap_err();
        match err {
            TabulaError::Query(message) => assert!(message.contains("missing")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_numeric_summaries_skip_text_columns() {
        let store = store_with_numbers(4);
        let result = QueryExecutor::new()
            .execute_all(&store, "SELECT n, label FROM nums")
            .unwrap();
        let summaries = result.numeric_summaries();

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].column, "n");
        assert_eq!(summaries[0].mean, 1.5);
    }
}
