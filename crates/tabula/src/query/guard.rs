//! Read-only query check.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Result, TabulaError};

// Leading keyword only; this is a syntactic check, not a SQL parser.
static SELECT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*SELECT\b").expect("valid select pattern"));

/// Reject any query whose first keyword is not `SELECT`.
pub fn ensure_read_only(query: &str) -> Result<()> {
    if SELECT_RE.is_match(query) {
        Ok(())
    } else {
        let preview: String = query.trim().chars().take(40).collect();
        Err(TabulaError::QueryRejected(preview))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_allowed() {
        assert!(ensure_read_only("SELECT * FROM codes").is_ok());
        assert!(ensure_read_only("  select postal from codes").is_ok());
        assert!(ensure_read_only("\n\tSeLeCt 1").is_ok());
        assert!(ensure_read_only("SELECT").is_ok());
    }

    #[test]
    fn test_other_statements_rejected() {
        for query in [
            "DROP TABLE x",
            "  delete from x",
            "INSERT INTO x VALUES (1)",
            "WITH t AS (SELECT 1) SELECT * FROM t",
            "SELECTED",
            "",
            "-- comment\nSELECT 1",
        ] {
            assert!(
                matches!(ensure_read_only(query), Err(TabulaError::QueryRejected(_))),
                "expected rejection for {:?}",
                query
            );
        }
    }
}
