//! Plain-text rendering of query results.

use std::fmt::Write;

use super::executor::{QueryResult, QueryValue};
use crate::inference::NumericSummary;

/// Render a query result with a header carrying the true totals.
pub fn render_result(result: &QueryResult, max_rows: usize) -> String {
    let mut out = format!(
        "# Query result ({} rows total, showing at most {}) (columns: {})\n\n## Data\n\n",
        result.total_rows, max_rows, result.total_columns
    );

    if result.rows.is_empty() {
        out.push_str("(no rows)\n");
    } else {
        let index: Vec<String> = (0..result.rows.len()).map(|i| i.to_string()).collect();
        let cells: Vec<Vec<String>> = result
            .rows
            .iter()
            .map(|row| row.iter().map(format_value).collect())
            .collect();
        out.push_str(&render_table(&result.columns, &index, &cells));
    }
    out
}

/// Render numeric summaries, one row per column.
pub fn render_summaries(summaries: &[NumericSummary]) -> String {
    let mut out = String::from("## Numeric summary\n\n");
    if summaries.is_empty() {
        out.push_str("(no numeric columns)\n");
        return out;
    }

    let headers: Vec<String> = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let index: Vec<String> = summaries.iter().map(|s| s.column.clone()).collect();
    let rows: Vec<Vec<String>> = summaries
        .iter()
        .map(|s| {
            vec![
                s.count.to_string(),
                format_float(s.mean),
                s.std.map(format_float).unwrap_or_else(|| "NaN".to_string()),
                format_float(s.min),
                format_float(s.q1),
                format_float(s.median),
                format_float(s.q3),
                format_float(s.max),
            ]
        })
        .collect();
    out.push_str(&render_table(&headers, &index, &rows));
    out
}

/// Format a single value for display.
pub fn format_value(value: &QueryValue) -> String {
    match value {
        QueryValue::Null => "NULL".to_string(),
        QueryValue::Integer(i) => i.to_string(),
        QueryValue::Real(r) => format_float(*r),
        QueryValue::Text(s) => s.replace(['\r', '\n'], " "),
        QueryValue::Blob(b) => format!("<blob {} bytes>", b.len()),
    }
}

/// Up to six decimals, trailing zeros trimmed, whole numbers keep one decimal.
pub fn format_float(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let formatted = format!("{:.6}", value);
    let trimmed = formatted.trim_end_matches('0');
    if trimmed.ends_with('.') {
        format!("{}0", trimmed)
    } else {
        trimmed.to_string()
    }
}

/// Right-aligned text table with a leading index column.
fn render_table(headers: &[String], index: &[String], rows: &[Vec<String>]) -> String {
    let index_width = index.iter().map(|s| s.chars().count()).max().unwrap_or(0);
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(col, header)| {
            rows.iter()
                .filter_map(|row| row.get(col))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let _ = write!(out, "{:index_width$}", "");
    for (header, width) in headers.iter().zip(&widths) {
        let _ = write!(out, "  {:>width$}", header, width = *width);
    }
    out.push('\n');

    for (label, row) in index.iter().zip(rows) {
        let _ = write!(out, "{:<index_width$}", label);
        for (cell, width) in row.iter().zip(&widths) {
            let _ = write!(out, "  {:>width$}", cell, width = *width);
        }
        out.push('\n');
    }
    out
}
