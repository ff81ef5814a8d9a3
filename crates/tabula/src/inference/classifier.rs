//! Column type classification.
//!
//! A column is kept as text if any value looks like a zero-padded identifier
//! (`00123`, `0456`); otherwise it becomes numeric when every non-empty value
//! parses as a number. Everything else is text.

use crate::input::DataTable;
use crate::schema::{Cell, ColumnKind, Number, SqlType};

/// Result of classifying one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub kind: ColumnKind,
    pub sql_type: SqlType,
}

/// True if any non-empty value is all ASCII digits, at least two long, and
/// starts with `0`.
pub fn has_leading_zero<'a, I>(values: I) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    values.into_iter().any(|v| {
        let v = v.trim();
        v.len() >= 2 && v.starts_with('0') && v.bytes().all(|b| b.is_ascii_digit())
    })
}

/// True if every non-empty value parses as a number and at least one exists.
pub fn is_numeric_coercible<'a, I>(values: I) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = false;
    for v in values {
        if DataTable::is_missing(v) {
            continue;
        }
        if parse_number(v).is_none() {
            return false;
        }
        seen = true;
    }
    seen
}

/// Decide how a column is stored.
pub fn classify<'a, I>(values: I) -> ColumnKind
where
    I: IntoIterator<Item = &'a str>,
    I::IntoIter: Clone,
{
    let values = values.into_iter();
    if has_leading_zero(values.clone()) {
        ColumnKind::Text
    } else if is_numeric_coercible(values) {
        ColumnKind::Numeric
    } else {
        ColumnKind::Text
    }
}

/// Classify a column and pick its SQL type.
///
/// Numeric columns are `INTEGER` when every value is a whole number that fits
/// in an `i64`, otherwise `REAL`.
pub fn classify_column(table: &DataTable, index: usize) -> Classification {
    let values: Vec<&str> = table.column_values(index).collect();
    let kind = classify(values.iter().copied());
    let sql_type = match kind {
        ColumnKind::Text => SqlType::Text,
        ColumnKind::Numeric => {
            let all_integers = values
                .iter()
                .filter(|v| !DataTable::is_missing(v))
                .all(|v| matches!(parse_number(v), Some(Number::Integer(_))));
            if all_integers {
                SqlType::Integer
            } else {
                SqlType::Real
            }
        }
    };
    Classification { kind, sql_type }
}

/// Parse a number using `.` as the decimal separator.
///
/// Accepts an optional sign, digits, a fraction and an exponent. Words such
/// as `inf` or `NaN` are not numbers here.
pub fn parse_number(value: &str) -> Option<Number> {
    let v = value.trim();
    if v.is_empty()
        || !v.bytes().any(|b| b.is_ascii_digit())
        || !v
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
    {
        return None;
    }

    if let Ok(i) = v.parse::<i64>() {
        return Some(Number::Integer(i));
    }

    match v.parse::<f64>() {
        Ok(f) if f.is_finite() => Some(Number::Real(f)),
        _ => None,
    }
}

/// Convert one raw value into a cell for a column of the given type.
///
/// Returns `None` if a numeric column holds a value that does not parse,
/// which cannot happen for a column classified by [`classify_column`].
pub fn to_cell(value: &str, sql_type: SqlType) -> Option<Cell> {
    match sql_type {
        SqlType::Text => Some(Cell::Text(value.to_string())),
        SqlType::Integer | SqlType::Real => {
            if DataTable::is_missing(value) {
                return Some(Cell::Numeric(None));
            }
            let number = parse_number(value)?;
            let number = match (sql_type, number) {
                (SqlType::Real, Number::Integer(i)) => Number::Real(i as f64),
                (_, n) => n,
            };
            Some(Cell::Numeric(Some(number)))
        }
    }
}
