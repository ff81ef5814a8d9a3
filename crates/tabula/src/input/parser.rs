//! CSV/TSV parser.

use std::borrow::Cow;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{Result, TabulaError};
use super::source::{DataTable, SourceMetadata};

/// File extensions picked up by a directory scan.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["csv", "tsv"];

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

const QUOTE: u8 = b'"';

/// Parser configuration.
#[derive(Debug, Clone, Default)]
pub struct ParserConfig {
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
}

/// Parses tabular data files.
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a file and return the data table and metadata.
    ///
    /// `.tsv` files are tab-delimited; everything else is comma-delimited.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(DataTable, SourceMetadata)> {
        let path = path.as_ref();

        let mut file = File::open(path).map_err(|e| TabulaError::io(path, e))?;
        let size_bytes = file
            .metadata()
            .map_err(|e| TabulaError::io(path, e))?
            .len();

        let mut contents = Vec::new();
        file.read_to_end(&mut contents)
            .map_err(|e| TabulaError::io(path, e))?;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let bytes = contents.strip_prefix(UTF8_BOM).unwrap_or(&contents);

        let (delimiter, format) = if is_tsv(path) {
            (b'\t', "tsv")
        } else {
            (b',', "csv")
        };

        let data_table = self.parse_bytes(bytes, delimiter)?;

        let source_metadata = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            size_bytes,
            format.to_string(),
            data_table.row_count(),
            data_table.column_count(),
        );

        Ok((data_table, source_metadata))
    }

    /// Parse bytes directly.
    ///
    /// Short rows are padded with empty strings. A row with more fields than
    /// the header is an error. In a one-column file a blank line is a row
    /// with a missing value.
    pub fn parse_bytes(&self, bytes: &[u8], delimiter: u8) -> Result<DataTable> {
        let mut headers: Vec<String> = reader(bytes, delimiter)
            .headers()?
            .iter()
            .map(|s| s.to_string())
            .collect();

        let bytes = if headers.len() == 1 {
            quote_blank_lines(bytes)
        } else {
            Cow::Borrowed(bytes)
        };
        let mut reader = reader(&bytes, delimiter);

        let mut rows = Vec::new();

        for (row_idx, result) in reader.records().enumerate() {
            if let Some(max) = self.config.max_rows {
                if row_idx >= max {
                    break;
                }
            }

            let record = result?;

            let expected_cols = headers.len();
            if record.len() > expected_cols {
                return Err(TabulaError::Parse {
                    row: row_idx + 1,
                    column: expected_cols + 1,
                    message: format!(
                        "expected {} fields, found {}",
                        expected_cols,
                        record.len()
                    ),
                });
            }

            let mut row: Vec<String> = record.iter().map(|s| s.to_string()).collect();
            row.resize(expected_cols, String::new());
            rows.push(row);
        }

        // A lone empty header field means the file had no header at all.
        if headers.is_empty() || (headers.len() == 1 && headers[0].trim().is_empty() && rows.is_empty()) {
            return Err(TabulaError::EmptyData("No columns found".to_string()));
        }

        normalize_headers(&mut headers)?;

        Ok(DataTable::new(headers, rows))
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

fn reader(bytes: &[u8], delimiter: u8) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .quote(QUOTE)
        .flexible(true)
        .from_reader(bytes)
}

/// Rewrite blank lines after the first record as an empty quoted field.
///
/// `csv` skips blank lines, which in a one-column file are empty values.
/// Blank lines inside quoted fields and at the end of input are kept as-is.
fn quote_blank_lines(bytes: &[u8]) -> Cow<'_, [u8]> {
    let mut end = bytes.len();
    while end > 0 && matches!(bytes[end - 1], b'\n' | b'\r') {
        end -= 1;
    }
    let body = &bytes[..end];

    let mut out = Vec::with_capacity(bytes.len() + 16);
    let mut in_quotes = false;
    let mut quoted_field = false;
    let mut seen_record = false;
    let mut line_start = true;

    for (i, &b) in body.iter().enumerate() {
        let blank = b == b'\n' || (b == b'\r' && body.get(i + 1) == Some(&b'\n'));
        if line_start && blank && seen_record && !in_quotes {
            out.extend_from_slice(&[QUOTE, QUOTE]);
        }
        // Only a field that opens with a quote is quoted.
        if b == QUOTE && (quoted_field || line_start) {
            quoted_field = true;
            in_quotes = !in_quotes;
        }
        if b == b'\n' && !in_quotes {
            quoted_field = false;
        }
        if !blank && b != b'\n' {
            seen_record = true;
        }
        out.push(b);
        line_start = b == b'\n';
    }
    out.push(b'\n');

    Cow::Owned(out)
}

/// Name blank headers positionally and reject duplicates.
fn normalize_headers(headers: &mut [String]) -> Result<()> {
    let mut seen = HashSet::new();
    for (idx, header) in headers.iter_mut().enumerate() {
        if header.trim().is_empty() {
            *header = format!("column_{}", idx + 1);
        }
        if !seen.insert(header.clone()) {
            return Err(TabulaError::Parse {
                row: 0,
                column: idx + 1,
                message: format!("duplicate column name '{}'", header),
            });
        }
    }
    Ok(())
}

fn is_tsv(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| e.eq_ignore_ascii_case("tsv"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_tsv() {
        assert!(is_tsv(Path::new("b.TSV")));
        assert!(!is_tsv(Path::new("a/b.csv")));
        assert!(!is_tsv(Path::new("b")));
    }

    #[test]
    fn test_single_column_blank_line_is_missing_value() {
        let parser = Parser::new();
        let table = parser.parse_bytes(b"amount\n10\n\n30\n", b',').unwrap();

        assert_eq!(table.row_count(), 3);
        assert_eq!(table.rows[1], vec![""]);
        assert_eq!(table.rows[2], vec!["30"]);
    }

    #[test]
    fn test_single_column_crlf_and_trailing_blank_lines() {
        let parser = Parser::new();
        let table = parser
            .parse_bytes(b"amount\r\n10\r\n\r\n20.5\r\n\r\n\r\n", b',')
            .unwrap();

        let values: Vec<&str> = table.column_values(0).collect();
        assert_eq!(values, vec!["10", "", "20.5"]);
    }

    #[test]
    fn test_single_column_blank_line_inside_quotes_kept() {
        let parser = Parser::new();
        let table = parser.parse_bytes(b"note\n\"a\n\nb\"\nc\n", b',').unwrap();

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows[0], vec!["a\n\nb"]);
        assert_eq!(table.rows[1], vec!["c"]);
    }

    #[test]
    fn test_single_column_stray_quote_does_not_hide_blank_lines() {
        let parser = Parser::new();
        let table = parser.parse_bytes(b"size\n5\"\n\n7\n", b',').unwrap();
        let values: Vec<&str> = table.column_values(0).collect();
        assert_eq!(values, vec!["5\"", "", "7"]);
    }

    #[test]
    fn test_single_column_header_after_leading_blank_line() {
        let parser = Parser::new();
        let table = parser.parse_bytes(b"\namount\n1\n", b',').unwrap();
        assert_eq!(table.headers, vec!["amount"]);
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn test_parse_csv() {
        let parser = Parser::new();
        let data = b"name,age,city\nAlice,30,NYC\nBob,25,LA";
        let table = parser.parse_bytes(data, b',').unwrap();

        assert_eq!(table.headers, vec!["name", "age", "city"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.get(0, 0), Some("Alice"));
        assert_eq!(table.get(1, 1), Some("25"));
    }

    #[test]
    fn test_short_rows_padded_with_empty_strings() {
        let parser = Parser::new();
        let table = parser.parse_bytes(b"a,b,c\n1\n2,3", b',').unwrap();

        assert_eq!(table.rows[0], vec!["1", "", ""]);
        assert_eq!(table.rows[1], vec!["2", "3", ""]);
    }

    #[test]
    fn test_long_row_is_parse_error() {
        let parser = Parser::new();
        let err = parser.parse_bytes(b"a,b\n1,2,3", b',').unwrap_err();
        assert!(matches!(err, TabulaError::Parse { row: 1, .. }));
    }

    #[test]
    fn test_header_only_is_zero_rows() {
        let parser = Parser::new();
        let table = parser.parse_bytes(b"a,b\n", b',').unwrap();
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_empty_input_has_no_columns() {
        let parser = Parser::new();
        assert!(matches!(
            parser.parse_bytes(b"", b','),
            Err(TabulaError::EmptyData(_))
        ));
    }

    #[test]
    fn test_duplicate_header_rejected() {
        let parser = Parser::new();
        assert!(matches!(
            parser.parse_bytes(b"a,a\n1,2", b','),
            Err(TabulaError::Parse { row: 0, column: 2, .. })
        ));
    }

    #[test]
    fn test_blank_header_named_by_position() {
        let parser = Parser::new();
        let table = parser.parse_bytes(b",b\n1,2", b',').unwrap();
        assert_eq!(table.headers, vec!["column_1", "b"]);
    }

    #[test]
    fn test_max_rows() {
        let parser = Parser::with_config(ParserConfig {
            max_rows: Some(1),
            ..ParserConfig::default()
        });
        let table = parser.parse_bytes(b"a\n1\n2\n3", b',').unwrap();
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn test_is_missing() {
        assert!(DataTable::is_missing(""));
        assert!(DataTable::is_missing("   "));
        assert!(!DataTable::is_missing("NA"));
        assert!(!DataTable::is_missing("null"));
        assert!(!DataTable::is_missing("0"));
    }
}
