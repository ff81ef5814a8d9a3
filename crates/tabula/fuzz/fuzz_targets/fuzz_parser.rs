//! Fuzz target for delimited file parsing.
//!
//! Arbitrary bytes must produce a table or an error, never a panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Write;
use tabula::Parser;

fuzz_target!(|data: &[u8]| {
    if data.len() > 100_000 {
        return;
    }

    for delimiter in [b',', b'\t'] {
        if let Ok(table) = Parser::new().parse_bytes(data, delimiter) {
            for row in &table.rows {
                assert_eq!(row.len(), table.column_count());
            }
        }
    }

    if let Ok(mut temp_file) = tempfile::NamedTempFile::with_suffix(".csv") {
        if temp_file.write_all(data).is_ok() {
            let _ = Parser::new().parse_file(temp_file.path());
        }
    }
});
