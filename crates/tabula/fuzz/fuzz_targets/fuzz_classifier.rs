//! Fuzz target for column classification.

#![no_main]

use libfuzzer_sys::fuzz_target;
use tabula::inference::{classify, has_leading_zero, parse_number, to_cell};
use tabula::{Cell, ColumnKind, SqlType};

fuzz_target!(|values: Vec<String>| {
    let kind = classify(values.iter().map(|s| s.as_str()));

    if has_leading_zero(values.iter().map(|s| s.as_str())) {
        assert_eq!(kind, ColumnKind::Text);
    }

    for value in &values {
        if let Some(n) = parse_number(value) {
            assert!(n.as_f64().is_finite());
        }
        if kind == ColumnKind::Text {
            assert_eq!(to_cell(value, SqlType::Text), Some(Cell::Text(value.clone())));
        }
    }
});
