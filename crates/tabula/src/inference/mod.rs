//! Type inference and column statistics.

mod classifier;
mod statistics;

pub use classifier::{
    classify, classify_column, has_leading_zero, is_numeric_coercible, parse_number, to_cell,
    Classification,
};
pub use statistics::{column_statistics, summarize, NumericSummary};
