//! Read-only query execution and result rendering.

mod executor;
mod guard;
mod render;

pub use executor::{QueryExecutor, QueryResult, QueryValue, MAX_RESULT_ROWS};
pub use guard::ensure_read_only;
pub use render::{format_float, format_value, render_result, render_summaries};
