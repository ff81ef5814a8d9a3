//! API request handlers.

mod query;
mod tables;
mod tools;

pub use query::*;
pub use tables::*;
pub use tools::*;
