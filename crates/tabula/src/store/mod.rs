//! The live store and the loader that fills it.

mod materializer;
mod sqlite;

pub use materializer::{discover_files, LoadFailure, LoadReport, Materializer};
pub use sqlite::{quote_identifier, Store, StoreLocation};
