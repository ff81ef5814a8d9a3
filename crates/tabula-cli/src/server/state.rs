//! Application state for the web server.

use std::sync::Arc;
use tokio::sync::Mutex;

use tabula::Tabula;

/// Shared application state.
///
/// Every request locks the single `Tabula`, so loads and queries never overlap.
#[derive(Clone)]
pub struct AppState {
    pub tabula: Arc<Mutex<Tabula>>,
}

impl AppState {
    pub fn new(tabula: Tabula) -> Self {
        Self {
            tabula: Arc::new(Mutex::new(tabula)),
        }
    }
}
