//! Application state shared across handlers.

use vendora_db::Database;

/// Application state shared across all handlers.
///
/// Cheaply cloneable: the database handle wraps a reference-counted pool.
/// Constructed once at startup and passed in explicitly - no globals.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    /// Create a new application state.
    pub fn new(db: Database) -> Self {
        AppState { db }
    }
}
