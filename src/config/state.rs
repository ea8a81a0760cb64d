// Application state module
// Owns the loaded configuration and the storage handle shared by all requests

use crate::db::Database;

use super::types::Config;

/// Application state
///
/// The database handle is constructed once at startup and passed in here,
/// so every handler sees the same pool and tests can substitute an
/// in-memory instance.
pub struct AppState {
    pub config: Config,
    pub db: Database,
}

impl AppState {
    pub const fn new(config: Config, db: Database) -> Self {
        Self { config, db }
    }
}
