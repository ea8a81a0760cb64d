//! Storage layer
//!
//! Wraps an `SQLite` connection pool behind an explicitly constructed
//! handle. The pool is created once at startup and shared by reference;
//! per-statement atomicity is whatever `SQLite` provides.

mod error;
pub mod users;

pub use error::StoreError;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

/// Shared database handle
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open the database and bring the schema up to date
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        Self::run_migrations(&pool).await?;

        Ok(Self { pool })
    }

    /// Create an in-memory database (for testing)
    ///
    /// A single connection is mandatory here: every new `:memory:`
    /// connection would otherwise see its own empty database.
    #[cfg(test)]
    pub async fn in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        Self::run_migrations(&pool).await?;

        Ok(Self { pool })
    }

    /// Get a reference to the underlying pool
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run database migrations
    async fn run_migrations(pool: &SqlitePool) -> Result<(), StoreError> {
        // Embedded migrations for reliability across different execution contexts
        const MIGRATIONS: &[&str] = &[include_str!("../../migrations/0001_create_users.sql")];

        for migration in MIGRATIONS {
            sqlx::query(migration)
                .execute(pool)
                .await
                .map_err(|e| StoreError::Migration(e.to_string()))?;
        }

        Ok(())
    }
}
