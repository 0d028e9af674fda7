//! Database access for the storefront `SQLite` store.
//!
//! # Tables
//!
//! - `product` - Durable seed of the static catalog, synced at startup
//! - `view_event` - Append-only product view ledger
//! - `review` - Append-only review ledger
//!
//! # Migrations
//!
//! Migrations live in `crates/storefront/migrations/` and run at startup via
//! [`run_migrations`].
//!
//! # Concurrency
//!
//! The pool opens `SQLite` in WAL mode with foreign keys ON and a busy
//! timeout, so concurrent writers queue for the single write slot instead of
//! failing, and readers observe only committed records.

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use thiserror::Error;

pub mod ledger;

pub use ledger::LedgerRepository;

use tgmarket_core::ProductId;

/// Errors that can occur during ledger store operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The underlying store could not be reached or written. Any partially
    /// applied write has been rolled back.
    #[error("storage unavailable: {0}")]
    Storage(#[from] sqlx::Error),

    /// The referenced product has no catalog entry.
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    /// The review failed content/rating validation.
    #[error("validation failed: {0}")]
    Validation(crate::services::review::ValidationError),

    /// Data in the store is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Create a `SQLite` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is invalid or the database cannot be
/// opened.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    SqlitePoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

/// Run pending migrations.
///
/// # Errors
///
/// Returns `MigrateError` if a migration fails to apply.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
