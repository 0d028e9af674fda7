//! Integration tests for tgmarket.
//!
//! The suites run hermetically against a temporary file-backed `SQLite`
//! database: no running server or external services required.
//!
//! # Test Categories
//!
//! - `ledger` - Engagement ledger and aggregator semantics
//! - `api` - HTTP surface via `tower::ServiceExt::oneshot`
//!
//! Run with: `cargo test -p tgmarket-integration-tests`

use sqlx::SqlitePool;
use tempfile::TempDir;

use tgmarket_storefront::catalog::Catalog;
use tgmarket_storefront::config::StorefrontConfig;
use tgmarket_storefront::db::{self, LedgerRepository};
use tgmarket_storefront::state::AppState;

/// A migrated store over a temporary database, seeded with the builtin
/// catalog. The `TempDir` keeps the database file alive for the test.
pub struct TestStore {
    pub pool: SqlitePool,
    pub catalog: Catalog,
    _dir: TempDir,
}

impl TestStore {
    /// Create a fresh store: temp directory, pool, migrations, catalog sync.
    ///
    /// # Panics
    ///
    /// Panics on any setup failure; tests cannot proceed without a store.
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let url = format!("sqlite://{}/ledger.db", dir.path().display());

        let pool = db::create_pool(&url).await.expect("create pool");
        db::run_migrations(&pool).await.expect("run migrations");

        let catalog = Catalog::builtin();
        LedgerRepository::new(&pool)
            .sync_catalog(&catalog)
            .await
            .expect("sync catalog seed");

        Self {
            pool,
            catalog,
            _dir: dir,
        }
    }

    /// Application state over this store, for router-level tests.
    #[must_use]
    pub fn state(&self) -> AppState {
        let config = StorefrontConfig {
            database_url: "sqlite://unused-in-tests.db".to_string(),
            host: "127.0.0.1".parse().expect("parse loopback"),
            port: 0,
            catalog_path: None,
        };
        AppState::new(config, self.pool.clone(), self.catalog.clone())
    }
}
