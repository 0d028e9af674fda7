//! tgmarket Storefront - catalog and engagement service.
//!
//! Serves the JSON API on port 3000: catalog listing, product view
//! tracking, review submission, and on-demand engagement statistics.
//! Identity is supplied by an upstream identity provider; see
//! `middleware::auth`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tgmarket_storefront::catalog::Catalog;
use tgmarket_storefront::config::StorefrontConfig;
use tgmarket_storefront::db::{self, LedgerRepository};
use tgmarket_storefront::state::AppState;

#[tokio::main]
async fn main() {
    // Load configuration from environment
    let config = StorefrontConfig::from_env().expect("Failed to load configuration");

    // Initialize tracing with EnvFilter
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tgmarket_storefront=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Initialize database connection pool and apply migrations
    let pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");
    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    tracing::info!("Database ready");

    // Load the immutable catalog: seed file if configured, builtin otherwise
    let catalog = match &config.catalog_path {
        Some(path) => Catalog::from_json_file(path).expect("Failed to load catalog seed"),
        None => Catalog::builtin(),
    };
    tracing::info!(products = catalog.products().len(), "Catalog loaded");

    // Sync the catalog into the durable product seed table
    LedgerRepository::new(&pool)
        .sync_catalog(&catalog)
        .await
        .expect("Failed to sync catalog seed");

    // Build application state and router
    let state = AppState::new(config.clone(), pool, catalog);
    let app = tgmarket_storefront::app(state).layer(TraceLayer::new_for_http());

    // Start server
    let addr = config.socket_addr();
    tracing::info!("storefront listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
