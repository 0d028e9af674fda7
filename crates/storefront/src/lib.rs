//! tgmarket Storefront library.
//!
//! The catalog and engagement service as a library, allowing the router to
//! be exercised in tests without binding a socket.
//!
//! # Architecture
//!
//! - Axum web framework serving a JSON API
//! - Immutable product catalog loaded once at startup
//! - `SQLite` (sqlx) append-only engagement ledger: view events and reviews
//! - Read-side aggregator deriving per-product statistics on demand
//! - Identity supplied by an upstream identity provider via forwarded
//!   headers; the service itself stores no credentials

#![cfg_attr(not(test), forbid(unsafe_code))]

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Router, routing::get};

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use state::AppState;

/// Build the full application router over the given state.
#[must_use]
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity before returning OK.
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
