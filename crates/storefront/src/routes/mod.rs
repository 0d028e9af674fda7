//! HTTP route handlers.
//!
//! All `/api` routes require an authenticated identity via
//! [`crate::middleware::RequireAuth`].

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

pub mod products;
pub mod reviews;
pub mod stats;

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new().nest("/api", api_routes())
}

fn api_routes() -> Router<AppState> {
    Router::new()
        // Catalog listing
        .route("/products", get(products::index))
        // Engagement ledger
        .route("/products/{id}/view", post(products::track_view))
        .route("/reviews", post(reviews::create))
        .route("/reviews/recent", get(reviews::recent))
        // Aggregation
        .route("/stats", get(stats::all))
        .route("/stats/{id}", get(stats::show))
}
