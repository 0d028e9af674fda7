//! Aggregation handlers.

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Path, State},
};

use tgmarket_core::ProductId;

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::services::ProductStats;
use crate::state::AppState;

/// Statistics for the whole catalog, keyed by product ID.
pub async fn all(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> Result<Json<BTreeMap<ProductId, ProductStats>>> {
    let stats = state.aggregator().stats_all().await?;
    Ok(Json(stats))
}

/// Statistics for a single product; 404 for an unknown ID.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<i64>,
) -> Result<Json<ProductStats>> {
    let stats = state.aggregator().stats(ProductId::new(id)).await?;
    Ok(Json(stats))
}
