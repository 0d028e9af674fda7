//! Catalog listing and view tracking handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::HeaderMap,
};
use serde::{Deserialize, Serialize};

use tgmarket_core::ProductId;

use crate::catalog::{Product, SortKey};
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Case-insensitive substring match on the product name.
    pub search: Option<String>,
    /// Sort key; defaults to name.
    pub sort: Option<SortKey>,
}

/// Product display data for API payloads.
#[derive(Debug, Serialize)]
pub struct ProductPayload {
    pub id: ProductId,
    pub name: String,
    /// Price formatted for display; the numeric amount stays in
    /// `price_minor`/`currency`.
    pub price: String,
    pub price_minor: i64,
    pub currency: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percent: Option<u8>,
    pub available: bool,
    pub description: String,
    /// Total recorded views.
    pub views: u64,
}

impl ProductPayload {
    fn new(product: &Product, views: u64) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price.display(),
            price_minor: product.price.minor_units(),
            currency: product.price.currency().code(),
            original_price: product.original_price.map(|price| price.display()),
            discount_percent: product.discount_percent,
            available: product.available,
            description: product.description.clone(),
            views,
        }
    }
}

/// Response for a recorded view.
#[derive(Debug, Serialize)]
pub struct TrackViewResponse {
    pub success: bool,
    pub product_id: ProductId,
    /// Updated total view count.
    pub views: u64,
}

/// List catalog products, filtered and sorted, decorated with view counts.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<ProductPayload>>> {
    let sort = query.sort.unwrap_or_default();
    let filter = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|search| !search.is_empty());

    let ledger = state.ledger();
    let mut payload = Vec::new();
    for product in state.catalog().list(filter, sort) {
        let views = ledger.count_views(product.id).await?;
        payload.push(ProductPayload::new(product, views));
    }

    Ok(Json(payload))
}

/// Record one view for a product and return the updated count.
pub async fn track_view(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<TrackViewResponse>> {
    let product_id = ProductId::new(id);
    let source_address = forwarded_address(&headers);

    let ledger = state.ledger();
    let event = ledger
        .record_view(product_id, Some(user.id), source_address.as_deref())
        .await?;
    let views = ledger.count_views(event.product_id).await?;

    Ok(Json(TrackViewResponse {
        success: true,
        product_id: event.product_id,
        views,
    }))
}

/// Best-effort client address from the proxy, for abuse analysis only.
fn forwarded_address(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|address| !address.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn forwarded_address_takes_the_first_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.9, 10.0.0.1"),
        );
        assert_eq!(forwarded_address(&headers).as_deref(), Some("203.0.113.9"));
    }

    #[test]
    fn forwarded_address_is_best_effort() {
        assert_eq!(forwarded_address(&HeaderMap::new()), None);
    }
}
