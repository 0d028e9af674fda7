//! Review submission and recent-feed handlers.

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tgmarket_core::{ProductId, Rating, ReviewId, UserId};

use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::Review;
use crate::state::AppState;

/// Default and maximum sizes for the recent-review feed.
const DEFAULT_RECENT_LIMIT: u32 = 5;
const MAX_RECENT_LIMIT: u32 = 50;

/// Review submission body.
///
/// Fields default to zero values so a missing field reports
/// `AllFieldsRequired` from the validator instead of a deserialization
/// error.
#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    #[serde(default)]
    pub product_id: i64,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub rating: i64,
}

/// A created review, denormalized with the product name and the requester's
/// identity label.
#[derive(Debug, Serialize)]
pub struct CreatedReview {
    pub id: ReviewId,
    pub product_id: ProductId,
    pub product_name: String,
    pub content: String,
    pub rating: Rating,
    pub user_id: UserId,
    pub user_label: String,
    pub created_at: DateTime<Utc>,
}

/// Response for a submitted review.
#[derive(Debug, Serialize)]
pub struct CreateReviewResponse {
    pub success: bool,
    pub review: CreatedReview,
}

/// Recent-feed query parameters.
#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<u32>,
}

/// One entry in the recent-review feed.
#[derive(Debug, Serialize)]
pub struct ReviewPayload {
    pub id: ReviewId,
    pub product_id: ProductId,
    pub user_id: UserId,
    pub content: String,
    pub rating: Rating,
    pub created_at: DateTime<Utc>,
}

impl From<Review> for ReviewPayload {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            product_id: review.product_id,
            user_id: review.user_id,
            content: review.content,
            rating: review.rating,
            created_at: review.created_at,
        }
    }
}

/// Validate and append a review for the authenticated caller.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<CreateReviewRequest>,
) -> Result<Json<CreateReviewResponse>> {
    let product_id = ProductId::new(body.product_id);

    let review = state
        .ledger()
        .submit_review(product_id, user.id, &body.content, body.rating)
        .await?;

    let product_name = state
        .catalog()
        .lookup(review.product_id)
        .map(|product| product.name.clone())
        .ok_or_else(|| AppError::Internal("reviewed product missing from catalog".to_string()))?;

    Ok(Json(CreateReviewResponse {
        success: true,
        review: CreatedReview {
            id: review.id,
            product_id: review.product_id,
            product_name,
            content: review.content,
            rating: review.rating,
            user_id: review.user_id,
            user_label: user.label,
            created_at: review.created_at,
        },
    }))
}

/// The newest approved reviews, newest first, capped at `limit`.
pub async fn recent(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(query): Query<RecentQuery>,
) -> Result<Json<Vec<ReviewPayload>>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_RECENT_LIMIT)
        .min(MAX_RECENT_LIMIT);

    let reviews = state.ledger().recent_approved_reviews(limit).await?;
    Ok(Json(reviews.into_iter().map(ReviewPayload::from).collect()))
}
