//! Engagement ledger domain types.
//!
//! These types represent committed ledger records, separate from database row
//! types. Both are immutable once written: the ledger appends, never updates.

use chrono::{DateTime, Utc};
use serde::Serialize;

use tgmarket_core::{ProductId, Rating, ReviewId, UserId, ViewEventId};

/// A recorded product view.
///
/// One event is appended per qualifying page visit; rapid repeated views by
/// the same user are not de-duplicated.
#[derive(Debug, Clone, Serialize)]
pub struct ViewEvent {
    /// Ledger-assigned monotonic ID.
    pub id: ViewEventId,
    /// The viewed product.
    pub product_id: ProductId,
    /// Viewer identity; absent for anonymous views.
    pub user_id: Option<UserId>,
    /// When the view occurred.
    pub occurred_at: DateTime<Utc>,
    /// Best-effort client address, for abuse analysis only.
    pub source_address: Option<String>,
}

/// A submitted product review.
#[derive(Debug, Clone, Serialize)]
pub struct Review {
    /// Ledger-assigned ID.
    pub id: ReviewId,
    /// The reviewed product.
    pub product_id: ProductId,
    /// The authenticated reviewer.
    pub user_id: UserId,
    /// Review text, validated to at least 10 characters.
    pub content: String,
    /// Star rating.
    pub rating: Rating,
    /// When the review was submitted.
    pub created_at: DateTime<Utc>,
    /// Moderation flag; reviews are admitted approved in this version.
    pub approved: bool,
}
