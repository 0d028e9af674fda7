//! The engagement ledger: append-only views and reviews, gated by the
//! catalog and the review validator.

use chrono::Utc;
use sqlx::SqlitePool;

use tgmarket_core::{ProductId, UserId};

use crate::catalog::Catalog;
use crate::db::{LedgerError, LedgerRepository};
use crate::models::{Review, ViewEvent};
use crate::services::review::{self, ReviewRejection};

/// Append-only store of view events and review records.
///
/// Mutating operations are transactional per record: two concurrent appends
/// for the same product are both durably recorded, never lost, never
/// interleaved. Reads observe only committed records.
pub struct EngagementLedger<'a> {
    catalog: &'a Catalog,
    pool: &'a SqlitePool,
}

impl<'a> EngagementLedger<'a> {
    /// Create a ledger over the given catalog and store.
    #[must_use]
    pub const fn new(catalog: &'a Catalog, pool: &'a SqlitePool) -> Self {
        Self { catalog, pool }
    }

    /// Record one product view. Every call appends; rapid repeated views by
    /// the same user are not de-duplicated.
    ///
    /// # Errors
    ///
    /// - `LedgerError::ProductNotFound` if the product has no catalog entry
    /// - `LedgerError::Storage` if the append fails (nothing persisted)
    pub async fn record_view(
        &self,
        product_id: ProductId,
        user_id: Option<UserId>,
        source_address: Option<&str>,
    ) -> Result<ViewEvent, LedgerError> {
        if !self.catalog.contains(product_id) {
            return Err(LedgerError::ProductNotFound(product_id));
        }

        let occurred_at = Utc::now();
        let id = LedgerRepository::new(self.pool)
            .insert_view(product_id, user_id, occurred_at, source_address)
            .await?;

        Ok(ViewEvent {
            id,
            product_id,
            user_id,
            occurred_at,
            source_address: source_address.map(str::to_owned),
        })
    }

    /// Total recorded views for a product.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Storage` if the query fails.
    pub async fn count_views(&self, product_id: ProductId) -> Result<u64, LedgerError> {
        LedgerRepository::new(self.pool).count_views(product_id).await
    }

    /// Validate and append one review, admitted approved.
    ///
    /// # Errors
    ///
    /// - `LedgerError::Validation` with the first failing rule's reason
    /// - `LedgerError::ProductNotFound` if the product has no catalog entry
    /// - `LedgerError::Storage` if the append fails (nothing persisted)
    pub async fn submit_review(
        &self,
        product_id: ProductId,
        user_id: UserId,
        content: &str,
        rating: i64,
    ) -> Result<Review, LedgerError> {
        let rating = review::validate(self.catalog, product_id, content, rating)?;
        let content = content.trim();

        let created_at = Utc::now();
        let id = LedgerRepository::new(self.pool)
            .insert_review(product_id, user_id, content, rating, created_at)
            .await?;

        Ok(Review {
            id,
            product_id,
            user_id,
            content: content.to_owned(),
            rating,
            created_at,
            approved: true,
        })
    }

    /// The newest approved reviews across all products, newest first,
    /// capped at `limit`.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Storage` if the query fails.
    pub async fn recent_approved_reviews(&self, limit: u32) -> Result<Vec<Review>, LedgerError> {
        LedgerRepository::new(self.pool)
            .recent_approved_reviews(limit)
            .await
    }

    /// Approved review count for a product.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Storage` if the query fails.
    pub async fn count_approved_reviews(&self, product_id: ProductId) -> Result<u64, LedgerError> {
        LedgerRepository::new(self.pool)
            .count_approved_reviews(product_id)
            .await
    }

    /// Mean rating over approved reviews, in `[1.0, 5.0]`, or 0 when the
    /// product has no approved reviews. Absence of reviews is an ordinary
    /// zero result, not an error.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Storage` if the query fails.
    pub async fn average_rating(&self, product_id: ProductId) -> Result<f64, LedgerError> {
        LedgerRepository::new(self.pool).average_rating(product_id).await
    }
}

impl From<ReviewRejection> for LedgerError {
    fn from(rejection: ReviewRejection) -> Self {
        match rejection {
            ReviewRejection::Invalid(reason) => Self::Validation(reason),
            ReviewRejection::ProductNotFound(id) => Self::ProductNotFound(id),
        }
    }
}
