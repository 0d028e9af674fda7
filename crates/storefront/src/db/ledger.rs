//! Repository for the append-only engagement ledger.
//!
//! Every mutating call runs inside an explicit transaction that is committed
//! on success; on any error path the transaction is dropped, which rolls it
//! back. A half-written view or review never becomes visible to readers.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use tgmarket_core::{ProductId, Rating, ReviewId, UserId, ViewEventId};

use super::LedgerError;
use crate::catalog::Catalog;
use crate::models::Review;

/// Row type for `review`; ratings are validated on the way out.
#[derive(sqlx::FromRow)]
struct ReviewRow {
    id: ReviewId,
    product_id: ProductId,
    user_id: UserId,
    content: String,
    rating: i64,
    created_at: DateTime<Utc>,
    approved: bool,
}

impl TryFrom<ReviewRow> for Review {
    type Error = LedgerError;

    fn try_from(row: ReviewRow) -> Result<Self, Self::Error> {
        let rating = Rating::new(row.rating)
            .map_err(|e| LedgerError::DataCorruption(format!("review {}: {e}", row.id)))?;
        Ok(Self {
            id: row.id,
            product_id: row.product_id,
            user_id: row.user_id,
            content: row.content,
            rating,
            created_at: row.created_at,
            approved: row.approved,
        })
    }
}

/// Repository for ledger database operations.
pub struct LedgerRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> LedgerRepository<'a> {
    /// Create a new ledger repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Sync the static catalog into the durable `product` seed table.
    ///
    /// Runs once at startup so the ledger's foreign keys have rows to
    /// reference. The in-memory catalog stays the read model.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Storage` if the write fails.
    pub async fn sync_catalog(&self, catalog: &Catalog) -> Result<(), LedgerError> {
        let mut tx = self.pool.begin().await?;

        for product in catalog.products() {
            sqlx::query(
                r"
                INSERT OR REPLACE INTO product (id, name, price_minor, currency, available, description)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                ",
            )
            .bind(product.id)
            .bind(&product.name)
            .bind(product.price.minor_units())
            .bind(product.price.currency().code())
            .bind(product.available)
            .bind(&product.description)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        tracing::info!(products = catalog.products().len(), "catalog seed synced");
        Ok(())
    }

    /// Append one view event. Not idempotent: every call appends.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Storage` if the write fails; nothing is
    /// persisted in that case.
    pub async fn insert_view(
        &self,
        product_id: ProductId,
        user_id: Option<UserId>,
        occurred_at: DateTime<Utc>,
        source_address: Option<&str>,
    ) -> Result<ViewEventId, LedgerError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r"
            INSERT INTO view_event (product_id, user_id, occurred_at, source_address)
            VALUES (?1, ?2, ?3, ?4)
            ",
        )
        .bind(product_id)
        .bind(user_id)
        .bind(occurred_at)
        .bind(source_address)
        .execute(&mut *tx)
        .await?;

        let id = ViewEventId::new(result.last_insert_rowid());
        tx.commit().await?;

        tracing::debug!(view_event_id = %id, product_id = %product_id, "view recorded");
        Ok(id)
    }

    /// Count all recorded views for a product.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Storage` if the query fails.
    pub async fn count_views(&self, product_id: ProductId) -> Result<u64, LedgerError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM view_event WHERE product_id = ?1")
                .bind(product_id)
                .fetch_one(self.pool)
                .await?;
        to_count(count)
    }

    /// Append one review, admitted approved.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Storage` if the write fails; nothing is
    /// persisted in that case.
    pub async fn insert_review(
        &self,
        product_id: ProductId,
        user_id: UserId,
        content: &str,
        rating: Rating,
        created_at: DateTime<Utc>,
    ) -> Result<ReviewId, LedgerError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r"
            INSERT INTO review (product_id, user_id, content, rating, created_at, approved)
            VALUES (?1, ?2, ?3, ?4, ?5, 1)
            ",
        )
        .bind(product_id)
        .bind(user_id)
        .bind(content)
        .bind(rating.as_i64())
        .bind(created_at)
        .execute(&mut *tx)
        .await?;

        let id = ReviewId::new(result.last_insert_rowid());
        tx.commit().await?;

        tracing::debug!(
            review_id = %id,
            product_id = %product_id,
            user_id = %user_id,
            rating = %rating,
            "review recorded"
        );
        Ok(id)
    }

    /// The newest approved reviews across all products, newest first.
    ///
    /// Ordered by `created_at` descending with the ledger ID as tiebreaker,
    /// so reviews submitted within the same timestamp still come back in
    /// append order, newest first.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Storage` if the query fails, or
    /// `LedgerError::DataCorruption` if a stored rating is out of range.
    pub async fn recent_approved_reviews(&self, limit: u32) -> Result<Vec<Review>, LedgerError> {
        let rows: Vec<ReviewRow> = sqlx::query_as(
            r"
            SELECT id, product_id, user_id, content, rating, created_at, approved
            FROM review
            WHERE approved = 1
            ORDER BY created_at DESC, id DESC
            LIMIT ?1
            ",
        )
        .bind(i64::from(limit))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Review::try_from).collect()
    }

    /// Count approved reviews for a product.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Storage` if the query fails.
    pub async fn count_approved_reviews(&self, product_id: ProductId) -> Result<u64, LedgerError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM review WHERE product_id = ?1 AND approved = 1",
        )
        .bind(product_id)
        .fetch_one(self.pool)
        .await?;
        to_count(count)
    }

    /// Unrounded mean rating over approved reviews; 0 when there are none.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Storage` if the query fails.
    pub async fn average_rating(&self, product_id: ProductId) -> Result<f64, LedgerError> {
        let average: Option<f64> = sqlx::query_scalar(
            "SELECT AVG(rating) FROM review WHERE product_id = ?1 AND approved = 1",
        )
        .bind(product_id)
        .fetch_one(self.pool)
        .await?;
        Ok(average.unwrap_or(0.0))
    }
}

fn to_count(value: i64) -> Result<u64, LedgerError> {
    u64::try_from(value)
        .map_err(|_| LedgerError::DataCorruption(format!("negative count {value}")))
}
