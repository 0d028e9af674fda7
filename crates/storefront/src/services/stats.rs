//! Read-side aggregation over the engagement ledger.
//!
//! The aggregator is stateless and never mutates the ledger. There is no
//! caching layer in between, so every call reflects the latest committed
//! writes (read-after-write consistency).

use std::collections::BTreeMap;

use serde::Serialize;
use sqlx::SqlitePool;

use tgmarket_core::ProductId;

use crate::catalog::Catalog;
use crate::db::{LedgerError, LedgerRepository};

/// Per-product engagement statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProductStats {
    /// Total recorded views.
    pub views: u64,
    /// Approved review count.
    pub reviews: u64,
    /// Average approved rating, rounded half-away-from-zero to one decimal
    /// place; 0.0 when there are no approved reviews.
    pub avg_rating: f64,
}

/// Computes per-product statistics from the ledger and the catalog.
pub struct Aggregator<'a> {
    catalog: &'a Catalog,
    pool: &'a SqlitePool,
}

impl<'a> Aggregator<'a> {
    /// Create an aggregator over the given catalog and store.
    #[must_use]
    pub const fn new(catalog: &'a Catalog, pool: &'a SqlitePool) -> Self {
        Self { catalog, pool }
    }

    /// Statistics for one product.
    ///
    /// An unknown product is a caller error, never a zero-stat result, so
    /// misconfigured IDs are not masked.
    ///
    /// # Errors
    ///
    /// - `LedgerError::ProductNotFound` if the product has no catalog entry
    /// - `LedgerError::Storage` if a query fails
    pub async fn stats(&self, product_id: ProductId) -> Result<ProductStats, LedgerError> {
        if !self.catalog.contains(product_id) {
            return Err(LedgerError::ProductNotFound(product_id));
        }
        self.stats_unchecked(product_id).await
    }

    /// Statistics for every catalog product, each visited exactly once.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Storage` if a query fails.
    pub async fn stats_all(&self) -> Result<BTreeMap<ProductId, ProductStats>, LedgerError> {
        let mut all = BTreeMap::new();
        for product in self.catalog.products() {
            let stats = self.stats_unchecked(product.id).await?;
            all.insert(product.id, stats);
        }
        Ok(all)
    }

    async fn stats_unchecked(&self, product_id: ProductId) -> Result<ProductStats, LedgerError> {
        let repo = LedgerRepository::new(self.pool);
        let views = repo.count_views(product_id).await?;
        let reviews = repo.count_approved_reviews(product_id).await?;
        let avg_rating = round_one_decimal(repo.average_rating(product_id).await?);
        Ok(ProductStats {
            views,
            reviews,
            avg_rating,
        })
    }
}

/// Round half-away-from-zero to one decimal digit.
fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_away_from_zero() {
        assert!((round_one_decimal(4.25) - 4.3).abs() < f64::EPSILON);
        assert!((round_one_decimal(4.24) - 4.2).abs() < f64::EPSILON);
        assert!((round_one_decimal(4.0) - 4.0).abs() < f64::EPSILON);
        assert!((round_one_decimal(0.0)).abs() < f64::EPSILON);
        // The mean of ratings [5, 3, 4].
        assert!((round_one_decimal(12.0 / 3.0) - 4.0).abs() < f64::EPSILON);
    }
}
