//! Engagement ledger and aggregator integration tests.
//!
//! Exercises the append-only ledger semantics against a real (temporary)
//! `SQLite` store: counting under sequential and concurrent writes,
//! validation precedence, averaging, and the recent-review feed.

use std::sync::Arc;

use tgmarket_core::{ProductId, UserId};
use tgmarket_integration_tests::TestStore;
use tgmarket_storefront::db::LedgerError;
use tgmarket_storefront::services::review::ValidationError;
use tgmarket_storefront::services::{Aggregator, EngagementLedger};

const VALID_CONTENT: &str = "Great product, works well";

// =============================================================================
// View counting
// =============================================================================

#[tokio::test]
async fn sequential_views_are_all_counted() {
    let store = TestStore::new().await;
    let ledger = EngagementLedger::new(&store.catalog, &store.pool);
    let product = ProductId::new(1);

    assert_eq!(ledger.count_views(product).await.unwrap(), 0);

    for n in 1..=5 {
        ledger
            .record_view(product, Some(UserId::new(42)), None)
            .await
            .unwrap();
        assert_eq!(ledger.count_views(product).await.unwrap(), n);
    }
}

#[tokio::test]
async fn repeated_views_by_the_same_user_are_not_deduplicated() {
    let store = TestStore::new().await;
    let ledger = EngagementLedger::new(&store.catalog, &store.pool);
    let product = ProductId::new(2);

    for _ in 0..3 {
        ledger
            .record_view(product, Some(UserId::new(42)), Some("203.0.113.9"))
            .await
            .unwrap();
    }

    assert_eq!(ledger.count_views(product).await.unwrap(), 3);
}

#[tokio::test]
async fn concurrent_views_are_never_lost() {
    let store = TestStore::new().await;
    let pool = store.pool.clone();
    let catalog = Arc::new(store.catalog.clone());
    let product = ProductId::new(3);

    let mut handles = Vec::new();
    for user in 1..=10_i64 {
        let pool = pool.clone();
        let catalog = Arc::clone(&catalog);
        handles.push(tokio::spawn(async move {
            let ledger = EngagementLedger::new(&catalog, &pool);
            ledger
                .record_view(product, Some(UserId::new(user)), None)
                .await
        }));
    }

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let ledger = EngagementLedger::new(&store.catalog, &store.pool);
    assert_eq!(ledger.count_views(product).await.unwrap(), 10);
}

#[tokio::test]
async fn two_concurrent_views_from_different_users_both_count() {
    let store = TestStore::new().await;
    let pool = store.pool.clone();
    let catalog = Arc::new(store.catalog.clone());
    let product = ProductId::new(3);

    let spawn_view = |user: i64| {
        let pool = pool.clone();
        let catalog = Arc::clone(&catalog);
        tokio::spawn(async move {
            let ledger = EngagementLedger::new(&catalog, &pool);
            ledger
                .record_view(product, Some(UserId::new(user)), None)
                .await
        })
    };

    let (first, second) = tokio::join!(spawn_view(1), spawn_view(2));
    first.unwrap().unwrap();
    second.unwrap().unwrap();

    let ledger = EngagementLedger::new(&store.catalog, &store.pool);
    assert_eq!(ledger.count_views(product).await.unwrap(), 2);
}

#[tokio::test]
async fn view_for_unknown_product_is_rejected_and_not_recorded() {
    let store = TestStore::new().await;
    let ledger = EngagementLedger::new(&store.catalog, &store.pool);
    let unknown = ProductId::new(99);

    let result = ledger.record_view(unknown, Some(UserId::new(1)), None).await;
    assert!(matches!(result, Err(LedgerError::ProductNotFound(id)) if id == unknown));
    assert_eq!(ledger.count_views(unknown).await.unwrap(), 0);
}

// =============================================================================
// Review submission
// =============================================================================

#[tokio::test]
async fn submitted_review_updates_stats() {
    let store = TestStore::new().await;
    let ledger = EngagementLedger::new(&store.catalog, &store.pool);
    let aggregator = Aggregator::new(&store.catalog, &store.pool);
    let product = ProductId::new(1);

    let before = aggregator.stats(product).await.unwrap();

    let review = ledger
        .submit_review(product, UserId::new(42), VALID_CONTENT, 5)
        .await
        .unwrap();
    assert!(review.approved);
    assert_eq!(review.rating.get(), 5);
    assert_eq!(review.user_id, UserId::new(42));

    let after = aggregator.stats(product).await.unwrap();
    assert_eq!(after.reviews, before.reviews + 1);
    assert!((after.avg_rating - 5.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn short_content_is_rejected_and_nothing_persists() {
    let store = TestStore::new().await;
    let ledger = EngagementLedger::new(&store.catalog, &store.pool);
    let product = ProductId::new(1);

    let result = ledger
        .submit_review(product, UserId::new(42), "bad", 5)
        .await;
    assert!(matches!(
        result,
        Err(LedgerError::Validation(ValidationError::ContentTooShort))
    ));

    assert_eq!(ledger.count_approved_reviews(product).await.unwrap(), 0);
}

#[tokio::test]
async fn validation_precedence_is_fixed() {
    let store = TestStore::new().await;
    let ledger = EngagementLedger::new(&store.catalog, &store.pool);

    // Missing fields fire before the length check.
    let result = ledger
        .submit_review(ProductId::new(1), UserId::new(1), "", 0)
        .await;
    assert!(matches!(
        result,
        Err(LedgerError::Validation(ValidationError::AllFieldsRequired))
    ));

    // Length fires before the range check even with a bad rating.
    let result = ledger
        .submit_review(ProductId::new(1), UserId::new(1), "bad", 99)
        .await;
    assert!(matches!(
        result,
        Err(LedgerError::Validation(ValidationError::ContentTooShort))
    ));

    // Range fires before catalog resolution.
    let result = ledger
        .submit_review(ProductId::new(99), UserId::new(1), VALID_CONTENT, 6)
        .await;
    assert!(matches!(
        result,
        Err(LedgerError::Validation(ValidationError::RatingOutOfRange))
    ));

    // A fully valid body against an unknown product is not-found.
    let result = ledger
        .submit_review(ProductId::new(99), UserId::new(1), VALID_CONTENT, 5)
        .await;
    assert!(matches!(result, Err(LedgerError::ProductNotFound(_))));
}

// =============================================================================
// Averaging and aggregation
// =============================================================================

#[tokio::test]
async fn average_of_5_3_4_is_exactly_4() {
    let store = TestStore::new().await;
    let ledger = EngagementLedger::new(&store.catalog, &store.pool);
    let product = ProductId::new(2);

    for (user, rating) in [(1, 5), (2, 3), (3, 4)] {
        ledger
            .submit_review(product, UserId::new(user), VALID_CONTENT, rating)
            .await
            .unwrap();
    }

    let average = ledger.average_rating(product).await.unwrap();
    assert!((average - 4.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn average_with_no_reviews_is_zero_not_an_error() {
    let store = TestStore::new().await;
    let ledger = EngagementLedger::new(&store.catalog, &store.pool);

    let average = ledger.average_rating(ProductId::new(4)).await.unwrap();
    assert!(average.abs() < f64::EPSILON);
}

#[tokio::test]
async fn stats_round_the_average_to_one_decimal() {
    let store = TestStore::new().await;
    let ledger = EngagementLedger::new(&store.catalog, &store.pool);
    let aggregator = Aggregator::new(&store.catalog, &store.pool);
    let product = ProductId::new(5);

    // Mean of [5, 4, 4] is 4.333...; rounds to 4.3.
    for (user, rating) in [(1, 5), (2, 4), (3, 4)] {
        ledger
            .submit_review(product, UserId::new(user), VALID_CONTENT, rating)
            .await
            .unwrap();
    }

    let stats = aggregator.stats(product).await.unwrap();
    assert_eq!(stats.reviews, 3);
    assert!((stats.avg_rating - 4.3).abs() < f64::EPSILON);
}

#[tokio::test]
async fn stats_for_unknown_product_is_not_found_never_zero_stats() {
    let store = TestStore::new().await;
    let aggregator = Aggregator::new(&store.catalog, &store.pool);

    let result = aggregator.stats(ProductId::new(99)).await;
    assert!(matches!(result, Err(LedgerError::ProductNotFound(_))));
}

#[tokio::test]
async fn stats_all_covers_every_catalog_product_exactly_once() {
    let store = TestStore::new().await;
    let ledger = EngagementLedger::new(&store.catalog, &store.pool);
    let aggregator = Aggregator::new(&store.catalog, &store.pool);

    ledger
        .record_view(ProductId::new(1), Some(UserId::new(1)), None)
        .await
        .unwrap();

    let all = aggregator.stats_all().await.unwrap();
    assert_eq!(all.len(), store.catalog.products().len());
    assert_eq!(all.get(&ProductId::new(1)).unwrap().views, 1);
    assert_eq!(all.get(&ProductId::new(2)).unwrap().views, 0);
}

// =============================================================================
// Recent-review feed
// =============================================================================

#[tokio::test]
async fn recent_feed_is_capped_and_newest_first() {
    let store = TestStore::new().await;
    let ledger = EngagementLedger::new(&store.catalog, &store.pool);

    let mut submitted = Vec::new();
    for n in 0..7_i64 {
        let review = ledger
            .submit_review(
                ProductId::new(1 + n % 2),
                UserId::new(1 + n),
                VALID_CONTENT,
                1 + n % 5,
            )
            .await
            .unwrap();
        submitted.push(review.id);
    }

    let recent = ledger.recent_approved_reviews(5).await.unwrap();
    assert_eq!(recent.len(), 5);

    // Newest first, strictly non-increasing timestamps.
    for pair in recent.windows(2) {
        assert!(pair[0].created_at >= pair[1].created_at);
    }

    // The newest five of the seven submissions, in reverse append order.
    let expected: Vec<_> = submitted.iter().rev().take(5).copied().collect();
    let returned: Vec<_> = recent.iter().map(|review| review.id).collect();
    assert_eq!(returned, expected);
}
