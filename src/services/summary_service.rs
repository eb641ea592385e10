//! Rating aggregation for a product.
//!
//! The summary is derived on every request from the per-rating counts the
//! store reports. Reviews of every status are counted, matching the
//! behavior integrators already see (moderation state gates nothing here).

use crate::{error::AppError, models::summary::RatingSummary, store::ReviewStore};

/// Compute aggregate rating statistics for a product.
///
/// A product with no reviews yields a zeroed summary (`average_rating` 0.0,
/// all distribution entries 0), never an error.
pub async fn summarize(
    store: &dyn ReviewStore,
    product_id: &str,
) -> Result<RatingSummary, AppError> {
    let counts = store.rating_counts(product_id).await?;
    Ok(RatingSummary::from_counts(product_id.to_string(), counts))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::models::review::{Review, ReviewStatus};
    use crate::store::memory::MemoryStore;

    async fn seed(store: &MemoryStore, rating: i16, status: ReviewStatus) {
        store
            .insert_review(Review {
                id: Uuid::new_v4(),
                product_id: "p1".into(),
                user_id: None,
                rating,
                comment: None,
                status,
                created_at: Utc::now(),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn distribution_sums_to_total() {
        let store = MemoryStore::new();
        seed(&store, 5, ReviewStatus::Approved).await;
        seed(&store, 5, ReviewStatus::Approved).await;
        seed(&store, 3, ReviewStatus::Approved).await;

        let summary = summarize(&store, "p1").await.unwrap();
        assert_eq!(summary.total_reviews, 3);
        let sum: u64 = summary.rating_distribution.values().sum();
        assert_eq!(sum, summary.total_reviews);
        assert_eq!(summary.average_rating, 4.33);
    }

    #[tokio::test]
    async fn all_statuses_are_counted() {
        let store = MemoryStore::new();
        seed(&store, 5, ReviewStatus::Approved).await;
        seed(&store, 1, ReviewStatus::Pending).await;
        seed(&store, 1, ReviewStatus::Rejected).await;

        let summary = summarize(&store, "p1").await.unwrap();
        assert_eq!(summary.total_reviews, 3);
        assert_eq!(summary.rating_distribution["1"], 2);
    }

    #[tokio::test]
    async fn zero_review_product_is_all_zeros() {
        let store = MemoryStore::new();
        let summary = summarize(&store, "missing").await.unwrap();
        assert_eq!(summary.total_reviews, 0);
        assert_eq!(summary.average_rating, 0.0);
        assert!(summary.rating_distribution.values().all(|&c| c == 0));
    }
}
