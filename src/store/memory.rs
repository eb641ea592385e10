//! In-memory implementation of the store capability interface.
//!
//! Backs the test suite and self-contained runs. Semantics mirror the
//! PostgreSQL backend: the (product_id, user_id) uniqueness check happens
//! under the same lock as the insert, so concurrent duplicate submissions
//! admit exactly one winner here too.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    models::{
        page::{SortBy, SortOrder},
        review::Review,
        token::ApiToken,
    },
    store::{ReviewFilter, ReviewStore, StoreError},
};

#[derive(Default)]
struct Inner {
    /// Tokens keyed by their opaque secret
    tokens: HashMap<String, ApiToken>,
    reviews: HashMap<Uuid, Review>,
}

/// Mutex-guarded map store.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A poisoned lock only means a panic elsewhere; the data is still usable
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl ReviewStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn insert_token(&self, token: ApiToken) -> Result<ApiToken, StoreError> {
        let mut inner = self.lock();
        if inner.tokens.contains_key(&token.token) {
            return Err(StoreError::Duplicate);
        }
        inner.tokens.insert(token.token.clone(), token.clone());
        Ok(token)
    }

    async fn find_token(&self, secret: &str) -> Result<Option<ApiToken>, StoreError> {
        Ok(self.lock().tokens.get(secret).cloned())
    }

    async fn insert_review(&self, review: Review) -> Result<Review, StoreError> {
        let mut inner = self.lock();
        // check-then-insert under one guard: at most one pair wins
        if let Some(user_id) = &review.user_id {
            let duplicate = inner.reviews.values().any(|existing| {
                existing.product_id == review.product_id
                    && existing.user_id.as_deref() == Some(user_id.as_str())
            });
            if duplicate {
                return Err(StoreError::Duplicate);
            }
        }
        inner.reviews.insert(review.id, review.clone());
        Ok(review)
    }

    async fn review_exists(&self, product_id: &str, user_id: &str) -> Result<bool, StoreError> {
        Ok(self.lock().reviews.values().any(|review| {
            review.product_id == product_id && review.user_id.as_deref() == Some(user_id)
        }))
    }

    async fn delete_review(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.lock().reviews.remove(&id).is_some())
    }

    async fn count_reviews(
        &self,
        product_id: &str,
        filter: &ReviewFilter,
    ) -> Result<u64, StoreError> {
        Ok(self
            .lock()
            .reviews
            .values()
            .filter(|review| review.product_id == product_id && filter.matches(review))
            .count() as u64)
    }

    async fn list_reviews(
        &self,
        product_id: &str,
        filter: &ReviewFilter,
        sort_by: SortBy,
        sort_order: SortOrder,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<Review>, StoreError> {
        let mut matching: Vec<Review> = self
            .lock()
            .reviews
            .values()
            .filter(|review| review.product_id == product_id && filter.matches(review))
            .cloned()
            .collect();

        matching.sort_by(|a, b| {
            let ordering = match sort_by {
                SortBy::CreatedAt => a.created_at.cmp(&b.created_at),
                SortBy::Rating => a.rating.cmp(&b.rating),
            };
            let ordering = match sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            };
            // id ascending as the stable tie-break, same as the SQL backend
            ordering.then_with(|| a.id.cmp(&b.id))
        });

        Ok(matching
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn rating_counts(&self, product_id: &str) -> Result<[u64; 5], StoreError> {
        let mut counts = [0u64; 5];
        for review in self.lock().reviews.values() {
            if review.product_id == product_id && (1..=5).contains(&review.rating) {
                counts[(review.rating - 1) as usize] += 1;
            }
        }
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, Utc};

    use super::*;
    use crate::models::review::ReviewStatus;

    fn review(product: &str, user: Option<&str>, rating: i16, age_secs: i64) -> Review {
        Review {
            id: Uuid::new_v4(),
            product_id: product.to_string(),
            user_id: user.map(str::to_string),
            rating,
            comment: None,
            status: ReviewStatus::Approved,
            created_at: Utc::now() - Duration::seconds(age_secs),
        }
    }

    #[tokio::test]
    async fn duplicate_pair_is_rejected() {
        let store = MemoryStore::new();
        store
            .insert_review(review("p1", Some("u1"), 5, 0))
            .await
            .unwrap();
        let err = store
            .insert_review(review("p1", Some("u1"), 3, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate));

        // same user on another product is fine
        store
            .insert_review(review("p2", Some("u1"), 4, 0))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn anonymous_reviews_are_exempt_from_uniqueness() {
        let store = MemoryStore::new();
        store.insert_review(review("p1", None, 5, 0)).await.unwrap();
        store.insert_review(review("p1", None, 4, 0)).await.unwrap();
        assert_eq!(
            store
                .count_reviews("p1", &ReviewFilter::default())
                .await
                .unwrap(),
            2
        );
    }

    #[tokio::test]
    async fn concurrent_duplicates_admit_one_winner() {
        let store = Arc::new(MemoryStore::new());
        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.insert_review(review("p1", Some("u1"), 5, 0)).await
            }));
        }

        let mut wins = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                wins += 1;
            }
        }
        assert_eq!(wins, 1);
    }

    #[tokio::test]
    async fn listing_is_deterministic_under_rating_ties() {
        let store = MemoryStore::new();
        for _ in 0..5 {
            store.insert_review(review("p1", None, 4, 0)).await.unwrap();
        }

        let first = store
            .list_reviews(
                "p1",
                &ReviewFilter::default(),
                SortBy::Rating,
                SortOrder::Desc,
                10,
                0,
            )
            .await
            .unwrap();
        let second = store
            .list_reviews(
                "p1",
                &ReviewFilter::default(),
                SortBy::Rating,
                SortOrder::Desc,
                10,
                0,
            )
            .await
            .unwrap();

        let ids: Vec<Uuid> = first.iter().map(|r| r.id).collect();
        let ids_again: Vec<Uuid> = second.iter().map(|r| r.id).collect();
        assert_eq!(ids, ids_again);
    }

    #[tokio::test]
    async fn filters_are_and_combined() {
        let store = MemoryStore::new();
        store
            .insert_review(review("p1", Some("u1"), 5, 10))
            .await
            .unwrap();
        store
            .insert_review(review("p1", Some("u2"), 2, 10))
            .await
            .unwrap();
        store
            .insert_review(review("p1", Some("u3"), 5, 100_000))
            .await
            .unwrap();

        let filter = ReviewFilter {
            ratings: vec![4, 5],
            date_from: Some(Utc::now() - Duration::seconds(3600)),
            ..Default::default()
        };
        // only the recent 5-star review matches both predicates
        assert_eq!(store.count_reviews("p1", &filter).await.unwrap(), 1);
    }
}
