//! Store capability interface.
//!
//! The service never talks to a concrete database driver directly. All
//! persistent state goes through the [`ReviewStore`] trait, which needs only
//! a handful of generic operations (create, delete-by-id, filtered count,
//! filtered select with order and limit, plus a rating aggregation), so any
//! relational or document backend can implement it.
//!
//! Two implementations ship with the service:
//! - [`postgres::PostgresStore`]: sqlx-backed, the production backend
//! - [`memory::MemoryStore`]: mutex-guarded maps, used by tests

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{
    page::{SortBy, SortOrder},
    review::{Review, ReviewStatus},
    token::ApiToken,
};

/// Store-layer failure.
///
/// Only two things can go wrong from the service's point of view: the write
/// collided with a uniqueness constraint, or the backend itself failed.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    ///
    /// This is the authoritative duplicate guard; concurrent duplicate
    /// submissions race here and exactly one wins.
    #[error("duplicate key")]
    Duplicate,

    /// The backend is unreachable or the operation failed.
    #[error(transparent)]
    Unavailable(#[from] anyhow::Error),
}

/// Filter predicate for review queries.
///
/// All present fields are AND-combined; the rating set is OR-combined within
/// itself. Date bounds are inclusive on `created_at`.
#[derive(Debug, Clone, Default)]
pub struct ReviewFilter {
    pub ratings: Vec<i16>,
    pub status: Option<ReviewStatus>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

impl ReviewFilter {
    /// Whether a review satisfies this filter (used by the in-memory backend;
    /// the relational backend expresses the same predicate as SQL).
    pub fn matches(&self, review: &Review) -> bool {
        if !self.ratings.is_empty() && !self.ratings.contains(&review.rating) {
            return false;
        }
        if let Some(status) = self.status {
            if review.status != status {
                return false;
            }
        }
        if let Some(from) = self.date_from {
            if review.created_at < from {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            if review.created_at > to {
                return false;
            }
        }
        true
    }
}

/// Capability interface over the external store.
///
/// Implementations must make `insert_review` atomic with respect to the
/// (product_id, user_id) uniqueness rule: under concurrent duplicate
/// submissions at most one insert succeeds, the rest fail with
/// [`StoreError::Duplicate`].
#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// Cheap liveness probe for the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Persist a freshly minted token.
    async fn insert_token(&self, token: ApiToken) -> Result<ApiToken, StoreError>;

    /// Look up a token by its opaque secret.
    async fn find_token(&self, secret: &str) -> Result<Option<ApiToken>, StoreError>;

    /// Persist a new review, enforcing pair uniqueness.
    async fn insert_review(&self, review: Review) -> Result<Review, StoreError>;

    /// Whether a review already exists for this (product, user) pair.
    ///
    /// Pre-check optimization for the write path; the uniqueness constraint
    /// inside `insert_review` remains the sole guarantee.
    async fn review_exists(&self, product_id: &str, user_id: &str) -> Result<bool, StoreError>;

    /// Delete a review by id. Returns false when the id does not exist.
    async fn delete_review(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Count reviews for a product matching the filter.
    async fn count_reviews(
        &self,
        product_id: &str,
        filter: &ReviewFilter,
    ) -> Result<u64, StoreError>;

    /// Fetch one page of reviews for a product, filtered and ordered.
    ///
    /// Ordering ties are broken by review id ascending so pagination is
    /// deterministic across repeated calls against unchanged data.
    async fn list_reviews(
        &self,
        product_id: &str,
        filter: &ReviewFilter,
        sort_by: SortBy,
        sort_order: SortOrder,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<Review>, StoreError>;

    /// Per-rating review counts for a product (`result[0]` is 1-star).
    async fn rating_counts(&self, product_id: &str) -> Result<[u64; 5], StoreError>;
}
