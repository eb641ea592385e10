//! Review write path: submission with duplicate prevention, and deletion.
//!
//! # Duplicate guard
//!
//! When a `user_id` is present, the pair (product_id, user_id) may hold at
//! most one review. The service runs an existence pre-check for a friendly
//! fast path, but the authoritative guard is the store's uniqueness
//! constraint inside `insert_review`: two concurrent submissions for the
//! same pair race there and exactly one wins, the loser surfacing as the
//! same 409. Anonymous submissions (no user_id) are exempt.

use chrono::Utc;
use uuid::Uuid;

use crate::{
    audit::AuditLog,
    error::AppError,
    models::review::{MAX_COMMENT_LEN, Review, ReviewStatus, ReviewSubmission},
    store::ReviewStore,
};

/// Validate and persist a new review.
///
/// # Process
///
/// 1. Validate rating range, product id and comment length
/// 2. Pre-check the (product, user) pair when a user id is present
/// 3. Insert with status `approved` and a fresh id
/// 4. Append an audit event
///
/// # Errors
///
/// - `Validation`: rating outside 1..=5, blank product or user id, or a
///   comment over [`MAX_COMMENT_LEN`] characters
/// - `Duplicate`: the pair already has a review (pre-check or constraint)
/// - `StoreUnavailable`: the backend failed
pub async fn submit(
    store: &dyn ReviewStore,
    audit: &AuditLog,
    submission: ReviewSubmission,
    actor: &str,
) -> Result<Review, AppError> {
    if !(1..=5).contains(&submission.rating) {
        return Err(AppError::Validation(
            "rating must be between 1 and 5".into(),
        ));
    }
    if submission.product_id.trim().is_empty() {
        return Err(AppError::Validation("product_id must not be empty".into()));
    }
    if let Some(user_id) = &submission.user_id {
        if user_id.trim().is_empty() {
            return Err(AppError::Validation(
                "user_id must not be empty when provided".into(),
            ));
        }
    }
    if let Some(comment) = &submission.comment {
        if comment.chars().count() > MAX_COMMENT_LEN {
            return Err(AppError::Validation(format!(
                "comment must not exceed {MAX_COMMENT_LEN} characters"
            )));
        }
    }

    // Fast-path duplicate check; the store constraint still guards the race
    if let Some(user_id) = &submission.user_id {
        if store
            .review_exists(&submission.product_id, user_id)
            .await?
        {
            return Err(AppError::Duplicate);
        }
    }

    let review = Review {
        id: Uuid::new_v4(),
        product_id: submission.product_id,
        user_id: submission.user_id,
        rating: submission.rating,
        comment: submission.comment,
        status: ReviewStatus::Approved,
        created_at: Utc::now(),
    };

    let review = store.insert_review(review).await?;

    audit.review_submitted(
        review.id,
        &review.product_id,
        review.user_id.as_deref(),
        review.rating,
        actor,
    );

    Ok(review)
}

/// Permanently delete a review by id.
///
/// No soft-delete, no tombstone: the record is gone afterwards, and deleting
/// the same id again is a 404.
pub async fn delete(
    store: &dyn ReviewStore,
    audit: &AuditLog,
    review_id: Uuid,
    actor: &str,
) -> Result<(), AppError> {
    let deleted = store.delete_review(review_id).await?;
    if !deleted {
        return Err(AppError::NotFound);
    }

    audit.review_deleted(review_id, actor);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    fn submission(product: &str, user: Option<&str>, rating: i16) -> ReviewSubmission {
        ReviewSubmission {
            product_id: product.to_string(),
            user_id: user.map(str::to_string),
            rating,
            comment: None,
        }
    }

    #[tokio::test]
    async fn fresh_pair_succeeds_exactly_once() {
        let store = MemoryStore::new();
        let audit = AuditLog::new();

        let review = submit(&store, &audit, submission("p1", Some("u1"), 5), "test")
            .await
            .unwrap();
        assert_eq!(review.status, ReviewStatus::Approved);
        assert_eq!(review.rating, 5);

        let err = submit(&store, &audit, submission("p1", Some("u1"), 4), "test")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Duplicate));
    }

    #[tokio::test]
    async fn out_of_range_ratings_fail_validation() {
        let store = MemoryStore::new();
        let audit = AuditLog::new();

        for rating in [0, 6, -1] {
            let err = submit(&store, &audit, submission("p1", None, rating), "test")
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::Validation(_)), "accepted {rating}");
        }
    }

    #[tokio::test]
    async fn oversized_comment_fails_validation() {
        let store = MemoryStore::new();
        let audit = AuditLog::new();

        let mut submission = submission("p1", None, 3);
        submission.comment = Some("x".repeat(MAX_COMMENT_LEN + 1));
        let err = submit(&store, &audit, submission, "test").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn delete_is_permanent() {
        let store = MemoryStore::new();
        let audit = AuditLog::new();

        let review = submit(&store, &audit, submission("p1", Some("u1"), 5), "test")
            .await
            .unwrap();

        delete(&store, &audit, review.id, "test").await.unwrap();
        let err = delete(&store, &audit, review.id, "test").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound));

        // the pair is free again after deletion
        submit(&store, &audit, submission("p1", Some("u1"), 2), "test")
            .await
            .unwrap();
    }
}
