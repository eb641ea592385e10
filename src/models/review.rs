//! Review data models and API request/response types.
//!
//! This module defines:
//! - `Review`: Store entity representing a product review
//! - `ReviewStatus`: Moderation lifecycle state
//! - `ReviewSubmission`: Request body for submitting reviews

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Longest accepted review comment, in characters.
pub const MAX_COMMENT_LEN: usize = 2000;

/// Moderation state of a review.
///
/// New submissions default to `Approved`; `Pending` and `Rejected` exist for
/// out-of-band moderation workflows. There is no in-core transition endpoint,
/// but queries can filter on any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "review_status", rename_all = "lowercase")]
pub enum ReviewStatus {
    Approved,
    Pending,
    Rejected,
}

impl ReviewStatus {
    /// Parse a query-string value into a status.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "approved" => Some(Self::Approved),
            "pending" => Some(Self::Pending),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

/// Represents a review record from the store.
///
/// # Invariants
///
/// - `rating` is always within 1..=5 (validated on submission, CHECK
///   constraint in the relational backend)
/// - At most one review exists per (product_id, user_id) pair when `user_id`
///   is present; anonymous reviews (no user_id) are exempt
/// - Records are immutable: created by the write path, removed by the delete
///   path, never updated in place
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Review {
    /// Unique identifier for this review
    pub id: Uuid,

    /// External product identifier the review belongs to
    pub product_id: String,

    /// External user identifier of the reviewer, absent for anonymous reviews
    pub user_id: Option<String>,

    /// Star rating, 1 through 5
    pub rating: i16,

    /// Optional free-text comment (at most [`MAX_COMMENT_LEN`] characters)
    pub comment: Option<String>,

    /// Moderation state, `approved` on submission
    pub status: ReviewStatus,

    /// Timestamp when the review was submitted
    pub created_at: DateTime<Utc>,
}

/// Request body for `POST /api/v1/reviews`.
///
/// # JSON Example
///
/// ```json
/// {
///   "product_id": "p1",
///   "user_id": "u1",
///   "rating": 5,
///   "comment": "Great product"
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct ReviewSubmission {
    /// Product being reviewed
    pub product_id: String,

    /// Reviewer identity; omit for anonymous reviews
    pub user_id: Option<String>,

    /// Star rating, must be 1 through 5
    pub rating: i16,

    /// Optional comment text
    pub comment: Option<String>,
}

/// Response body for successful mutations (submit, delete).
///
/// # JSON Example
///
/// ```json
/// {
///   "success": true,
///   "review_id": "550e8400-e29b-41d4-a716-446655440000",
///   "message": "Review submitted successfully",
///   "status_code": 201
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct MutationResponse {
    /// Always true for this type; failures use the error envelope
    pub success: bool,

    /// Identifier of the affected review (absent for deletes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_id: Option<Uuid>,

    /// Human-readable outcome description
    pub message: String,

    /// Mirrors the HTTP status for clients that drop transport metadata
    pub status_code: u16,
}
