//! Review HTTP handlers.
//!
//! This module implements the review-related API endpoints:
//! - POST /api/v1/reviews - Submit a review
//! - DELETE /api/v1/reviews/{review_id} - Permanently delete a review
//! - GET /api/v1/products/{product_id}/reviews - List reviews (paged)
//! - GET /api/v1/products/{product_id}/summary - Aggregate rating statistics

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    AppState,
    error::AppError,
    middleware::auth::AuthContext,
    models::{
        page::{ListParams, PageRequest, PagedReviews},
        review::{MutationResponse, ReviewSubmission},
        summary::RatingSummary,
    },
    services::{query_service, review_service, summary_service},
};

/// Submit a new review.
///
/// # Endpoint
///
/// `POST /api/v1/reviews`
///
/// # Request Body
///
/// ```json
/// {
///   "product_id": "p1",
///   "user_id": "u1",
///   "rating": 5,
///   "comment": "Great product"
/// }
/// ```
///
/// # Response
///
/// - **Success (201 Created)**: `{success, review_id, message, status_code}`
/// - **Error (409)**: this (product, user) pair already has a review
/// - **Error (422)**: rating out of range, blank ids, oversized comment
///
/// Omitting `user_id` submits anonymously; anonymous reviews are exempt from
/// the one-review-per-pair rule.
pub async fn submit_review(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(submission): Json<ReviewSubmission>,
) -> Result<(StatusCode, Json<MutationResponse>), AppError> {
    let review =
        review_service::submit(state.store.as_ref(), &state.audit, submission, &auth.token_name)
            .await?;

    Ok((
        StatusCode::CREATED,
        Json(MutationResponse {
            success: true,
            review_id: Some(review.id),
            message: "Review submitted successfully".to_string(),
            status_code: StatusCode::CREATED.as_u16(),
        }),
    ))
}

/// Permanently delete a review by id.
///
/// # Endpoint
///
/// `DELETE /api/v1/reviews/{review_id}`
///
/// # Response
///
/// - **Success (200 OK)**: `{success, message, status_code}`
/// - **Error (404)**: no review with this id (including repeat deletes)
pub async fn delete_review(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(review_id): Path<Uuid>,
) -> Result<Json<MutationResponse>, AppError> {
    review_service::delete(state.store.as_ref(), &state.audit, review_id, &auth.token_name)
        .await?;

    Ok(Json(MutationResponse {
        success: true,
        review_id: None,
        message: "Review deleted successfully".to_string(),
        status_code: StatusCode::OK.as_u16(),
    }))
}

/// List reviews for a product, paged, filtered and sorted.
///
/// # Endpoint
///
/// `GET /api/v1/products/{product_id}/reviews`
///
/// # Query Parameters
///
/// `page`, `page_size`, `rating` (comma-separated), `status`, `date_from`,
/// `date_to`, `sort_by` (`created_at`|`rating`), `sort_order` (`asc`|`desc`).
/// Invalid values are rejected with 422; a page past the end returns an
/// empty list with accurate metadata.
pub async fn list_product_reviews(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Json<PagedReviews>, AppError> {
    let request = PageRequest::from_params(
        params,
        state.config.default_page_size,
        state.config.max_page_size,
    )?;

    let result = query_service::list(state.store.as_ref(), &product_id, &request).await?;
    Ok(Json(result))
}

/// Aggregate rating statistics for a product.
///
/// # Endpoint
///
/// `GET /api/v1/products/{product_id}/summary`
///
/// Always freshly computed; a product with no reviews returns a zeroed
/// summary, not an error.
pub async fn product_summary(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Json<RatingSummary>, AppError> {
    let summary = summary_service::summarize(state.store.as_ref(), &product_id).await?;
    Ok(Json(summary))
}
