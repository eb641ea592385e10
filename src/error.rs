//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses. Every failure surfaces to the client in one uniform
//! JSON envelope so integrators only need a single error parser.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::store::StoreError;

/// Application-wide error type.
///
/// Each variant maps to a specific HTTP status code. No error is retried
/// internally; failures are surfaced to the caller immediately.
///
/// # Error Categories
///
/// - **Authentication errors**: Missing or unknown bearer tokens
/// - **Validation errors**: Malformed or out-of-range request fields
/// - **Resource errors**: Duplicate submissions, missing reviews
/// - **Throttling errors**: Requests over the per-route rate budget
/// - **Store errors**: The backing store is unreachable or failed
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The `Authorization` header is absent or lacks a `Bearer ` prefix.
    ///
    /// Returns HTTP 401 Unauthorized.
    #[error("Missing or invalid API token")]
    MissingToken,

    /// The presented token does not exist in the token set.
    ///
    /// Returns HTTP 401 Unauthorized.
    #[error("Invalid API token")]
    InvalidToken,

    /// Request body or query parameters are invalid.
    ///
    /// Returns HTTP 422 Unprocessable Entity. The String describes the
    /// offending field. Out-of-range values (including `page_size` above the
    /// configured maximum) are rejected here, never silently clamped.
    #[error("{0}")]
    Validation(String),

    /// A review already exists for this (product, user) pair.
    ///
    /// Returns HTTP 409 Conflict. The write path never overwrites the
    /// existing review.
    #[error("You have already submitted a review for this product.")]
    Duplicate,

    /// The requested review does not exist.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("Review not found")]
    NotFound,

    /// The client exceeded its rate budget for this route class.
    ///
    /// Returns HTTP 429 Too Many Requests with a `Retry-After` header.
    /// No queuing happens server-side; the caller retries out-of-band.
    #[error("Rate limit exceeded, retry later")]
    RateLimited {
        /// Seconds until the current fixed window expires.
        retry_after_secs: u64,
    },

    /// The backing store failed or is unreachable.
    ///
    /// Returns HTTP 500 Internal Server Error (details are logged
    /// server-side, never leaked to the client).
    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[source] anyhow::Error),
}

/// Lift store-layer failures into the application taxonomy.
///
/// A duplicate-key rejection from the store is the authoritative duplicate
/// guard (the in-service existence check is only an optimization), so it maps
/// to the same 409 as the pre-check.
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate => AppError::Duplicate,
            StoreError::Unavailable(source) => AppError::StoreUnavailable(source),
        }
    }
}

/// Convert AppError into an HTTP response.
///
/// This implementation lets handlers return `Result<T, AppError>` and have
/// errors converted automatically.
///
/// # Response Format
///
/// All errors use the same envelope:
/// ```json
/// {
///   "success": false,
///   "error": "Human-readable error message",
///   "status_code": 409
/// }
/// ```
///
/// # Status Code Mapping
///
/// - `MissingToken` / `InvalidToken` → 401 Unauthorized
/// - `Validation` → 422 Unprocessable Entity
/// - `Duplicate` → 409 Conflict
/// - `NotFound` → 404 Not Found
/// - `RateLimited` → 429 Too Many Requests (+ `Retry-After`)
/// - `StoreUnavailable` → 500 Internal Server Error
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::MissingToken | AppError::InvalidToken => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            }
            AppError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            AppError::Duplicate => (StatusCode::CONFLICT, self.to_string()),
            AppError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::RateLimited { .. } => (StatusCode::TOO_MANY_REQUESTS, self.to_string()),
            AppError::StoreUnavailable(source) => {
                tracing::error!(error = %source, "store operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "success": false,
            "error": message,
            "status_code": status.as_u16(),
        }));

        let mut response = (status, body).into_response();

        // Tell throttled clients when the window resets
        if let AppError::RateLimited { retry_after_secs } = self {
            if let Ok(value) = retry_after_secs.to_string().parse() {
                response.headers_mut().insert("Retry-After", value);
            }
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_taxonomy() {
        assert_eq!(
            AppError::MissingToken.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::InvalidToken.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Validation("rating must be between 1 and 5".into())
                .into_response()
                .status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::Duplicate.into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::NotFound.into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::StoreUnavailable(anyhow::anyhow!("connection refused"))
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn rate_limited_carries_retry_after() {
        let response = AppError::RateLimited {
            retry_after_secs: 42,
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers().get("Retry-After").unwrap(), "42");
    }
}
