//! Bearer token authentication middleware (the token gate).
//!
//! This middleware intercepts every protected request to:
//! 1. Extract the bearer token from the Authorization header
//! 2. Verify it exists in the token set
//! 3. Inject authentication context into the request
//! 4. Reject unauthorized requests with HTTP 401

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{AppState, error::AppError};

/// Authentication context attached to authenticated requests.
///
/// This struct is inserted into the request's extension map and can be
/// extracted by route handlers. All tokens carry equal privilege, so the
/// context exists only for audit attribution, never for authorization
/// scoping.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// ID of the authenticated token record
    pub token_id: Uuid,

    /// Name the integration registered with at onboarding
    pub token_name: String,
}

/// Token gate middleware function.
///
/// # Flow
///
/// 1. Extract `Authorization: Bearer <token>` header from request
/// 2. Missing header, missing prefix or an empty secret → `MissingToken`
/// 3. Look the secret up in the token set (pure lookup, no side effects)
/// 4. No match → `InvalidToken`; match → inject [`AuthContext`], call next
///
/// Health routes and the onboarding endpoint are registered outside this
/// layer and bypass the gate entirely.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Step 1: Extract Authorization header
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::MissingToken)?;

    // Step 2: Extract bearer value
    // Expected format: "Bearer <token>"
    let secret = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AppError::MissingToken)?;
    if secret.is_empty() {
        return Err(AppError::MissingToken);
    }

    // Step 3: Look up the opaque secret in the token set
    let record = state
        .store
        .find_token(secret)
        .await?
        .ok_or(AppError::InvalidToken)?;

    // Step 4: Inject context into request extensions
    // Route handlers can now extract this using Extension<AuthContext>
    request.extensions_mut().insert(AuthContext {
        token_id: record.id,
        token_name: record.name,
    });

    Ok(next.run(request).await)
}
