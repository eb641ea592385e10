//! Token onboarding handler.

use axum::{Json, extract::State, http::StatusCode};

use crate::{
    AppState,
    error::AppError,
    models::token::{ApiToken, CreateTokenRequest, TokenResponse},
    store::StoreError,
};

/// Create a new API token.
///
/// # Endpoint
///
/// `POST /api/v1/tokens`
///
/// # Authentication
///
/// None: this is the onboarding bootstrap, guarded instead by the strictest
/// rate budget (5 per window by default).
///
/// # Request Body
///
/// ```json
/// { "name": "my-storefront" }
/// ```
///
/// # Response
///
/// - **Success (201 Created)**: `{token, name, created_at}` — the only time
///   the secret is ever returned
/// - **Error (422)**: blank name
/// - **Error (429)**: onboarding budget exhausted
pub async fn create_token(
    State(state): State<AppState>,
    Json(request): Json<CreateTokenRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), AppError> {
    if request.name.trim().is_empty() {
        return Err(AppError::Validation("name must not be empty".into()));
    }

    let minted = ApiToken::mint(request.name);
    let token = state.store.insert_token(minted).await.map_err(|err| {
        match err {
            // A colliding 48-char random secret means something is broken,
            // not that the caller conflicted with anyone
            StoreError::Duplicate => {
                AppError::StoreUnavailable(anyhow::anyhow!("token secret collision"))
            }
            other => other.into(),
        }
    })?;

    state.audit.token_created(token.id, &token.name);

    Ok((StatusCode::CREATED, Json(token.into())))
}
