//! API token model for authentication.
//!
//! Tokens are opaque random strings handed out by the onboarding endpoint.
//! The service holds only a lookup table; revocation and scoping are out of
//! scope, so a token is immutable once created.

use chrono::{DateTime, Utc};
use rand::{Rng, distr::Alphanumeric};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Length of generated token secrets in characters.
const TOKEN_LEN: usize = 48;

/// Represents an API token record from the store.
///
/// # Store Table
///
/// Maps to the `api_tokens` table with columns:
/// - `id`: Unique identifier (UUID)
/// - `token`: The opaque secret string (unique)
/// - `name`: Human-readable label supplied at onboarding
/// - `created_at`: When the token was created
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ApiToken {
    /// Unique identifier for this token record
    pub id: Uuid,

    /// The opaque secret presented by clients as `Authorization: Bearer <token>`
    ///
    /// All tokens carry equal privilege; the record exists for lookup and
    /// audit attribution only.
    pub token: String,

    /// Human-readable name of the integration using this token
    pub name: String,

    /// Timestamp when this token was created
    pub created_at: DateTime<Utc>,
}

impl ApiToken {
    /// Mint a new token with a freshly generated random secret.
    ///
    /// The secret is a 48-character alphanumeric string, which is plenty of
    /// entropy for an opaque bearer credential. This is deliberately a plain
    /// random-string generator, not a signing scheme.
    pub fn mint(name: String) -> Self {
        let secret: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LEN)
            .map(char::from)
            .collect();

        Self {
            id: Uuid::new_v4(),
            token: secret,
            name,
            created_at: Utc::now(),
        }
    }
}

/// Request body for `POST /api/v1/tokens`.
#[derive(Debug, Deserialize)]
pub struct CreateTokenRequest {
    /// Label for the new token (e.g., the store's name)
    pub name: String,
}

/// Response body for the onboarding endpoint.
///
/// The internal record id stays server-side; clients only ever see the
/// secret itself.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    /// The opaque secret to present on subsequent requests
    pub token: String,

    /// Label supplied at creation
    pub name: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Convert a stored ApiToken into the API response (drops the internal id).
impl From<ApiToken> for TokenResponse {
    fn from(token: ApiToken) -> Self {
        Self {
            token: token.token,
            name: token.name,
            created_at: token.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mint_generates_distinct_secrets() {
        let a = ApiToken::mint("store-a".into());
        let b = ApiToken::mint("store-b".into());
        assert_eq!(a.token.len(), TOKEN_LEN);
        assert!(a.token.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a.token, b.token);
        assert_ne!(a.id, b.id);
    }
}
