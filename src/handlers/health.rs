//! Liveness endpoints for service monitoring.
//!
//! Both routes bypass the token gate and the rate limiter.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};

use crate::{AppState, error::AppError};

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall service status
    pub status: String,

    /// Backing store connectivity
    pub store: String,

    /// Current server timestamp
    pub timestamp: DateTime<Utc>,
}

/// Service banner.
///
/// # Endpoint
///
/// `GET /`
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Review service API is running",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "healthy",
    }))
}

/// Detailed health check handler.
///
/// # Endpoint
///
/// `GET /health`
///
/// Probes the backing store; an unreachable store surfaces as the standard
/// 500 envelope.
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    state.store.ping().await?;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        store: "connected".to_string(),
        timestamp: Utc::now(),
    }))
}
