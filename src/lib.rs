//! Review service library: module tree, shared state and router assembly.
//!
//! The binary in `main.rs` wires a PostgreSQL-backed [`AppState`] into
//! [`app`]; integration tests build the same router over the in-memory
//! store.

pub mod audit;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod store;

use std::sync::Arc;

use axum::{
    Router, middleware as axum_middleware,
    routing::{delete, get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    audit::AuditLog,
    config::Config,
    middleware::rate_limit::{RateLimiter, RouteLimits},
    store::ReviewStore,
};

/// Shared application state handed to every handler and middleware.
///
/// The store sits behind the capability trait so any backend can serve, and
/// the rate limiter is an owned component instance rather than ambient
/// global state, which keeps both swappable in tests.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ReviewStore>,
    pub limiter: Arc<RateLimiter>,
    pub audit: AuditLog,
    pub config: Arc<Config>,
}

impl AppState {
    /// Assemble state around a store implementation.
    pub fn new(store: Arc<dyn ReviewStore>, config: Config) -> Self {
        let limiter = Arc::new(RateLimiter::new(RouteLimits::from_config(&config)));
        Self {
            store,
            limiter,
            audit: AuditLog::new(),
            config: Arc::new(config),
        }
    }
}

/// Build the HTTP router.
///
/// # Route groups
///
/// - Public: `/` and `/health` (no gate, no limiter)
/// - Onboarding: `POST /api/v1/tokens` (limiter only, strictest budget)
/// - Authenticated: everything else under `/api/v1` (gate, then limiter)
pub fn app(state: AppState) -> Router {
    // Authenticated routes: token gate runs first, then the rate limiter
    // (layers added later are outermost, so auth is added last)
    let authenticated_routes = Router::new()
        .route("/api/v1/reviews", post(handlers::reviews::submit_review))
        .route(
            "/api/v1/reviews/{review_id}",
            delete(handlers::reviews::delete_review),
        )
        .route(
            "/api/v1/products/{product_id}/reviews",
            get(handlers::reviews::list_product_reviews),
        )
        .route(
            "/api/v1/products/{product_id}/summary",
            get(handlers::reviews::product_summary),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::rate_limit::rate_limit_middleware,
        ))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::auth_middleware,
        ));

    // Onboarding bootstrap: no token yet, so only the limiter applies
    let onboarding_routes = Router::new()
        .route("/api/v1/tokens", post(handlers::tokens::create_token))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::rate_limit::rate_limit_middleware,
        ));

    Router::new()
        // Public liveness routes (no authentication, no throttling)
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::health_check))
        .merge(onboarding_routes)
        .merge(authenticated_routes)
        // Request tracing for observability
        .layer(TraceLayer::new_for_http())
        // Storefronts call this API straight from the browser
        .layer(CorsLayer::permissive())
        .with_state(state)
}
