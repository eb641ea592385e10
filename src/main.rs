//! Review Service - Main Application Entry Point
//!
//! This is a REST API server through which e-commerce stores submit, query
//! and aggregate product reviews. It provides token-authenticated, rate
//! limited endpoints for review submission, deletion, paged listing and
//! rating summaries.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Store**: PostgreSQL with sqlx, behind a capability trait
//! - **Authentication**: opaque bearer tokens
//! - **Format**: JSON requests/responses
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create database connection pool
//! 3. Run database migrations
//! 4. Build HTTP router with routes and middleware
//! 5. Start server on configured port

use std::net::SocketAddr;
use std::sync::Arc;

use review_service::{AppState, app, config, db, store::postgres::PostgresStore};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment
    // variable (defaults to "info" level); the audit stream shares the
    // subscriber under the "audit" target
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load configuration
    let config = config::Config::from_env()?;
    tracing::info!("Configuration loaded");

    // Create database pool
    let pool = db::create_pool(&config.database_url).await?;
    tracing::info!("Database pool created");

    // Run migrations
    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    // Wire the production store into the shared state and build the router
    let addr = format!("0.0.0.0:{}", config.server_port);
    let state = AppState::new(Arc::new(PostgresStore::new(pool)), config);
    let router = app(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Serve with peer addresses attached so the rate limiter can key on
    // client IP when no proxy header is present
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
