//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params, etc.)
//! 2. Delegates to the relevant service
//! 3. Returns HTTP response (JSON, status code)

/// Liveness endpoints
pub mod health;
/// Review submission, deletion, listing and summary endpoints
pub mod reviews;
/// Token onboarding endpoint
pub mod tokens;
