//! HTTP middleware components.
//!
//! Middleware are functions that run before route handlers.
//! They can:
//! - Authenticate requests
//! - Throttle requests per client
//! - Modify request/response
//! - Short-circuit requests (reject unauthorized or over-budget)

/// Bearer token authentication middleware (the token gate)
pub mod auth;
/// Fixed-window rate limiting middleware
pub mod rate_limit;
