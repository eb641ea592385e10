//! Fixed-window rate limiting per (client IP, route class).
//!
//! The limiter is an explicitly owned component injected through the
//! application state, never a process-wide global, so tests can run
//! independent instances side by side.
//!
//! # Window semantics
//!
//! Fixed window counter: the first request under a key stamps the window
//! start, subsequent requests increment a counter, and the counter resets
//! `window` after that stamp. This is deliberately not a token bucket and
//! not a rolling log; the simple policy is what integrators already depend
//! on for abuse mitigation.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::Method,
    middleware::Next,
    response::Response,
};

use crate::{AppState, config::Config, error::AppError};

/// Evict expired windows once the map grows past this many keys.
const EVICTION_THRESHOLD: usize = 1024;

/// Named bucket of endpoints sharing one rate budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteClass {
    /// `POST /api/v1/tokens` (onboarding, strictest budget)
    TokenCreate,
    /// `POST /api/v1/reviews`
    ReviewSubmit,
    /// Everything else behind the limiter
    Default,
}

/// Per-class request budgets over one shared window length.
#[derive(Debug, Clone)]
pub struct RouteLimits {
    pub token_create: u32,
    pub review_submit: u32,
    pub default: u32,
    pub window: Duration,
}

impl RouteLimits {
    /// Budgets from configuration (5/30/10 per minute by default).
    pub fn from_config(config: &Config) -> Self {
        Self {
            token_create: config.rate_limit_token_create,
            review_submit: config.rate_limit_review_submit,
            default: config.rate_limit_default,
            window: Duration::from_secs(config.rate_limit_window_secs),
        }
    }

    fn budget(&self, class: RouteClass) -> u32 {
        match class {
            RouteClass::TokenCreate => self.token_create,
            RouteClass::ReviewSubmit => self.review_submit,
            RouteClass::Default => self.default,
        }
    }
}

/// One counting window. Ephemeral, in process memory only.
#[derive(Debug)]
struct RateWindow {
    count: u32,
    window_start: Instant,
}

/// Fixed-window rate limiter keyed by (client IP, route class).
///
/// A single mutex over the window map is enough here: the critical section
/// is a map lookup and an integer bump, and correctness only requires that
/// concurrent increments to the same key are never lost.
pub struct RateLimiter {
    limits: RouteLimits,
    windows: Mutex<HashMap<(String, RouteClass), RateWindow>>,
}

impl RateLimiter {
    pub fn new(limits: RouteLimits) -> Self {
        Self {
            limits,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Admit or reject one request.
    ///
    /// # Errors
    ///
    /// Returns `AppError::RateLimited` with the seconds remaining in the
    /// current window when the budget is exhausted. Nothing is queued; the
    /// caller retries out-of-band.
    pub fn check(&self, client_ip: &str, class: RouteClass) -> Result<(), AppError> {
        self.check_at(client_ip, class, Instant::now())
    }

    /// Clock-injected admission check (tests drive this directly).
    fn check_at(&self, client_ip: &str, class: RouteClass, now: Instant) -> Result<(), AppError> {
        let budget = self.limits.budget(class);
        let window = self.limits.window;

        let mut windows = self
            .windows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        // Lazy eviction keeps the map bounded without a background task
        if windows.len() >= EVICTION_THRESHOLD {
            windows.retain(|_, w| now.duration_since(w.window_start) < window);
        }

        let key = (client_ip.to_string(), class);
        let entry = windows.entry(key).or_insert(RateWindow {
            count: 0,
            window_start: now,
        });

        // Fixed interval boundary: reset once the window since the first
        // request has elapsed
        if now.duration_since(entry.window_start) >= window {
            entry.count = 0;
            entry.window_start = now;
        }

        if entry.count >= budget {
            let elapsed = now.duration_since(entry.window_start);
            let remaining = window.saturating_sub(elapsed);
            return Err(AppError::RateLimited {
                retry_after_secs: remaining.as_secs().max(1),
            });
        }

        entry.count += 1;
        Ok(())
    }
}

/// Map a request to its route class.
fn classify(method: &Method, path: &str) -> RouteClass {
    if method == Method::POST && path == "/api/v1/tokens" {
        RouteClass::TokenCreate
    } else if method == Method::POST && path == "/api/v1/reviews" {
        RouteClass::ReviewSubmit
    } else {
        RouteClass::Default
    }
}

/// Best-effort client address extraction.
///
/// Prefers the first `X-Forwarded-For` entry (the service typically sits
/// behind a proxy), falls back to the socket peer address.
fn client_ip(request: &Request) -> String {
    if let Some(forwarded) = request
        .headers()
        .get("X-Forwarded-For")
        .and_then(|h| h.to_str().ok())
    {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Rate limiting middleware function.
///
/// Runs after the token gate on authenticated routes and standalone on the
/// onboarding route. Health routes are registered outside this layer.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let class = classify(request.method(), request.uri().path());
    let ip = client_ip(&request);

    state.limiter.check(&ip, class)?;

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(budget: u32, window_secs: u64) -> RateLimiter {
        RateLimiter::new(RouteLimits {
            token_create: budget,
            review_submit: budget,
            default: budget,
            window: Duration::from_secs(window_secs),
        })
    }

    #[test]
    fn requests_over_budget_are_rejected_within_window() {
        let limiter = limiter(30, 60);
        let start = Instant::now();

        for _ in 0..30 {
            limiter
                .check_at("10.0.0.1", RouteClass::ReviewSubmit, start)
                .unwrap();
        }

        // the 31st request inside the same window is throttled
        let err = limiter
            .check_at("10.0.0.1", RouteClass::ReviewSubmit, start)
            .unwrap_err();
        assert!(matches!(err, AppError::RateLimited { .. }));
    }

    #[test]
    fn new_window_resets_the_count() {
        let limiter = limiter(5, 60);
        let start = Instant::now();

        for _ in 0..5 {
            limiter
                .check_at("10.0.0.1", RouteClass::TokenCreate, start)
                .unwrap();
        }
        limiter
            .check_at("10.0.0.1", RouteClass::TokenCreate, start)
            .unwrap_err();

        // one window later the same client is admitted again
        let later = start + Duration::from_secs(60);
        limiter
            .check_at("10.0.0.1", RouteClass::TokenCreate, later)
            .unwrap();
    }

    #[test]
    fn keys_are_isolated_by_ip_and_class() {
        let limiter = limiter(1, 60);
        let now = Instant::now();

        limiter
            .check_at("10.0.0.1", RouteClass::Default, now)
            .unwrap();
        // other clients and other classes have their own windows
        limiter
            .check_at("10.0.0.2", RouteClass::Default, now)
            .unwrap();
        limiter
            .check_at("10.0.0.1", RouteClass::ReviewSubmit, now)
            .unwrap();
        limiter
            .check_at("10.0.0.1", RouteClass::Default, now)
            .unwrap_err();
    }

    #[test]
    fn retry_after_reports_remaining_window() {
        let limiter = limiter(1, 60);
        let start = Instant::now();

        limiter
            .check_at("10.0.0.1", RouteClass::Default, start)
            .unwrap();
        let err = limiter
            .check_at(
                "10.0.0.1",
                RouteClass::Default,
                start + Duration::from_secs(20),
            )
            .unwrap_err();
        match err {
            AppError::RateLimited { retry_after_secs } => assert_eq!(retry_after_secs, 40),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn expired_keys_are_evicted_once_the_map_grows() {
        let limiter = limiter(10, 60);
        let start = Instant::now();

        for i in 0..EVICTION_THRESHOLD {
            limiter
                .check_at(&format!("10.0.{}.{}", i / 256, i % 256), RouteClass::Default, start)
                .unwrap();
        }
        assert_eq!(limiter.windows.lock().unwrap().len(), EVICTION_THRESHOLD);

        // next check one window later sweeps out everything stale
        let later = start + Duration::from_secs(61);
        limiter
            .check_at("192.168.0.1", RouteClass::Default, later)
            .unwrap();
        assert_eq!(limiter.windows.lock().unwrap().len(), 1);
    }

    #[test]
    fn classify_maps_routes_to_classes() {
        assert_eq!(
            classify(&Method::POST, "/api/v1/tokens"),
            RouteClass::TokenCreate
        );
        assert_eq!(
            classify(&Method::POST, "/api/v1/reviews"),
            RouteClass::ReviewSubmit
        );
        assert_eq!(
            classify(&Method::GET, "/api/v1/products/p1/reviews"),
            RouteClass::Default
        );
        assert_eq!(
            classify(&Method::DELETE, "/api/v1/reviews/abc"),
            RouteClass::Default
        );
    }
}
