//! Structured audit event emission.
//!
//! Every mutating or security-relevant action appends one structured event
//! under the `audit` tracing target, so operators can route the audit stream
//! to its own sink with an `EnvFilter` directive (e.g. `audit=info`).
//!
//! Emission is fire-and-forget: a tracing subscriber that drops events can
//! never fail the originating request, and no audit call participates in a
//! store transaction.

use uuid::Uuid;

/// Audit event emitter.
///
/// Carried in the application state so handlers and services share one
/// instance; stateless today, but keeping it a component leaves room for a
/// dedicated sink later without touching call sites.
#[derive(Debug, Clone, Default)]
pub struct AuditLog;

impl AuditLog {
    pub fn new() -> Self {
        Self
    }

    /// A new API token was minted.
    pub fn token_created(&self, token_id: Uuid, name: &str) {
        tracing::info!(
            target: "audit",
            event = "token_created",
            %token_id,
            token_name = name,
        );
    }

    /// A review was accepted by the write path.
    pub fn review_submitted(
        &self,
        review_id: Uuid,
        product_id: &str,
        user_id: Option<&str>,
        rating: i16,
        actor: &str,
    ) {
        tracing::info!(
            target: "audit",
            event = "review_submitted",
            %review_id,
            product_id,
            user_id,
            rating,
            actor,
        );
    }

    /// A review was permanently deleted.
    pub fn review_deleted(&self, review_id: Uuid, actor: &str) {
        tracing::info!(
            target: "audit",
            event = "review_deleted",
            %review_id,
            actor,
        );
    }
}
