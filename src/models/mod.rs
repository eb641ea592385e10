//! Data models representing stored entities and API payloads.
//!
//! This module contains all data structures that map to store records
//! or cross the HTTP boundary.

/// Pagination, filtering and sorting request types
pub mod page;
/// Review entity and submission/response types
pub mod review;
/// Derived rating aggregate
pub mod summary;
/// API token entity and onboarding types
pub mod token;
