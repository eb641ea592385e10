//! Business logic services.
//!
//! Services contain core business logic separated from HTTP handlers.
//! They validate input, enforce lifecycle rules and drive the store
//! capability interface.

pub mod query_service;
pub mod review_service;
pub mod summary_service;
