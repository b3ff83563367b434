//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization with camelCase field names and
//! validator for request-level checks.

pub mod health;
pub mod link;
