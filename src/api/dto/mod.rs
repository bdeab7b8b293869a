//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization, `validator` for input
//! validation and `utoipa` for the OpenAPI schema.

pub mod api_key;
pub mod health;
pub mod pagination;
pub mod url;
