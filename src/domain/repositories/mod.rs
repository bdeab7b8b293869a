//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access following the Repository pattern and are
//! implemented by concrete repositories in the infrastructure layer.
//!
//! # Architecture
//!
//! - Traits define the contract for data operations
//! - Implementations live in `crate::infrastructure::persistence`
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! # Available Repositories
//!
//! - [`ApiKeyRepository`] - API key storage and lookup by hash
//! - [`ShortUrlRepository`] - Owner-scoped short URL CRUD and public lookup

pub mod api_key_repository;
pub mod short_url_repository;

pub use api_key_repository::ApiKeyRepository;
pub use short_url_repository::ShortUrlRepository;

#[cfg(test)]
pub use api_key_repository::MockApiKeyRepository;
#[cfg(test)]
pub use short_url_repository::MockShortUrlRepository;
