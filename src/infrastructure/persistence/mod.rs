//! PostgreSQL repository implementations.
//!
//! Concrete implementations of the domain repository traits on SQLx. Queries
//! are checked at runtime against the schema in `migrations/`.
//!
//! # Repositories
//!
//! - [`PgApiKeyRepository`] - API key storage and hash lookup
//! - [`PgShortUrlRepository`] - Short URL storage, owner-scoped CRUD

pub mod pg_api_key_repository;
pub mod pg_short_url_repository;

pub use pg_api_key_repository::PgApiKeyRepository;
pub use pg_short_url_repository::PgShortUrlRepository;
