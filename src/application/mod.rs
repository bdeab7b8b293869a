//! Application layer services implementing business logic.
//!
//! Services coordinate repository calls, validation and business rules, and
//! give HTTP handlers and the admin CLI a single API.
//!
//! # Available Services
//!
//! - [`services::url_service::UrlService`] - Short URL creation, management and resolution
//! - [`services::api_key_service::ApiKeyService`] - API key issuance and revocation
//! - [`services::auth_service::AuthService`] - API key and admin token verification

pub mod services;
