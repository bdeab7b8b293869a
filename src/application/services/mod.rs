//! Business logic services for the application layer.

pub mod api_key_service;
pub mod auth_service;
pub mod url_service;

pub use api_key_service::ApiKeyService;
pub use auth_service::AuthService;
pub use url_service::{CreateShortUrl, UrlService};
