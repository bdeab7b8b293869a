//! Shared application state injected into every handler.

use sqlx::PgPool;
use std::sync::Arc;

use crate::application::services::{ApiKeyService, AuthService, UrlService};
use crate::config::Config;
use crate::domain::repositories::{ApiKeyRepository, ShortUrlRepository};
use crate::infrastructure::persistence::{PgApiKeyRepository, PgShortUrlRepository};

/// Services and configuration shared across requests. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub url_service: Arc<UrlService>,
    pub api_key_service: Arc<ApiKeyService>,
    pub auth_service: Arc<AuthService>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Builds the state on top of PostgreSQL repositories.
    pub fn new(pool: Arc<PgPool>, config: Arc<Config>) -> Self {
        Self::from_repositories(
            Arc::new(PgApiKeyRepository::new(pool.clone())),
            Arc::new(PgShortUrlRepository::new(pool)),
            config,
        )
    }

    /// Builds the state on top of arbitrary repository implementations.
    pub fn from_repositories(
        api_key_repository: Arc<dyn ApiKeyRepository>,
        short_url_repository: Arc<dyn ShortUrlRepository>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            url_service: Arc::new(UrlService::new(
                short_url_repository,
                config.short_code_length,
            )),
            api_key_service: Arc::new(ApiKeyService::new(
                api_key_repository.clone(),
                config.secret_key.clone(),
            )),
            auth_service: Arc::new(AuthService::new(
                api_key_repository,
                config.secret_key.clone(),
                &config.admin_token,
            )),
            config,
        }
    }
}
