//! OpenAPI document, served at `/openapi.json` with Swagger UI at `/docs` in
//! development mode.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::dto::{api_key, health, url};
use crate::api::handlers;

/// Registers the two credential headers as security schemes.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-API-Key"))),
            );
            components.add_security_scheme(
                "admin_token",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-Admin-Token"))),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Keyed Shortener",
        description = "API-key authenticated URL shortener"
    ),
    paths(
        handlers::urls::create_url_handler,
        handlers::urls::list_urls_handler,
        handlers::urls::get_url_handler,
        handlers::urls::get_url_by_code_handler,
        handlers::urls::update_url_handler,
        handlers::urls::delete_url_handler,
        handlers::api_keys::validate_key_handler,
        handlers::api_keys::create_key_handler,
        handlers::api_keys::list_keys_handler,
        handlers::api_keys::get_key_handler,
        handlers::api_keys::update_key_handler,
        handlers::api_keys::revoke_key_handler,
        handlers::api_keys::activate_key_handler,
        handlers::redirect::redirect_handler,
        handlers::redirect::root_redirect_handler,
        handlers::health::health_handler,
    ),
    components(schemas(
        url::CreateShortUrlRequest,
        url::UpdateShortUrlRequest,
        url::ShortUrlResponse,
        url::ShortUrlListResponse,
        api_key::CreateApiKeyRequest,
        api_key::UpdateApiKeyRequest,
        api_key::ApiKeyInfo,
        api_key::CreatedApiKeyResponse,
        api_key::ApiKeyListResponse,
        api_key::ValidateKeyResponse,
        health::HealthResponse,
        health::HealthChecks,
        health::CheckStatus,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "URLs", description = "Owner-scoped short URL management"),
        (name = "API Keys", description = "Key self-check"),
        (name = "Admin", description = "API key administration"),
        (name = "Redirect", description = "Public redirects"),
        (name = "Health", description = "Service health")
    )
)]
pub struct ApiDoc;
