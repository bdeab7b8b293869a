//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /`              - Redirect to `REDIRECT_URL` (public)
//! - `GET  /{code}`        - Short URL redirect (public)
//! - `GET  /api/health`    - Health check (public)
//! - `/api/urls*`, `/api/keys/validate` - API key required
//! - `/api/admin/*`        - Admin token required
//! - `GET  /openapi.json`  - OpenAPI document (development only)
//! - `GET  /docs`          - Swagger UI (development only)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Any origin in development, own origins in production
//! - **Rate limiting** - Per-IP token bucket ([`app_router`] only)
//! - **Authentication** - API key or admin token, per route group
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::docs::ApiDoc;
use crate::api::handlers::{health_handler, redirect_handler, root_redirect_handler};
use crate::api::middleware::{auth, rate_limit, tracing};
use crate::config::Config;
use crate::state::AppState;
use axum::http::{HeaderName, HeaderValue, Method, header};
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Builds every route with authentication, CORS and tracing, without rate
/// limiting.
///
/// Used directly by tests, which have no peer address for the per-IP limiter.
pub fn router(state: AppState) -> Router {
    build(state, false)
}

/// Constructs the production application router.
///
/// Same as [`router`] plus per-IP rate limiting and trailing-slash
/// normalization. Must be served with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(build(state, true))
}

fn build(state: AppState, rate_limited: bool) -> Router {
    let mut api_key_router = api::routes::api_key_routes().route_layer(
        middleware::from_fn_with_state(state.clone(), auth::api_key_layer),
    );
    let mut admin_router = api::routes::admin_routes().route_layer(
        middleware::from_fn_with_state(state.clone(), auth::admin_layer),
    );
    let mut health_router = Router::new().route("/health", get(health_handler));
    let mut public_router = Router::new()
        .route("/", get(root_redirect_handler))
        .route("/{code}", get(redirect_handler));

    if rate_limited {
        api_key_router = api_key_router.layer(rate_limit::layer());
        admin_router = admin_router.layer(rate_limit::secure_layer());
        health_router = health_router.layer(rate_limit::layer());
        public_router = public_router.layer(rate_limit::layer());
    }

    let profile = state.config.profile();

    let mut router = Router::new()
        .nest(
            "/api",
            api_key_router.merge(admin_router).merge(health_router),
        )
        .merge(public_router);

    if profile.expose_docs {
        router = router.merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()));
    }

    router
        .with_state(state.clone())
        .layer(cors_layer(&state.config))
        .layer(tracing::layer())
}

/// CORS policy for the environment.
///
/// Development accepts any origin without credentials. Production only
/// accepts `BASE_URL` and localhost origins, with credentials.
pub fn cors_layer(config: &Config) -> CorsLayer {
    if config.profile().permissive_cors {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let base_origin = url::Url::parse(&config.base_url)
        .map(|u| u.origin().ascii_serialization())
        .unwrap_or_else(|_| config.base_url.clone());

    let origins: Vec<HeaderValue> = [
        base_origin.as_str(),
        "http://localhost",
        "https://localhost",
        "http://localhost:3000",
    ]
    .into_iter()
    .filter_map(|origin| HeaderValue::from_str(origin).ok())
    .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(auth::API_KEY_HEADER),
            HeaderName::from_static(auth::ADMIN_TOKEN_HEADER),
        ])
}
