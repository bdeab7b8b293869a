//! API route configuration.
//!
//! Routes are grouped by the credential they require; the caller attaches the
//! matching middleware from [`crate::api::middleware::auth`].

use crate::api::handlers::{
    activate_key_handler, create_key_handler, create_url_handler, delete_url_handler,
    get_key_handler, get_url_by_code_handler, get_url_handler, list_keys_handler,
    list_urls_handler, revoke_key_handler, update_key_handler, update_url_handler,
    validate_key_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, patch},
};

/// Routes requiring an API key.
///
/// # Endpoints
///
/// - `POST   /urls`              - Create a short URL
/// - `GET    /urls`              - List the caller's URLs (paginated)
/// - `GET    /urls/{id}`         - Get one URL by id
/// - `PUT    /urls/{id}`         - Update target and/or expiry
/// - `PATCH  /urls/{id}`         - Same as `PUT`
/// - `DELETE /urls/{id}`         - Delete a URL
/// - `GET    /urls/code/{code}`  - Get one URL by code
/// - `GET    /keys/validate`     - Check the presented key
pub fn api_key_routes() -> Router<AppState> {
    Router::new()
        .route("/urls", get(list_urls_handler).post(create_url_handler))
        .route(
            "/urls/{id}",
            get(get_url_handler)
                .put(update_url_handler)
                .patch(update_url_handler)
                .delete(delete_url_handler),
        )
        .route("/urls/code/{code}", get(get_url_by_code_handler))
        .route("/keys/validate", get(validate_key_handler))
}

/// Routes requiring the admin token.
///
/// # Endpoints
///
/// - `POST  /admin/keys`                - Create an API key
/// - `GET   /admin/keys`                - List API keys
/// - `GET   /admin/keys/{id}`           - Get one API key
/// - `PATCH /admin/keys/{id}`           - Set `is_active`
/// - `PATCH /admin/keys/{id}/revoke`    - Revoke
/// - `PATCH /admin/keys/{id}/activate`  - Reactivate
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/admin/keys",
            get(list_keys_handler).post(create_key_handler),
        )
        .route(
            "/admin/keys/{id}",
            get(get_key_handler).patch(update_key_handler),
        )
        .route("/admin/keys/{id}/revoke", patch(revoke_key_handler))
        .route("/admin/keys/{id}/activate", patch(activate_key_handler))
}
