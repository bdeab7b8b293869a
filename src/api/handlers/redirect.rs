//! Handlers for public redirects.

use axum::{
    extract::State,
    response::{IntoResponse, Redirect},
};

use crate::api::extract::AppPath;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Responses
///
/// - **307 Temporary Redirect** to `original_url`
/// - **404 Not Found** for an unknown code
/// - **410 Gone** once the URL's expiry has passed; repeated on every call
///
/// The lookup hits the database on every request; there is no cache.
#[utoipa::path(
    get,
    path = "/{code}",
    tag = "Redirect",
    params(("code" = String, Path, description = "Short code")),
    responses(
        (status = 307, description = "Redirect to the original URL"),
        (status = 404, description = "Unknown short code"),
        (status = 410, description = "Short URL has expired")
    )
)]
pub async fn redirect_handler(
    State(state): State<AppState>,
    AppPath(code): AppPath<String>,
) -> Result<impl IntoResponse, AppError> {
    let url = state.url_service.resolve(&code).await?;

    tracing::debug!(code = %code, "Redirecting");

    Ok(Redirect::temporary(&url.original_url))
}

/// Redirects the bare service root to the configured default target.
#[utoipa::path(
    get,
    path = "/",
    tag = "Redirect",
    responses((status = 307, description = "Redirect to REDIRECT_URL"))
)]
pub async fn root_redirect_handler(State(state): State<AppState>) -> Redirect {
    Redirect::temporary(&state.config.redirect_url)
}
