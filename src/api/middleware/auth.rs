//! API key and admin token authentication middleware.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use serde_json::json;

use crate::{error::AppError, state::AppState};

pub const API_KEY_HEADER: &str = "x-api-key";
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Authenticates requests by API key.
///
/// # Header Format
///
/// ```text
/// X-API-Key: <key>
/// ```
///
/// or, as a fallback,
///
/// ```text
/// Authorization: Bearer <key>
/// ```
///
/// On success the resolved [`ApiKey`](crate::domain::entities::ApiKey) is
/// inserted into request extensions for handlers to extract.
///
/// # Errors
///
/// Returns `401 Unauthorized` if the key is missing, unknown or revoked. The
/// response is identical in all three cases.
pub async fn api_key_layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let key = match header_value(&parts.headers, API_KEY_HEADER) {
        Some(key) => key.to_string(),
        None => {
            let AuthBearer(token) = AuthBearer::from_request_parts(&mut parts, &())
                .await
                .map_err(|_| {
                    AppError::unauthorized(
                        "Unauthorized",
                        json!({ "reason": "API key is missing" }),
                    )
                })?;
            token
        }
    };

    let api_key = st.auth_service.authenticate(&key).await?;

    tracing::debug!(api_key_id = api_key.id, "API key authenticated");

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(api_key);

    Ok(next.run(req).await)
}

/// Guards admin endpoints with the shared admin token.
///
/// # Header Format
///
/// ```text
/// X-Admin-Token: <token>
/// ```
///
/// # Errors
///
/// - `401 Unauthorized` if the header is missing
/// - `403 Forbidden` if the token does not match
pub async fn admin_layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = header_value(req.headers(), ADMIN_TOKEN_HEADER).ok_or_else(|| {
        AppError::unauthorized(
            "Unauthorized",
            json!({ "reason": "Admin token is missing" }),
        )
    })?;

    if let Err(e) = st.auth_service.verify_admin_token(token) {
        tracing::warn!("Rejected admin request with invalid token");
        return Err(e);
    }

    Ok(next.run(req).await)
}
