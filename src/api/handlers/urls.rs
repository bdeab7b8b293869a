//! Handlers for owner-scoped short URL management.
//!
//! Every handler runs behind [`crate::api::middleware::auth::api_key_layer`]
//! and acts only on URLs owned by the calling key. A URL owned by another key
//! answers exactly like a missing one.

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
};
use serde_json::json;

use crate::api::dto::pagination::PaginationParams;
use crate::api::dto::url::{
    CreateShortUrlRequest, ShortUrlListResponse, ShortUrlResponse, UpdateShortUrlRequest,
};
use crate::api::extract::{AppPath, AppQuery, ValidatedJson};
use crate::domain::entities::ApiKey;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short URL.
///
/// Without `short_code` a random code is generated. Repeating the same
/// `original_url` always yields a new, distinct short URL.
#[utoipa::path(
    post,
    path = "/api/urls",
    tag = "URLs",
    security(("api_key" = [])),
    request_body = CreateShortUrlRequest,
    responses(
        (status = 201, description = "Short URL created", body = ShortUrlResponse),
        (status = 400, description = "Invalid URL, code or body"),
        (status = 401, description = "Missing, invalid or revoked API key"),
        (status = 409, description = "Custom code already taken"),
        (status = 503, description = "No free random code found")
    )
)]
pub async fn create_url_handler(
    State(state): State<AppState>,
    Extension(api_key): Extension<ApiKey>,
    ValidatedJson(payload): ValidatedJson<CreateShortUrlRequest>,
) -> Result<(StatusCode, Json<ShortUrlResponse>), AppError> {
    let url = state.url_service.create(api_key.id, payload.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(ShortUrlResponse::from_entity(url, &state.config)),
    ))
}

/// Lists the caller's short URLs, newest first.
#[utoipa::path(
    get,
    path = "/api/urls",
    tag = "URLs",
    security(("api_key" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "One page of the caller's URLs", body = ShortUrlListResponse),
        (status = 400, description = "Invalid pagination"),
        (status = 401, description = "Missing, invalid or revoked API key")
    )
)]
pub async fn list_urls_handler(
    State(state): State<AppState>,
    Extension(api_key): Extension<ApiKey>,
    AppQuery(params): AppQuery<PaginationParams>,
) -> Result<Json<ShortUrlListResponse>, AppError> {
    let (page, page_size) = params
        .validate_and_resolve()
        .map_err(|e| AppError::bad_request(e, json!({})))?;

    let (urls, total) = state
        .url_service
        .list_owned(api_key.id, page, page_size)
        .await?;

    let config = &state.config;

    Ok(Json(ShortUrlListResponse {
        urls: urls
            .into_iter()
            .map(|u| ShortUrlResponse::from_entity(u, config))
            .collect(),
        total,
        page,
        page_size,
    }))
}

/// Returns one of the caller's short URLs by id.
#[utoipa::path(
    get,
    path = "/api/urls/{id}",
    tag = "URLs",
    security(("api_key" = [])),
    params(("id" = i64, Path, description = "Short URL id")),
    responses(
        (status = 200, description = "Short URL", body = ShortUrlResponse),
        (status = 404, description = "Not found or not owned by the caller")
    )
)]
pub async fn get_url_handler(
    State(state): State<AppState>,
    Extension(api_key): Extension<ApiKey>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<ShortUrlResponse>, AppError> {
    let url = state.url_service.get_owned(id, api_key.id).await?;

    Ok(Json(ShortUrlResponse::from_entity(
        url,
        &state.config,
    )))
}

/// Returns one of the caller's short URLs by code.
#[utoipa::path(
    get,
    path = "/api/urls/code/{code}",
    tag = "URLs",
    security(("api_key" = [])),
    params(("code" = String, Path, description = "Short code")),
    responses(
        (status = 200, description = "Short URL", body = ShortUrlResponse),
        (status = 404, description = "Not found or not owned by the caller")
    )
)]
pub async fn get_url_by_code_handler(
    State(state): State<AppState>,
    Extension(api_key): Extension<ApiKey>,
    AppPath(code): AppPath<String>,
) -> Result<Json<ShortUrlResponse>, AppError> {
    let url = state
        .url_service
        .get_owned_by_code(&code, api_key.id)
        .await?;

    Ok(Json(ShortUrlResponse::from_entity(
        url,
        &state.config,
    )))
}

/// Updates the target and/or expiry of one of the caller's short URLs.
///
/// Served for both `PUT` and `PATCH`. Omitted fields are unchanged;
/// `"expires_at": null` removes the expiry.
#[utoipa::path(
    put,
    path = "/api/urls/{id}",
    tag = "URLs",
    security(("api_key" = [])),
    params(("id" = i64, Path, description = "Short URL id")),
    request_body = UpdateShortUrlRequest,
    responses(
        (status = 200, description = "Updated short URL", body = ShortUrlResponse),
        (status = 400, description = "Invalid URL or body"),
        (status = 404, description = "Not found or not owned by the caller")
    )
)]
pub async fn update_url_handler(
    State(state): State<AppState>,
    Extension(api_key): Extension<ApiKey>,
    AppPath(id): AppPath<i64>,
    ValidatedJson(payload): ValidatedJson<UpdateShortUrlRequest>,
) -> Result<Json<ShortUrlResponse>, AppError> {
    let url = state
        .url_service
        .update_owned(id, api_key.id, payload.into())
        .await?;

    Ok(Json(ShortUrlResponse::from_entity(
        url,
        &state.config,
    )))
}

/// Permanently deletes one of the caller's short URLs.
#[utoipa::path(
    delete,
    path = "/api/urls/{id}",
    tag = "URLs",
    security(("api_key" = [])),
    params(("id" = i64, Path, description = "Short URL id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not found or not owned by the caller")
    )
)]
pub async fn delete_url_handler(
    State(state): State<AppState>,
    Extension(api_key): Extension<ApiKey>,
    AppPath(id): AppPath<i64>,
) -> Result<StatusCode, AppError> {
    state.url_service.delete_owned(id, api_key.id).await?;

    Ok(StatusCode::NO_CONTENT)
}
