//! Handlers for API key administration and self-validation.

use axum::{Extension, Json, extract::State, http::StatusCode};

use crate::api::dto::api_key::{
    ApiKeyInfo, ApiKeyListResponse, CreateApiKeyRequest, CreatedApiKeyResponse,
    UpdateApiKeyRequest, ValidateKeyResponse,
};
use crate::api::extract::{AppPath, ValidatedJson};
use crate::domain::entities::ApiKey;
use crate::error::AppError;
use crate::state::AppState;

/// Creates an API key. The plaintext key is in this response only.
#[utoipa::path(
    post,
    path = "/api/admin/keys",
    tag = "Admin",
    security(("admin_token" = [])),
    request_body = CreateApiKeyRequest,
    responses(
        (status = 201, description = "API key created", body = CreatedApiKeyResponse),
        (status = 400, description = "Invalid name"),
        (status = 401, description = "Admin token missing"),
        (status = 403, description = "Admin token invalid")
    )
)]
pub async fn create_key_handler(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateApiKeyRequest>,
) -> Result<(StatusCode, Json<CreatedApiKeyResponse>), AppError> {
    let issued = state.api_key_service.issue(&payload.name).await?;

    Ok((StatusCode::CREATED, Json(issued.into())))
}

/// Lists all API keys.
#[utoipa::path(
    get,
    path = "/api/admin/keys",
    tag = "Admin",
    security(("admin_token" = [])),
    responses(
        (status = 200, description = "All API keys", body = ApiKeyListResponse),
        (status = 401, description = "Admin token missing"),
        (status = 403, description = "Admin token invalid")
    )
)]
pub async fn list_keys_handler(
    State(state): State<AppState>,
) -> Result<Json<ApiKeyListResponse>, AppError> {
    let keys = state.api_key_service.list().await?;
    let total = keys.len() as i64;

    Ok(Json(ApiKeyListResponse {
        keys: keys.into_iter().map(ApiKeyInfo::from).collect(),
        total,
    }))
}

#[utoipa::path(
    get,
    path = "/api/admin/keys/{id}",
    tag = "Admin",
    security(("admin_token" = [])),
    params(("id" = i64, Path, description = "API key id")),
    responses(
        (status = 200, description = "API key", body = ApiKeyInfo),
        (status = 404, description = "API key not found")
    )
)]
pub async fn get_key_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<ApiKeyInfo>, AppError> {
    let key = state.api_key_service.get(id).await?;

    Ok(Json(key.into()))
}

/// Sets the active flag of a key. Revocation applies to the key's next request.
#[utoipa::path(
    patch,
    path = "/api/admin/keys/{id}",
    tag = "Admin",
    security(("admin_token" = [])),
    params(("id" = i64, Path, description = "API key id")),
    request_body = UpdateApiKeyRequest,
    responses(
        (status = 200, description = "Updated API key", body = ApiKeyInfo),
        (status = 404, description = "API key not found")
    )
)]
pub async fn update_key_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    ValidatedJson(payload): ValidatedJson<UpdateApiKeyRequest>,
) -> Result<Json<ApiKeyInfo>, AppError> {
    let key = state
        .api_key_service
        .set_active(id, payload.is_active)
        .await?;

    Ok(Json(key.into()))
}

#[utoipa::path(
    patch,
    path = "/api/admin/keys/{id}/revoke",
    tag = "Admin",
    security(("admin_token" = [])),
    params(("id" = i64, Path, description = "API key id")),
    responses(
        (status = 200, description = "Revoked API key", body = ApiKeyInfo),
        (status = 404, description = "API key not found")
    )
)]
pub async fn revoke_key_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<ApiKeyInfo>, AppError> {
    let key = state.api_key_service.revoke(id).await?;

    Ok(Json(key.into()))
}

#[utoipa::path(
    patch,
    path = "/api/admin/keys/{id}/activate",
    tag = "Admin",
    security(("admin_token" = [])),
    params(("id" = i64, Path, description = "API key id")),
    responses(
        (status = 200, description = "Reactivated API key", body = ApiKeyInfo),
        (status = 404, description = "API key not found")
    )
)]
pub async fn activate_key_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<ApiKeyInfo>, AppError> {
    let key = state.api_key_service.activate(id).await?;

    Ok(Json(key.into()))
}

/// Confirms the presented API key is valid and active.
#[utoipa::path(
    get,
    path = "/api/keys/validate",
    tag = "API Keys",
    security(("api_key" = [])),
    responses(
        (status = 200, description = "Key is valid", body = ValidateKeyResponse),
        (status = 401, description = "Missing, invalid or revoked API key")
    )
)]
pub async fn validate_key_handler(
    Extension(api_key): Extension<ApiKey>,
) -> Json<ValidateKeyResponse> {
    Json(ValidateKeyResponse {
        valid: true,
        id: api_key.id,
        name: api_key.name,
    })
}
