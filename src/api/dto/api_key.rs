//! DTOs for API key endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::domain::entities::{ApiKey, IssuedApiKey};

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Name cannot be empty".into());
        return Err(err);
    }
    Ok(())
}

/// Request body for `POST /api/admin/keys`.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({ "name": "ci-pipeline" }))]
pub struct CreateApiKeyRequest {
    /// Human-readable label, 1-100 characters after trimming.
    #[validate(custom(function = "not_blank"))]
    pub name: String,
}

/// Request body for `PATCH /api/admin/keys/{id}`.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateApiKeyRequest {
    pub is_active: bool,
}

/// API key metadata. Never carries the hash or the plaintext.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiKeyInfo {
    pub id: i64,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ApiKey> for ApiKeyInfo {
    fn from(key: ApiKey) -> Self {
        Self {
            id: key.id,
            name: key.name,
            is_active: key.is_active,
            created_at: key.created_at,
            updated_at: key.updated_at,
        }
    }
}

/// Freshly created key. `key` is shown once and cannot be retrieved again.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatedApiKeyResponse {
    pub id: i64,
    pub name: String,
    pub key: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<IssuedApiKey> for CreatedApiKeyResponse {
    fn from(issued: IssuedApiKey) -> Self {
        Self {
            id: issued.key.id,
            name: issued.key.name,
            key: issued.plaintext,
            is_active: issued.key.is_active,
            created_at: issued.key.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiKeyListResponse {
    pub keys: Vec<ApiKeyInfo>,
    pub total: i64,
}

/// Response of `GET /api/keys/validate`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ValidateKeyResponse {
    pub valid: bool,
    pub id: i64,
    pub name: String,
}
