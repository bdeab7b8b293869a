//! DTOs for the short URL endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::services::CreateShortUrl;
use crate::config::Config;
use crate::domain::entities::{ShortUrl, ShortUrlPatch};
use crate::utils::url_validation::validate_target_url_field;

/// Request body for `POST /api/urls`.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "original_url": "https://example.com/some/long/path",
    "short_code": "promo-2025",
    "expires_at": "2030-01-01T00:00:00Z"
}))]
pub struct CreateShortUrlRequest {
    /// Absolute http(s) URL, stored exactly as given.
    #[validate(custom(function = "validate_target_url_field"))]
    pub original_url: String,

    /// Optional custom code (3-50 chars of `[A-Za-z0-9_-]`).
    #[serde(default, alias = "custom_code")]
    pub short_code: Option<String>,

    /// Optional expiry. From this instant on, the redirect answers 410 Gone.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<CreateShortUrlRequest> for CreateShortUrl {
    fn from(req: CreateShortUrlRequest) -> Self {
        CreateShortUrl {
            original_url: req.original_url,
            custom_code: req.short_code,
            expires_at: req.expires_at,
        }
    }
}

/// Request body for `PUT`/`PATCH /api/urls/{id}`.
///
/// # `expires_at` semantics
///
/// - **Absent** → leave existing value unchanged
/// - **`null`** → clear expiry
/// - **Timestamp** → set new expiry
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateShortUrlRequest {
    #[validate(custom(function = "validate_target_url_field"))]
    pub original_url: Option<String>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<DateTime<Utc>>)]
    pub expires_at: Option<Option<DateTime<Utc>>>,
}

impl From<UpdateShortUrlRequest> for ShortUrlPatch {
    fn from(req: UpdateShortUrlRequest) -> Self {
        ShortUrlPatch {
            original_url: req.original_url,
            expires_at: req.expires_at,
        }
    }
}

/// A short URL as returned to its owner.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ShortUrlResponse {
    pub id: i64,
    pub short_code: String,
    /// `BASE_URL/short_code`
    pub short_url: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl ShortUrlResponse {
    pub fn from_entity(url: ShortUrl, config: &Config) -> Self {
        Self {
            short_url: config.short_url_for(&url.code),
            id: url.id,
            short_code: url.code,
            original_url: url.original_url,
            created_at: url.created_at,
            updated_at: url.updated_at,
            expires_at: url.expires_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ShortUrlListResponse {
    pub urls: Vec<ShortUrlResponse>,
    /// Total URLs owned by the caller.
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}
