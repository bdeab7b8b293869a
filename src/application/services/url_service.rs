//! Short URL creation, owner-scoped management and public resolution.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::domain::entities::{NewShortUrl, ShortUrl, ShortUrlPatch};
use crate::domain::repositories::ShortUrlRepository;
use crate::error::AppError;
use crate::utils::code_generator::{generate_code, validate_custom_code};
use crate::utils::url_validation::validate_target_url;

/// Random draws before giving up with [`AppError::Exhausted`].
pub const MAX_GENERATION_ATTEMPTS: usize = 10;

/// Input for [`UrlService::create`].
#[derive(Debug, Clone, Default)]
pub struct CreateShortUrl {
    pub original_url: String,
    pub custom_code: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Service for short URL lifecycle.
///
/// Code uniqueness is never pre-checked: the repository insert is the single
/// atomic arbiter and a conflict either fails the request (custom code) or
/// triggers a fresh draw (random code).
pub struct UrlService {
    repository: Arc<dyn ShortUrlRepository>,
    code_length: usize,
}

impl UrlService {
    /// Creates a new URL service.
    ///
    /// `code_length` is the length of generated codes.
    pub fn new(repository: Arc<dyn ShortUrlRepository>, code_length: usize) -> Self {
        Self {
            repository,
            code_length,
        }
    }

    /// Creates a short URL owned by `api_key_id`.
    ///
    /// Every call creates a new row, even for a target URL that was shortened
    /// before.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] for an invalid URL or custom code
    /// - [`AppError::Conflict`] if the custom code is taken
    /// - [`AppError::Exhausted`] if no free random code was found
    pub async fn create(
        &self,
        api_key_id: i64,
        input: CreateShortUrl,
    ) -> Result<ShortUrl, AppError> {
        validate_target_url(&input.original_url)?;

        let url = match input.custom_code {
            Some(code) => {
                validate_custom_code(&code)?;
                self.repository
                    .insert(NewShortUrl {
                        code,
                        original_url: input.original_url,
                        expires_at: input.expires_at,
                        api_key_id,
                    })
                    .await?
            }
            None => {
                self.insert_with_generated_code(api_key_id, input.original_url, input.expires_at)
                    .await?
            }
        };

        tracing::info!(
            short_url_id = url.id,
            code = %url.code,
            api_key_id,
            "Short URL created"
        );

        Ok(url)
    }

    async fn insert_with_generated_code(
        &self,
        api_key_id: i64,
        original_url: String,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<ShortUrl, AppError> {
        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            let new_url = NewShortUrl {
                code: generate_code(self.code_length),
                original_url: original_url.clone(),
                expires_at,
                api_key_id,
            };

            match self.repository.insert(new_url).await {
                Ok(url) => return Ok(url),
                Err(AppError::Conflict { .. }) => {
                    tracing::debug!(attempt, "Generated code collided, drawing again");
                }
                Err(e) => return Err(e),
            }
        }

        tracing::warn!(
            attempts = MAX_GENERATION_ATTEMPTS,
            code_length = self.code_length,
            "Could not find a free short code"
        );

        Err(AppError::exhausted(
            "Could not generate a unique short code",
            json!({ "attempts": MAX_GENERATION_ATTEMPTS }),
        ))
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the URL does not exist or belongs to another key.
    pub async fn get_owned(&self, id: i64, api_key_id: i64) -> Result<ShortUrl, AppError> {
        self.repository
            .find_owned_by_id(id, api_key_id)
            .await?
            .ok_or_else(|| url_not_found(json!({ "id": id })))
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code does not exist or belongs to another key.
    pub async fn get_owned_by_code(
        &self,
        code: &str,
        api_key_id: i64,
    ) -> Result<ShortUrl, AppError> {
        self.repository
            .find_owned_by_code(code, api_key_id)
            .await?
            .ok_or_else(|| url_not_found(json!({ "code": code })))
    }

    /// Returns one page of the caller's URLs plus the caller's total.
    pub async fn list_owned(
        &self,
        api_key_id: i64,
        page: i64,
        page_size: i64,
    ) -> Result<(Vec<ShortUrl>, i64), AppError> {
        let items = self
            .repository
            .list_by_owner(api_key_id, page, page_size)
            .await?;
        let total = self.repository.count_by_owner(api_key_id).await?;

        Ok((items, total))
    }

    /// Updates the target and/or expiry of an owned URL. The code never changes.
    ///
    /// An empty patch returns the current record unchanged.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] for an invalid new URL
    /// - [`AppError::NotFound`] if the URL does not exist or belongs to another key
    pub async fn update_owned(
        &self,
        id: i64,
        api_key_id: i64,
        patch: ShortUrlPatch,
    ) -> Result<ShortUrl, AppError> {
        if let Some(original_url) = &patch.original_url {
            validate_target_url(original_url)?;
        }

        if patch.is_empty() {
            return self.get_owned(id, api_key_id).await;
        }

        self.repository
            .update_owned(id, api_key_id, patch)
            .await?
            .ok_or_else(|| url_not_found(json!({ "id": id })))
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the URL does not exist or belongs to another key.
    pub async fn delete_owned(&self, id: i64, api_key_id: i64) -> Result<(), AppError> {
        if self.repository.delete_owned(id, api_key_id).await? {
            tracing::info!(short_url_id = id, api_key_id, "Short URL deleted");
            Ok(())
        } else {
            Err(url_not_found(json!({ "id": id })))
        }
    }

    /// Resolves a code for the public redirect.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] for an unknown code
    /// - [`AppError::Expired`] once `now >= expires_at`
    pub async fn resolve(&self, code: &str) -> Result<ShortUrl, AppError> {
        let url = self
            .repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| url_not_found(json!({ "code": code })))?;

        if url.is_expired() {
            return Err(AppError::expired(
                "Short URL has expired",
                json!({ "code": code, "expired_at": url.expires_at }),
            ));
        }

        Ok(url)
    }

    /// Checks that the backing store answers.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }
}

fn url_not_found(details: serde_json::Value) -> AppError {
    AppError::not_found("Short URL not found", details)
}
