//! Repository trait for short URL data access.

use crate::domain::entities::{NewShortUrl, ShortUrl, ShortUrlPatch};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for short URLs.
///
/// Every query except [`find_by_code`](ShortUrlRepository::find_by_code) is
/// scoped to the owning API key: a row owned by another key behaves exactly
/// like a missing one.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgShortUrlRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShortUrlRepository: Send + Sync {
    /// Inserts a new short URL.
    ///
    /// Code uniqueness is decided by the store itself, atomically with the
    /// insert.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the code is already taken.
    /// Returns [`AppError::Internal`] on database errors.
    async fn insert(&self, new_url: NewShortUrl) -> Result<ShortUrl, AppError>;

    /// Finds a short URL by code regardless of owner or expiry.
    ///
    /// Used by the public redirect.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_code(&self, code: &str) -> Result<Option<ShortUrl>, AppError>;

    /// Finds a short URL by id, only if owned by `api_key_id`.
    async fn find_owned_by_id(
        &self,
        id: i64,
        api_key_id: i64,
    ) -> Result<Option<ShortUrl>, AppError>;

    /// Finds a short URL by code, only if owned by `api_key_id`.
    async fn find_owned_by_code(
        &self,
        code: &str,
        api_key_id: i64,
    ) -> Result<Option<ShortUrl>, AppError>;

    /// Lists the URLs owned by `api_key_id`, newest first.
    ///
    /// # Arguments
    ///
    /// - `page` - Page number (1-indexed)
    /// - `page_size` - Number of items per page
    async fn list_by_owner(
        &self,
        api_key_id: i64,
        page: i64,
        page_size: i64,
    ) -> Result<Vec<ShortUrl>, AppError>;

    async fn count_by_owner(&self, api_key_id: i64) -> Result<i64, AppError>;

    /// Applies a partial update to an owned URL and bumps `updated_at`.
    ///
    /// Returns `Ok(None)` when no URL with this id is owned by `api_key_id`.
    async fn update_owned(
        &self,
        id: i64,
        api_key_id: i64,
        patch: ShortUrlPatch,
    ) -> Result<Option<ShortUrl>, AppError>;

    /// Hard-deletes an owned URL.
    ///
    /// Returns `Ok(true)` if a row was removed.
    async fn delete_owned(&self, id: i64, api_key_id: i64) -> Result<bool, AppError>;

    /// Round-trips to the store; used by the health check.
    async fn ping(&self) -> Result<(), AppError>;
}
