//! Repository trait for API key storage.

use crate::domain::entities::{ApiKey, NewApiKey};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for API key management.
///
/// Keys are looked up by their keyed hash; plaintext secrets never reach this
/// layer.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgApiKeyRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_api_key.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApiKeyRepository: Send + Sync {
    /// Stores a new, active API key.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if a key with the same hash already exists.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_key: NewApiKey) -> Result<ApiKey, AppError>;

    /// Finds an *active* key by hash.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(ApiKey))` if the hash matches an active key
    /// - `Ok(None)` if unknown or revoked
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_active_by_hash(&self, key_hash: &str) -> Result<Option<ApiKey>, AppError>;

    /// Finds a key by its database ID, active or not.
    async fn find_by_id(&self, id: i64) -> Result<Option<ApiKey>, AppError>;

    /// Finds a key by its name.
    async fn find_by_name(&self, name: &str) -> Result<Option<ApiKey>, AppError>;

    /// Lists all keys, newest first.
    async fn list(&self) -> Result<Vec<ApiKey>, AppError>;

    /// Sets the active flag and bumps `updated_at`.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    async fn set_active(&self, id: i64, is_active: bool) -> Result<Option<ApiKey>, AppError>;

    async fn count(&self) -> Result<i64, AppError>;
}
