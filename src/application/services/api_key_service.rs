//! API key issuance and administration.

use std::sync::Arc;

use serde_json::json;

use crate::application::services::auth_service::hash_api_key;
use crate::domain::entities::{ApiKey, IssuedApiKey, NewApiKey};
use crate::domain::repositories::ApiKeyRepository;
use crate::error::AppError;
use crate::utils::code_generator::generate_api_key;

pub const MAX_KEY_NAME_LEN: usize = 100;

/// Service behind the admin key endpoints and the admin CLI.
pub struct ApiKeyService {
    repository: Arc<dyn ApiKeyRepository>,
    secret_key: String,
}

impl ApiKeyService {
    pub fn new(repository: Arc<dyn ApiKeyRepository>, secret_key: String) -> Self {
        Self {
            repository,
            secret_key,
        }
    }

    /// Issues a new active key.
    ///
    /// The plaintext in the returned [`IssuedApiKey`] is the only copy; only its
    /// keyed hash is stored.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the trimmed name is empty or longer
    /// than 100 characters.
    pub async fn issue(&self, name: &str) -> Result<IssuedApiKey, AppError> {
        let name = name.trim();
        if name.is_empty() || name.chars().count() > MAX_KEY_NAME_LEN {
            return Err(AppError::bad_request(
                format!("Key name must be 1-{} characters", MAX_KEY_NAME_LEN),
                json!({ "field": "name" }),
            ));
        }

        let plaintext = generate_api_key();
        let key = self
            .repository
            .create(NewApiKey {
                name: name.to_string(),
                key_hash: hash_api_key(&self.secret_key, &plaintext),
            })
            .await?;

        tracing::info!(api_key_id = key.id, name = %key.name, "API key issued");

        Ok(IssuedApiKey { key, plaintext })
    }

    pub async fn list(&self) -> Result<Vec<ApiKey>, AppError> {
        self.repository.list().await
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no key has this id.
    pub async fn get(&self, id: i64) -> Result<ApiKey, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| key_not_found(id))
    }

    /// Activates or revokes a key. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no key has this id.
    pub async fn set_active(&self, id: i64, is_active: bool) -> Result<ApiKey, AppError> {
        let key = self
            .repository
            .set_active(id, is_active)
            .await?
            .ok_or_else(|| key_not_found(id))?;

        tracing::info!(api_key_id = id, is_active, "API key status changed");

        Ok(key)
    }

    pub async fn revoke(&self, id: i64) -> Result<ApiKey, AppError> {
        self.set_active(id, false).await
    }

    pub async fn activate(&self, id: i64) -> Result<ApiKey, AppError> {
        self.set_active(id, true).await
    }
}

fn key_not_found(id: i64) -> AppError {
    AppError::not_found("API key not found", json!({ "id": id }))
}
