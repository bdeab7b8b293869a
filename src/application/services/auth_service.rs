//! Authentication service for API keys and the admin token.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use subtle::ConstantTimeEq;

use crate::domain::entities::ApiKey;
use crate::domain::repositories::ApiKeyRepository;
use crate::error::AppError;
use serde_json::json;

type HmacSha256 = Hmac<Sha256>;

/// Hashes a raw API key with HMAC-SHA256 keyed by `secret`.
///
/// `secret` is a server-wide pepper, not a per-key salt: the hash is
/// deterministic so keys can be looked up by it. Returns a 64-character
/// lowercase hex-encoded MAC. The admin CLI and the server must use the same
/// secret for keys to verify.
pub fn hash_api_key(secret: &str, key: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(key.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Service for authenticating API requests.
///
/// API keys are hashed with HMAC-SHA256 (keyed by `SECRET_KEY`) before lookup.
/// An attacker with read-only access to the database cannot verify or forge
/// keys without the server-side secret.
///
/// The active flag is read from the repository on every call, so a revoked key
/// is rejected on its next request.
pub struct AuthService {
    repository: Arc<dyn ApiKeyRepository>,
    secret_key: String,
    admin_token_digest: Vec<u8>,
}

impl AuthService {
    /// Creates a new authentication service.
    ///
    /// # Arguments
    ///
    /// - `repository` - API key repository
    /// - `secret_key` - HMAC key; must match the value used when keys were created
    /// - `admin_token` - shared secret for admin endpoints
    pub fn new(
        repository: Arc<dyn ApiKeyRepository>,
        secret_key: String,
        admin_token: &str,
    ) -> Self {
        Self {
            repository,
            secret_key,
            admin_token_digest: Sha256::digest(admin_token.as_bytes()).to_vec(),
        }
    }

    pub fn hash_key(&self, key: &str) -> String {
        hash_api_key(&self.secret_key, key)
    }

    /// Resolves a raw API key to its active [`ApiKey`] record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the key is unknown or revoked; the
    /// two cases are indistinguishable to the caller.
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn authenticate(&self, key: &str) -> Result<ApiKey, AppError> {
        let key_hash = self.hash_key(key);

        self.repository
            .find_active_by_hash(&key_hash)
            .await?
            .ok_or_else(|| {
                AppError::unauthorized(
                    "Unauthorized",
                    json!({ "reason": "Invalid or revoked API key" }),
                )
            })
    }

    /// Checks a presented admin token in constant time.
    ///
    /// Both sides are reduced to SHA-256 digests first so the comparison does
    /// not leak the configured token's length.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Forbidden`] on mismatch.
    pub fn verify_admin_token(&self, presented: &str) -> Result<(), AppError> {
        let presented_digest = Sha256::digest(presented.as_bytes());

        if bool::from(presented_digest.as_slice().ct_eq(&self.admin_token_digest)) {
            Ok(())
        } else {
            Err(AppError::forbidden(
                "Forbidden",
                json!({ "reason": "Invalid admin token" }),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockApiKeyRepository;
    use chrono::Utc;

    const SECRET: &str = "test-secret-key";
    const ADMIN: &str = "admin-token-0123456789";

    fn api_key(id: i64, key_hash: String) -> ApiKey {
        let now = Utc::now();
        ApiKey {
            id,
            name: "ci".to_string(),
            key_hash,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn service(repo: MockApiKeyRepository) -> AuthService {
        AuthService::new(Arc::new(repo), SECRET.to_string(), ADMIN)
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let mut mock_repo = MockApiKeyRepository::new();

        let key = "valid-key";
        let expected_hash = hash_api_key(SECRET, key);
        let returned_hash = expected_hash.clone();

        mock_repo
            .expect_find_active_by_hash()
            .withf(move |hash| hash == &expected_hash)
            .times(1)
            .returning(move |_| Ok(Some(api_key(3, returned_hash.clone()))));

        let result = service(mock_repo).authenticate(key).await;

        assert_eq!(result.unwrap().id, 3);
    }

    #[tokio::test]
    async fn test_authenticate_unknown_or_revoked_key() {
        let mut mock_repo = MockApiKeyRepository::new();

        mock_repo
            .expect_find_active_by_hash()
            .times(1)
            .returning(|_| Ok(None));

        let result = service(mock_repo).authenticate("invalid-key").await;

        assert!(matches!(result.unwrap_err(), AppError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_authenticate_propagates_db_error() {
        let mut mock_repo = MockApiKeyRepository::new();

        mock_repo
            .expect_find_active_by_hash()
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let result = service(mock_repo).authenticate("any").await;

        assert!(matches!(result.unwrap_err(), AppError::Internal { .. }));
    }

    #[test]
    fn test_hash_is_stable_hex() {
        let hash1 = hash_api_key(SECRET, "test-key");
        let hash2 = hash_api_key(SECRET, "test-key");

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
        assert!(hash1.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(hash1, "test-key");
    }

    #[test]
    fn test_hash_is_hmac_sha256() {
        // RFC 4231 test case 2
        assert_eq!(
            hash_api_key("Jefe", "what do ya want for nothing?"),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_hash_different_inputs() {
        assert_ne!(hash_api_key(SECRET, "key1"), hash_api_key(SECRET, "key2"));
    }

    #[test]
    fn test_hash_secret_matters() {
        // Same key, different secrets → different hashes
        assert_ne!(
            hash_api_key("secret-a", "key"),
            hash_api_key("secret-b", "key")
        );
    }

    #[test]
    fn test_service_hash_matches_free_function() {
        let svc = service(MockApiKeyRepository::new());
        assert_eq!(svc.hash_key("abc"), hash_api_key(SECRET, "abc"));
    }

    #[test]
    fn test_verify_admin_token() {
        let svc = service(MockApiKeyRepository::new());

        assert!(svc.verify_admin_token(ADMIN).is_ok());
        assert!(matches!(
            svc.verify_admin_token("admin-token-012345678").unwrap_err(),
            AppError::Forbidden { .. }
        ));
        assert!(svc.verify_admin_token("").is_err());
        assert!(svc.verify_admin_token(&format!("{ADMIN}x")).is_err());
    }
}
