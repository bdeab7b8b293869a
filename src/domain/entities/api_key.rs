//! API key entity.

use chrono::{DateTime, Utc};

/// An API key issued to a client.
///
/// Only the keyed hash of the secret is stored; the plaintext is shown once at
/// creation and never persisted. Keys are revoked by clearing `is_active`,
/// never deleted, so the URLs they own stay attributable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKey {
    pub id: i64,
    pub name: String,
    pub key_hash: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input data for storing a new API key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewApiKey {
    pub name: String,
    pub key_hash: String,
}

/// A freshly issued key together with its plaintext secret.
///
/// This is the only place the plaintext exists after generation.
#[derive(Debug, Clone)]
pub struct IssuedApiKey {
    pub key: ApiKey,
    pub plaintext: String,
}
