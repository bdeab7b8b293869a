//! Short URL entity representing a code → target URL mapping.

use chrono::{DateTime, Utc};

/// A shortened URL owned by one API key.
///
/// `code` is unique across all records, expired or not. `original_url` is kept
/// exactly as submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortUrl {
    pub id: i64,
    pub code: String,
    pub original_url: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub api_key_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ShortUrl {
    /// Returns true once `now` has reached the expiry time.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|e| now >= e)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_owned_by(&self, api_key_id: i64) -> bool {
        self.api_key_id == api_key_id
    }
}

/// Input data for inserting a short URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewShortUrl {
    pub code: String,
    pub original_url: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub api_key_id: i64,
}

/// Partial update for an existing short URL.
///
/// `None` fields are left unchanged.
/// `expires_at: Some(None)` clears the expiry; `Some(Some(t))` sets it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShortUrlPatch {
    pub original_url: Option<String>,
    pub expires_at: Option<Option<DateTime<Utc>>>,
}

impl ShortUrlPatch {
    pub fn is_empty(&self) -> bool {
        self.original_url.is_none() && self.expires_at.is_none()
    }

    /// Applies the patch to an in-memory record.
    pub fn apply_to(&self, url: &mut ShortUrl) {
        if let Some(original_url) = &self.original_url {
            url.original_url = original_url.clone();
        }
        if let Some(expires_at) = self.expires_at {
            url.expires_at = expires_at;
        }
    }
}
