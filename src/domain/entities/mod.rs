//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures; the only behaviour they carry is the
//! expiry and ownership checks every layer agrees on.
//!
//! - [`ApiKey`] - A client credential (stored hashed)
//! - [`ShortUrl`] - A short code mapped to a target URL
//!
//! Creation inputs (`NewApiKey`, `NewShortUrl`) and partial updates
//! (`ShortUrlPatch`) are separate structs.

pub mod api_key;
pub mod short_url;

pub use api_key::{ApiKey, IssuedApiKey, NewApiKey};
pub use short_url::{NewShortUrl, ShortUrl, ShortUrlPatch};
