//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod api_keys;
pub mod health;
pub mod redirect;
pub mod urls;

pub use api_keys::{
    activate_key_handler, create_key_handler, get_key_handler, list_keys_handler,
    revoke_key_handler, update_key_handler, validate_key_handler,
};
pub use health::health_handler;
pub use redirect::{redirect_handler, root_redirect_handler};
pub use urls::{
    create_url_handler, delete_url_handler, get_url_by_code_handler, get_url_handler,
    list_urls_handler, update_url_handler,
};
