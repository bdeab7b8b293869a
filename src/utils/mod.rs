//! Utility functions shared across layers.
//!
//! - [`code_generator`] - Short code and API key generation, custom code validation
//! - [`url_validation`] - Target URL validation

pub mod code_generator;
pub mod url_validation;
