//! Security utilities for credential handling.
//!
//! - `encoding`: percent-encoding of passwords embedded in connection URLs
//! - `encryption`: sealing of at-rest passwords (feature-gated)
//!
//! Redaction of finished connection strings lives in
//! [`crate::error::redact_database_url`].

mod encoding;

#[cfg(feature = "encryption")]
pub mod encryption;

pub use encoding::{decode_password, encode_password, encode_username};
