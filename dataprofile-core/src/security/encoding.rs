//! Percent-encoding of credentials embedded in connection URLs.
//!
//! Every byte of a credential except ASCII alphanumerics and `-._~` becomes
//! `%XX`, spaces included, so URL parsers and database drivers read back the
//! original value from the userinfo segment. The encoding is total over UTF-8
//! input, so building a connection string never fails on a credential.
//! Decoding is the exact inverse.

use crate::{Result, error::DataProfileError};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use zeroize::Zeroizing;

/// Bytes left untouched when encoding a URL credential.
const CREDENTIAL_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encodes a password for the userinfo segment of a connection URL.
///
/// # Example
/// ```rust
/// use dataprofile_core::security::encode_password;
///
/// assert_eq!(encode_password("p@ss/word"), "p%40ss%2Fword");
/// assert_eq!(encode_password("a b+c"), "a%20b%2Bc");
/// ```
pub fn encode_password(password: &str) -> String {
    utf8_percent_encode(password, CREDENTIAL_ENCODE_SET).to_string()
}

/// Percent-encodes a login name for the userinfo segment of a connection URL.
///
/// Uses the same encode set as [`encode_password`], so `user@server` style
/// logins stay inside the userinfo segment.
pub fn encode_username(username: &str) -> String {
    utf8_percent_encode(username, CREDENTIAL_ENCODE_SET).to_string()
}

/// Decodes a password produced by [`encode_password`].
///
/// # Errors
/// Returns an encoding error when the decoded bytes are not valid UTF-8.
pub fn decode_password(encoded: &str) -> Result<Zeroizing<String>> {
    let decoded = percent_decode_str(encoded).decode_utf8().map_err(|_| {
        DataProfileError::encoding("decoded credential is not valid UTF-8")
    })?;
    Ok(Zeroizing::new(decoded.into_owned()))
}
