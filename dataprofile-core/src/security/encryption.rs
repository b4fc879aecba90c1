//! Sealing of database passwords at rest.
//!
//! Connection records store the password in an encrypted-at-rest form. This
//! module produces and opens that form: AES-GCM-256 with a random 96-bit
//! nonce, keyed by an Argon2id derivation of the application master key. The
//! sealed form is a printable token, `dp1$` followed by URL-safe base64 of
//! `salt || nonce || ciphertext+tag`.
//!
//! Unsealing happens before parameters reach the flavor layer; the flavor
//! layer only ever sees plaintext.
//!
//! # Cryptographic Standards
//! - AES-GCM: NIST SP 800-38D
//! - Argon2id: RFC 9106

use crate::{Result, error::DataProfileError};
use aes_gcm::{
    Aes256Gcm, Key, Nonce,
    aead::{Aead, AeadCore, KeyInit, OsRng, rand_core::RngCore},
};
use argon2::{Argon2, Params, Version};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use zeroize::Zeroizing;

/// AES-GCM nonce size: 96 bits (NIST SP 800-38D §8.2.1)
const AES_GCM_NONCE_SIZE: usize = 12;

/// AES-GCM authentication tag size: 128 bits (NIST SP 800-38D §5.2.1)
const AES_GCM_TAG_SIZE: usize = 16;

/// AES key size: 256 bits
const AES_KEY_SIZE: usize = 32;

/// Argon2id salt size: 128 bits (RFC 9106 §4)
const ARGON2_SALT_SIZE: usize = 16;

/// Argon2id memory cost in KiB (64 MiB)
const ARGON2_MEMORY_COST: u32 = 65536;

/// Argon2id iterations
const ARGON2_TIME_COST: u32 = 3;

/// Argon2id lanes
const ARGON2_PARALLELISM: u32 = 4;

/// Marker identifying a sealed password token and its format version.
pub const SEALED_PREFIX: &str = "dp1$";

/// Decoded parts of a sealed password token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedPassword {
    /// Argon2id salt (16 bytes)
    pub salt: Vec<u8>,
    /// AES-GCM nonce (12 bytes)
    pub nonce: Vec<u8>,
    /// Ciphertext with the 16-byte authentication tag appended
    pub ciphertext: Vec<u8>,
}

impl SealedPassword {
    /// Serializes to the printable token form.
    pub fn to_token(&self) -> String {
        let mut raw = Vec::with_capacity(
            self.salt
                .len()
                .saturating_add(self.nonce.len())
                .saturating_add(self.ciphertext.len()),
        );
        raw.extend_from_slice(&self.salt);
        raw.extend_from_slice(&self.nonce);
        raw.extend_from_slice(&self.ciphertext);
        format!("{}{}", SEALED_PREFIX, URL_SAFE_NO_PAD.encode(raw))
    }

    /// Parses a token produced by [`SealedPassword::to_token`].
    ///
    /// # Errors
    /// Returns a configuration error when the prefix is missing, the payload
    /// is not base64, or the payload is too short to hold salt, nonce and tag.
    pub fn from_token(token: &str) -> Result<Self> {
        let payload = token.strip_prefix(SEALED_PREFIX).ok_or_else(|| {
            DataProfileError::configuration("sealed password is missing the dp1$ prefix")
        })?;

        let raw = URL_SAFE_NO_PAD.decode(payload.trim()).map_err(|e| {
            DataProfileError::configuration(format!("sealed password is not valid base64: {}", e))
        })?;

        let minimum = ARGON2_SALT_SIZE + AES_GCM_NONCE_SIZE + AES_GCM_TAG_SIZE;
        if raw.len() < minimum {
            return Err(DataProfileError::configuration(format!(
                "sealed password is too short: expected at least {} bytes, got {}",
                minimum,
                raw.len()
            )));
        }

        let (salt, rest) = raw.split_at(ARGON2_SALT_SIZE);
        let (nonce, ciphertext) = rest.split_at(AES_GCM_NONCE_SIZE);

        Ok(Self {
            salt: salt.to_vec(),
            nonce: nonce.to_vec(),
            ciphertext: ciphertext.to_vec(),
        })
    }
}

/// Returns `true` when the value carries the sealed-token prefix.
pub fn is_sealed(value: &str) -> bool {
    value.starts_with(SEALED_PREFIX)
}

/// Derives an AES-256 key from the master key using Argon2id.
fn derive_key(master_key: &str, salt: &[u8]) -> Result<Zeroizing<[u8; AES_KEY_SIZE]>> {
    if master_key.is_empty() {
        return Err(DataProfileError::configuration("master key cannot be empty"));
    }

    let params = Params::new(
        ARGON2_MEMORY_COST,
        ARGON2_TIME_COST,
        ARGON2_PARALLELISM,
        Some(AES_KEY_SIZE),
    )
    .map_err(|e| DataProfileError::configuration(format!("Invalid Argon2 parameters: {}", e)))?;

    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params);

    let mut key = Zeroizing::new([0u8; AES_KEY_SIZE]);
    argon2
        .hash_password_into(master_key.as_bytes(), salt, key.as_mut_slice())
        .map_err(|e| DataProfileError::configuration(format!("Key derivation failed: {}", e)))?;

    Ok(key)
}

/// Seals a plaintext password with the application master key.
///
/// Every call draws a fresh salt and nonce, so sealing the same password
/// twice yields different tokens.
///
/// # Errors
/// Returns a configuration error if the master key is empty or encryption
/// fails.
///
/// # Example
/// ```rust
/// use dataprofile_core::security::encryption::{seal_password, unseal_password};
///
/// let token = seal_password("p@ss/word", "master-key")?;
/// assert!(token.starts_with("dp1$"));
/// assert_eq!(unseal_password(&token, "master-key")?.as_str(), "p@ss/word");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn seal_password(password: &str, master_key: &str) -> Result<String> {
    let mut salt = vec![0u8; ARGON2_SALT_SIZE];
    OsRng.fill_bytes(&mut salt);

    let key = derive_key(master_key, &salt)?;
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&*key));
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, password.as_bytes())
        .map_err(|e| DataProfileError::configuration(format!("Encryption failed: {}", e)))?;

    Ok(SealedPassword {
        salt,
        nonce: nonce.to_vec(),
        ciphertext,
    }
    .to_token())
}

/// Opens a sealed password token with the application master key.
///
/// # Errors
/// Returns a configuration error if the token is malformed, the master key is
/// wrong, or the token was tampered with. The error never includes the
/// plaintext.
pub fn unseal_password(token: &str, master_key: &str) -> Result<Zeroizing<String>> {
    let sealed = SealedPassword::from_token(token)?;

    let key = derive_key(master_key, &sealed.salt)?;
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&*key));
    let nonce = Nonce::from_slice(&sealed.nonce);

    let plaintext = Zeroizing::new(
        cipher
            .decrypt(nonce, sealed.ciphertext.as_slice())
            .map_err(|_| {
                DataProfileError::configuration(
                    "Decryption failed (wrong master key or corrupted password)",
                )
            })?,
    );

    let password = std::str::from_utf8(&plaintext)
        .map_err(|_| DataProfileError::encoding("unsealed password is not valid UTF-8"))?;

    Ok(Zeroizing::new(password.to_string()))
}
