//! Salted credential hashing for the PIN/password gate.
//!
//! A credential is hashed as `SHA-256(credential || salt)` where `salt` is
//! the base64 text of 32 random bytes from the OS generator. Both the digest
//! and the salt are stored base64-encoded. Intermediate buffers holding the
//! plaintext are wiped on drop.
//!
//! # Example
//!
//! ```
//! use moodjournal::crypto::{hash_credential, verify_credential};
//!
//! let hashed = hash_credential("123456")?;
//! assert!(verify_credential("123456", &hashed.hash, &hashed.salt)?);
//! assert!(!verify_credential("654321", &hashed.hash, &hashed.salt)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::constants::SALT_LENGTH;
use crate::errors::{AppResult, CryptoError};
use base64::{engine::general_purpose, Engine as _};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

/// A digest and the salt it was computed with, both base64 text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashedCredential {
    pub hash: String,
    pub salt: String,
}

/// Generates a fresh random salt, base64-encoded.
///
/// # Errors
///
/// Returns [`CryptoError::SaltGeneration`] if the OS generator fails.
pub fn generate_salt() -> AppResult<String> {
    let mut bytes = Zeroizing::new([0u8; SALT_LENGTH]);
    OsRng
        .try_fill_bytes(&mut bytes[..])
        .map_err(CryptoError::SaltGeneration)?;
    Ok(general_purpose::STANDARD.encode(&bytes[..]))
}

fn salted_digest(credential: &str, salt: &str) -> Vec<u8> {
    let mut combined = Zeroizing::new(Vec::with_capacity(credential.len() + salt.len()));
    combined.extend_from_slice(credential.as_bytes());
    combined.extend_from_slice(salt.as_bytes());
    Sha256::digest(combined.as_slice()).to_vec()
}

/// Base64 digest of `credential` concatenated with the salt text.
pub fn hash_with_salt(credential: &str, salt: &str) -> String {
    general_purpose::STANDARD.encode(salted_digest(credential, salt))
}

/// Hashes a credential with a new random salt.
///
/// # Errors
///
/// Returns an error if salt generation fails.
pub fn hash_credential(credential: &str) -> AppResult<HashedCredential> {
    let salt = generate_salt()?;
    let hash = hash_with_salt(credential, &salt);
    Ok(HashedCredential { hash, salt })
}

/// Recomputes the digest with the stored salt and compares it to `hash`.
///
/// # Errors
///
/// Returns [`CryptoError::Decode`] if the stored salt or hash is not valid
/// base64, which means the stored row is corrupt.
pub fn verify_credential(credential: &str, hash: &str, salt: &str) -> AppResult<bool> {
    general_purpose::STANDARD
        .decode(salt)
        .map_err(CryptoError::Decode)?;
    let expected = general_purpose::STANDARD
        .decode(hash)
        .map_err(CryptoError::Decode)?;

    let computed = salted_digest(credential, salt);
    Ok(constant_time_eq(&computed, &expected))
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;

    #[test]
    fn test_salt_is_random_and_full_length() {
        let a = generate_salt().unwrap();
        let b = generate_salt().unwrap();
        assert_ne!(a, b);
        assert_eq!(general_purpose::STANDARD.decode(&a).unwrap().len(), SALT_LENGTH);
    }

    #[test]
    fn test_hash_is_deterministic_for_salt() {
        let salt = generate_salt().unwrap();
        assert_eq!(hash_with_salt("secret", &salt), hash_with_salt("secret", &salt));
        assert_ne!(hash_with_salt("secret", &salt), hash_with_salt("secret!", &salt));
    }

    #[test]
    fn test_known_digest() {
        // SHA-256("abc") in base64
        assert_eq!(
            hash_with_salt("a", "bc"),
            "ungWv48Bz+pBQUDeXa4iI7ADYaOWF3qctBD/YfIAFa0="
        );
    }

    #[test]
    fn test_same_credential_different_salts() {
        let first = hash_credential("123456").unwrap();
        let second = hash_credential("123456").unwrap();
        assert_ne!(first.salt, second.salt);
        assert_ne!(first.hash, second.hash);
    }

    #[test]
    fn test_verify() {
        let hashed = hash_credential("hunter22").unwrap();
        assert!(verify_credential("hunter22", &hashed.hash, &hashed.salt).unwrap());
        assert!(!verify_credential("hunter2", &hashed.hash, &hashed.salt).unwrap());
        assert!(!verify_credential("", &hashed.hash, &hashed.salt).unwrap());
    }

    #[test]
    fn test_verify_corrupt_salt() {
        let hashed = hash_credential("123456").unwrap();
        let result = verify_credential("123456", &hashed.hash, "not base64!");
        assert!(matches!(result, Err(AppError::Crypto(CryptoError::Decode(_)))));
    }
}
