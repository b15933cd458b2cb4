//! Password hashing and verification using Argon2id
//!
//! Credentials are hashed at the store boundary before any record is
//! written; the stored value is a PHC-formatted hash string, never the
//! supplied password.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use edurec_core::{Error, Result};

/// Hash a password with a per-password random salt.
///
/// Returns the PHC-formatted hash string safe for document storage.
pub fn hash_password(password: &str) -> Result<String> {
    if password.is_empty() {
        return Err(Error::InvalidInput("password must not be empty".to_string()));
    }

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| Error::Storage(format!("password hashing failed: {e}")))?;

    Ok(hash.to_string())
}

/// Verify a password against its stored PHC hash.
///
/// A mismatch is `Ok(false)`; only malformed hashes or backend failures
/// are errors.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(password_hash)
        .map_err(|e| Error::Storage(format!("invalid password hash format: {e}")))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(Error::Storage(format!("password verification failed: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert_ne!(hash, "correct horse battery staple");
        assert!(verify_password("correct horse battery staple", &hash).unwrap());
        assert!(!verify_password("wrong password", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same password").unwrap();
        let b = hash_password("same password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_empty_password_rejected() {
        assert!(hash_password("").is_err());
    }

    #[test]
    fn test_malformed_hash_is_error() {
        assert!(verify_password("anything", "not-a-phc-hash").is_err());
    }
}
