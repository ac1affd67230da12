//! Account password hashing and verification.
//!
//! Hashes are stored as PHC strings
//! (`$argon2id$v=19$m=65536,t=4,p=4$<salt>$<digest>`), so each hash is
//! self-describing: algorithm tag, version, parameters, and the random
//! per-hash salt travel with the digest. Verification re-derives the digest
//! from the embedded parameters and compares in constant time.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordVerifier, SaltString},
    Argon2, PasswordHasher,
};

use crate::kdf::KdfParams;
use credvault_common::{Error, Result};

/// Capability interface for account-secret hashing.
///
/// Injected into the workflows so tests can substitute faster parameters or
/// a deterministic implementation.
pub trait SecretHasher: Send + Sync {
    /// Hash a password with a fresh random salt.
    ///
    /// Empty input maps to an empty string.
    fn hash(&self, password: &str) -> Result<String>;

    /// Verify a password against an encoded hash.
    ///
    /// Never fails: parse failures, malformed fields, unsupported algorithm
    /// tags, and digest mismatches are all reported as `false`, so a caller
    /// cannot tell a wrong password from a corrupt stored hash.
    fn verify(&self, encoded: &str, password: &str) -> bool;
}

/// Argon2id implementation of [`SecretHasher`].
pub struct Argon2SecretHasher {
    params: KdfParams,
}

impl Argon2SecretHasher {
    /// Create a hasher with the given parameters.
    pub fn new(params: KdfParams) -> Self {
        Self { params }
    }
}

impl SecretHasher for Argon2SecretHasher {
    fn hash(&self, password: &str) -> Result<String> {
        if password.is_empty() {
            return Ok(String::new());
        }

        let argon2 = self.params.to_argon2()?;
        let salt = SaltString::generate(&mut OsRng);

        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| Error::Crypto(format!("Password hashing failed: {}", e)))?;

        Ok(hash.to_string())
    }

    fn verify(&self, encoded: &str, password: &str) -> bool {
        // Verification uses the parameters embedded in the hash string, not
        // this hasher's own, so stored hashes survive parameter changes.
        let parsed = match PasswordHash::new(encoded) {
            Ok(parsed) => parsed,
            Err(_) => return false,
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}
