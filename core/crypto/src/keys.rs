//! Key and salt types with secure memory handling.
//!
//! All key types automatically zeroize their memory on drop to prevent
//! sensitive data from persisting in memory.

use sha2::{Digest, Sha256};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Length of the vault encryption key in bytes (256-bit).
pub const KEY_LENGTH: usize = 32;

/// Length of the fixed application-wide salt in bytes.
pub const SALT_LENGTH: usize = 16;

/// Symmetric key derived from the vault password.
///
/// Used exclusively by the authenticated field cipher. Never persisted;
/// callers hold it for the shortest possible scope and it zeroizes on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct VaultKey {
    key: [u8; KEY_LENGTH],
}

impl VaultKey {
    /// Create a vault key from raw bytes.
    pub fn from_bytes(key: [u8; KEY_LENGTH]) -> Self {
        Self { key }
    }

    /// Get the key bytes.
    ///
    /// # Security
    /// The returned slice should be used immediately and not stored.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }

    /// Generate a random key.
    pub fn generate() -> Self {
        use rand::RngCore;
        let mut key = [0u8; KEY_LENGTH];
        rand::thread_rng().fill_bytes(&mut key);
        Self { key }
    }
}

impl fmt::Debug for VaultKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VaultKey([REDACTED])")
    }
}

/// Fixed application-wide salt for deterministic derivation.
///
/// Derived from the server-wide secret rather than per-record randomness, so
/// the same input always re-derives the same digest or key without stored
/// per-user salt material. Every record shares this salt; distinct vault
/// passwords still produce distinct keys.
#[derive(Clone, PartialEq, Eq)]
pub struct FixedSalt([u8; SALT_LENGTH]);

impl FixedSalt {
    /// Derive the salt from the application-wide secret.
    ///
    /// SHA-256 of the secret, truncated to 16 bytes.
    pub fn derive(app_secret: &[u8]) -> Self {
        let digest = Sha256::digest(app_secret);
        let mut salt = [0u8; SALT_LENGTH];
        salt.copy_from_slice(&digest[..SALT_LENGTH]);
        Self(salt)
    }

    /// Create from raw bytes.
    pub fn from_bytes(bytes: [u8; SALT_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Get the salt bytes.
    pub fn as_bytes(&self) -> &[u8; SALT_LENGTH] {
        &self.0
    }
}

impl fmt::Debug for FixedSalt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FixedSalt([REDACTED])")
    }
}
