//! Key derivation using Argon2id.
//!
//! Argon2id is a memory-hard password hashing function that provides
//! resistance to both GPU and time-memory trade-off attacks. The same
//! parameter set drives vault-key derivation, lookup hashing, and account
//! password hashing.

use argon2::{Algorithm, Argon2, Params, Version};
use serde::{Deserialize, Serialize};

use crate::keys::{FixedSalt, VaultKey, KEY_LENGTH};
use credvault_common::{Error, Result};

/// Parameters for Argon2id derivation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KdfParams {
    /// Memory cost in KiB (e.g., 65536 = 64 MiB).
    pub memory_cost: u32,
    /// Number of iterations.
    pub time_cost: u32,
    /// Degree of parallelism.
    pub parallelism: u32,
}

impl KdfParams {
    /// Production parameters: 64 MiB, 4 passes, 4 lanes.
    ///
    /// Every derivation at these settings costs tens of milliseconds and a
    /// 64 MiB working set, including lookup hashing.
    pub fn standard() -> Self {
        Self {
            memory_cost: 65536, // 64 MiB
            time_cost: 4,
            parallelism: 4,
        }
    }

    /// Cheap parameters for test suites.
    pub fn for_tests() -> Self {
        Self {
            memory_cost: 8192, // 8 MiB
            time_cost: 1,
            parallelism: 1,
        }
    }

    pub(crate) fn to_argon2(&self) -> Result<Argon2<'static>> {
        let params = Params::new(
            self.memory_cost,
            self.time_cost,
            self.parallelism,
            Some(KEY_LENGTH),
        )
        .map_err(|e| Error::Crypto(format!("Invalid KDF parameters: {}", e)))?;

        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        Self::standard()
    }
}

/// Derive the vault key from the vault password and the fixed salt.
///
/// # Preconditions
/// - `password` must not be empty
/// - `params` must have valid Argon2id parameters
///
/// # Postconditions
/// - Returns a VaultKey; deterministic given the same inputs, so the key can
///   be re-derived later without stored per-user salt material
///
/// # Errors
/// - Returns error if password is empty
/// - Returns error if Argon2id parameters are invalid
///
/// # Security
/// - Password is not stored or logged
/// - The key zeroizes on drop
pub fn derive_vault_key(
    password: &[u8],
    salt: &FixedSalt,
    params: &KdfParams,
) -> Result<VaultKey> {
    if password.is_empty() {
        return Err(Error::Validation("Password cannot be empty".to_string()));
    }

    let argon2 = params.to_argon2()?;

    let mut key_bytes = [0u8; KEY_LENGTH];
    argon2
        .hash_password_into(password, salt.as_bytes(), &mut key_bytes)
        .map_err(|e| Error::Crypto(format!("Key derivation failed: {}", e)))?;

    Ok(VaultKey::from_bytes(key_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_vault_key_deterministic() {
        let password = b"vault-password-123";
        let salt = FixedSalt::from_bytes([42u8; 16]);
        let params = KdfParams::for_tests();

        let key1 = derive_vault_key(password, &salt, &params).unwrap();
        let key2 = derive_vault_key(password, &salt, &params).unwrap();

        assert_eq!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_derive_vault_key_different_salt() {
        let password = b"vault-password-123";
        let salt1 = FixedSalt::from_bytes([1u8; 16]);
        let salt2 = FixedSalt::from_bytes([2u8; 16]);
        let params = KdfParams::for_tests();

        let key1 = derive_vault_key(password, &salt1, &params).unwrap();
        let key2 = derive_vault_key(password, &salt2, &params).unwrap();

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_derive_vault_key_different_password() {
        let salt = FixedSalt::from_bytes([42u8; 16]);
        let params = KdfParams::for_tests();

        let key1 = derive_vault_key(b"password1", &salt, &params).unwrap();
        let key2 = derive_vault_key(b"password2", &salt, &params).unwrap();

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_derive_vault_key_empty_password_fails() {
        let salt = FixedSalt::from_bytes([42u8; 16]);
        let params = KdfParams::for_tests();

        assert!(derive_vault_key(b"", &salt, &params).is_err());
    }
}
