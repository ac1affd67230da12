//! Deterministic hashing for equality lookup.
//!
//! Identifiers are hashed under the fixed application-wide salt so equal
//! inputs always produce equal digests. This is the opposite of normal
//! password-hashing practice: the output serves as an exact-match index and
//! is never decoded back to plaintext.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::kdf::KdfParams;
use crate::keys::FixedSalt;
use credvault_common::{Error, Result};

/// Digest length of a lookup hash in bytes.
pub const LOOKUP_DIGEST_LENGTH: usize = 32;

/// Hash a case-folded identifier for exact-match lookup.
///
/// The caller lowercases the input before hashing. Runs full Argon2id at
/// the supplied parameters, so each call costs as much as a password
/// verification.
///
/// # Postconditions
/// - Same `(input, salt, params)` always yields the same output, across
///   calls and across process restarts
/// - Output is base64 of a 32-byte digest
/// - Empty input maps to an empty string ("no value", not an error)
///
/// # Errors
/// - Returns error if Argon2id parameters are invalid
pub fn lookup_hash(input: &str, salt: &FixedSalt, params: &KdfParams) -> Result<String> {
    if input.is_empty() {
        return Ok(String::new());
    }

    let argon2 = params.to_argon2()?;

    let mut digest = [0u8; LOOKUP_DIGEST_LENGTH];
    argon2
        .hash_password_into(input.as_bytes(), salt.as_bytes(), &mut digest)
        .map_err(|e| Error::Crypto(format!("Lookup hash failed: {}", e)))?;

    Ok(STANDARD.encode(digest))
}
