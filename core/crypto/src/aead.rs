//! Authenticated encryption of stored fields using ChaCha20-Poly1305.
//!
//! Each blob is a single base64 string carrying nonce, ciphertext, and
//! Poly1305 tag. The 12-byte nonce is freshly random per encryption, so
//! encrypting the same field twice yields different blobs.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chacha20poly1305::{
    aead::{generic_array::GenericArray, Aead, AeadCore, KeyInit, OsRng},
    ChaCha20Poly1305,
};

use crate::keys::VaultKey;
use credvault_common::{Error, Result};

/// Nonce size for ChaCha20-Poly1305 (12 bytes).
pub const NONCE_SIZE: usize = 12;

/// Authentication tag size (16 bytes).
pub const TAG_SIZE: usize = 16;

/// Capability interface for field encryption.
///
/// Injected into the workflows so tests can substitute implementations.
pub trait FieldCipher: Send + Sync {
    /// Encrypt a field under the vault key.
    ///
    /// Empty plaintext maps to an empty blob.
    fn encrypt(&self, plaintext: &str, key: &VaultKey) -> Result<String>;

    /// Decrypt a blob under the vault key.
    ///
    /// Fails with [`Error::CryptoMismatch`] whenever the key is wrong or the
    /// blob was tampered with; that is the routine outcome for a wrong vault
    /// password, not a system fault. Empty blob maps to empty plaintext.
    fn decrypt(&self, blob: &str, key: &VaultKey) -> Result<String>;
}

/// ChaCha20-Poly1305 implementation of [`FieldCipher`].
///
/// Blob layout: base64(nonce[12] || ciphertext || tag[16]).
pub struct ChaChaFieldCipher;

impl FieldCipher for ChaChaFieldCipher {
    fn encrypt(&self, plaintext: &str, key: &VaultKey) -> Result<String> {
        if plaintext.is_empty() {
            return Ok(String::new());
        }

        let cipher = ChaCha20Poly1305::new(GenericArray::from_slice(key.as_bytes()));
        let nonce = ChaCha20Poly1305::generate_nonce(&mut OsRng);

        let ciphertext = cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|e| Error::Crypto(format!("Encryption failed: {}", e)))?;

        // Prepend nonce to ciphertext
        let mut blob = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        blob.extend_from_slice(&nonce);
        blob.extend_from_slice(&ciphertext);

        Ok(STANDARD.encode(blob))
    }

    fn decrypt(&self, blob: &str, key: &VaultKey) -> Result<String> {
        if blob.is_empty() {
            return Ok(String::new());
        }

        let decoded = STANDARD
            .decode(blob)
            .map_err(|e| Error::Crypto(format!("Invalid blob encoding: {}", e)))?;

        if decoded.len() < NONCE_SIZE + TAG_SIZE {
            return Err(Error::Crypto("Blob too short".to_string()));
        }

        let (nonce_bytes, encrypted) = decoded.split_at(NONCE_SIZE);
        let cipher = ChaCha20Poly1305::new(GenericArray::from_slice(key.as_bytes()));

        let plaintext = cipher
            .decrypt(GenericArray::from_slice(nonce_bytes), encrypted)
            .map_err(|_| Error::CryptoMismatch)?;

        String::from_utf8(plaintext)
            .map_err(|_| Error::Crypto("Decrypted field is not valid UTF-8".to_string()))
    }
}
