//! Cryptographic primitives for credvault.
//!
//! This module provides:
//! - Vault-key derivation and deterministic lookup hashing using Argon2id
//! - Account password hashing in PHC string format
//! - Authenticated field encryption using ChaCha20-Poly1305
//! - Secure key management with automatic zeroization
//!
//! # Security Guarantees
//! - All key material is automatically zeroized on drop
//! - No plaintext or key material is ever logged
//! - Tag-verification failure is reported as a mismatch, never a panic

pub mod aead;
pub mod kdf;
pub mod keys;
pub mod lookup;
pub mod password;

pub use aead::{ChaChaFieldCipher, FieldCipher, NONCE_SIZE, TAG_SIZE};
pub use kdf::{derive_vault_key, KdfParams};
pub use keys::{FixedSalt, VaultKey, KEY_LENGTH, SALT_LENGTH};
pub use lookup::lookup_hash;
pub use password::{Argon2SecretHasher, SecretHasher};
