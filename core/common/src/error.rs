//! Common error types for credvault.

use thiserror::Error;

/// Top-level error type for credvault operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or malformed input, rejected before any cryptographic work.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// An identifier is already registered.
    #[error("Already exists: {0}")]
    Conflict(String),

    /// Unknown identifier or wrong account password.
    /// The two causes are not distinguishable from this value.
    #[error("Invalid credentials")]
    Authentication,

    /// AEAD tag verification failed: wrong vault key or tampered blob.
    /// A routine negative outcome, not a system fault.
    #[error("Cryptographic mismatch")]
    CryptoMismatch,

    /// Required secret material absent or unusable at startup.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A cryptographic primitive failed for a reason other than a mismatch.
    #[error("Cryptographic error: {0}")]
    Crypto(String),

    /// Record store failure.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other unexpected failure, surfaced without internal detail.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using the common Error.
pub type Result<T> = std::result::Result<T, Error>;
