//! Identity service configuration.
//!
//! The fixed salt and KDF parameters are constructed once at startup from
//! the application-wide secret and passed into each component. A missing or
//! undersized secret fails fast here instead of surfacing lazily on the
//! first request.

use credvault_common::{Error, Result, SensitiveBytes};
use credvault_crypto::{FixedSalt, KdfParams};

/// Environment variable holding the application-wide secret.
pub const APP_SECRET_VAR: &str = "CREDVAULT_APP_SECRET";

/// Minimum accepted secret length in bytes.
pub const MIN_SECRET_LENGTH: usize = 16;

/// Validated configuration for the identity workflows.
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    fixed_salt: FixedSalt,
    kdf_params: KdfParams,
}

impl IdentityConfig {
    /// Build a configuration from the application-wide secret.
    ///
    /// # Postconditions
    /// - The fixed salt is derived from the secret; the same secret always
    ///   yields the same salt
    ///
    /// # Errors
    /// - `Error::Configuration` if the secret is shorter than
    ///   [`MIN_SECRET_LENGTH`] bytes
    pub fn new(app_secret: &SensitiveBytes, kdf_params: KdfParams) -> Result<Self> {
        if app_secret.len() < MIN_SECRET_LENGTH {
            return Err(Error::Configuration(format!(
                "Application secret must be at least {} bytes",
                MIN_SECRET_LENGTH
            )));
        }

        Ok(Self {
            fixed_salt: FixedSalt::derive(app_secret.as_bytes()),
            kdf_params,
        })
    }

    /// Build a configuration from [`APP_SECRET_VAR`] with production KDF
    /// parameters.
    ///
    /// # Errors
    /// - `Error::Configuration` if the variable is absent or too short
    pub fn from_env() -> Result<Self> {
        let secret = std::env::var(APP_SECRET_VAR)
            .map_err(|_| Error::Configuration(format!("{} is not set", APP_SECRET_VAR)))?;

        let secret = SensitiveBytes::new(secret.into_bytes());
        Self::new(&secret, KdfParams::standard())
    }

    /// Get the fixed application-wide salt.
    pub fn fixed_salt(&self) -> &FixedSalt {
        &self.fixed_salt
    }

    /// Get the KDF parameters.
    pub fn kdf_params(&self) -> &KdfParams {
        &self.kdf_params
    }
}
