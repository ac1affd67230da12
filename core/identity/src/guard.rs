//! Route guard: vault-password proof by verifier decryption.
//!
//! The guard derives a candidate key from the claimed vault password and
//! attempts to decrypt the verifier blob stored at registration. Successful
//! decryption is the sole proof of knowledge: nothing derived from the real
//! vault password is ever compared directly, so there is no stored value an
//! attacker could replay or the server could leak.

use std::sync::Arc;

use tracing::{debug, info};

use credvault_common::{AccountId, Error, Result, SensitiveString};
use credvault_crypto::{derive_vault_key, FieldCipher};
use credvault_storage::IdentityStore;

use crate::config::IdentityConfig;
use crate::manager::run_blocking;
use crate::session::VaultAccess;

/// Outcome of a vault-unlock attempt.
///
/// A wrong vault password is a value, not an error: only storage and
/// primitive faults surface as `Err`.
#[derive(Debug)]
pub enum VaultGate {
    /// The caller has proven knowledge of the vault password.
    Authorized(VaultAccess),
    /// The claimed vault password failed tag verification.
    Rejected,
}

impl VaultGate {
    /// Check whether this outcome authorizes the caller.
    pub fn is_authorized(&self) -> bool {
        matches!(self, VaultGate::Authorized(_))
    }
}

/// Guards vault-scoped routes for already-authenticated identities.
pub struct RouteGuard {
    store: Arc<dyn IdentityStore>,
    cipher: Arc<dyn FieldCipher>,
    config: IdentityConfig,
}

impl RouteGuard {
    /// Create a guard over the given collaborators.
    pub fn new(
        store: Arc<dyn IdentityStore>,
        cipher: Arc<dyn FieldCipher>,
        config: IdentityConfig,
    ) -> Self {
        Self {
            store,
            cipher,
            config,
        }
    }

    /// Prove vault-password knowledge for an authenticated identity.
    ///
    /// Runs in three steps: fetch the identity record, derive a candidate
    /// key (total: it cannot reject a candidate on its own), then attempt
    /// the verifier decryption that decides the outcome.
    ///
    /// # Postconditions
    /// - On `Authorized`, the proven vault password is handed to the
    ///   caller's transient state via [`VaultAccess`]; the candidate key is
    ///   cleared before returning on every path
    ///
    /// # Errors
    /// - `Error::Validation` on an empty claimed password, before any
    ///   derivation work
    /// - `Error::NotFound` if the identity does not exist
    /// - `Error::Storage` / `Error::Internal` on genuine faults
    pub async fn unlock(
        &self,
        account_id: AccountId,
        claimed_password: SensitiveString,
    ) -> Result<VaultGate> {
        if claimed_password.is_empty() {
            return Err(Error::Validation("Vault password is required".to_string()));
        }

        let record = self
            .store
            .find_by_id(&account_id)
            .await?
            .ok_or_else(|| Error::NotFound("Account not found".to_string()))?;

        let cipher = Arc::clone(&self.cipher);
        let config = self.config.clone();
        let verifier_cipher = record.verifier_cipher;

        let proven = run_blocking(move || {
            let candidate_key = derive_vault_key(
                claimed_password.as_bytes(),
                config.fixed_salt(),
                config.kdf_params(),
            )?;

            let attempt = cipher.decrypt(&verifier_cipher, &candidate_key);
            drop(candidate_key);

            match attempt {
                Ok(_) => Ok(Some(claimed_password)),
                // The routine wrong-password outcome, converted to a value
                // at the point of computation.
                Err(Error::CryptoMismatch) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await?;

        match proven {
            Some(vault_password) => {
                info!(account_id = %account_id, "Vault unlocked");
                Ok(VaultGate::Authorized(VaultAccess::new(
                    account_id,
                    vault_password,
                )))
            }
            None => {
                debug!(account_id = %account_id, "Vault unlock rejected");
                Ok(VaultGate::Rejected)
            }
        }
    }
}
