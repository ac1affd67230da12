//! Session issuance and transient vault access.
//!
//! Token issuance is an external collaborator: the workflows hand over an
//! identity and receive an opaque bearer credential. How that credential is
//! minted and verified at the edge is outside this core.

use async_trait::async_trait;
use std::fmt;
use uuid::Uuid;

use credvault_common::{AccountId, Result, SensitiveString};

/// Opaque bearer credential returned by the session issuer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap an issued credential.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Get the credential string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Result of a successful registration or login.
#[derive(Debug, Clone)]
pub struct Session {
    pub account_id: AccountId,
    pub token: SessionToken,
}

/// External collaborator that issues bearer credentials for an identity.
///
/// Registration supplies the just-validated plaintext username; login
/// cannot (the stored copy is encrypted under the vault key) and passes
/// `None`.
#[async_trait]
pub trait SessionIssuer: Send + Sync {
    /// Issue a credential scoped to the given identity.
    async fn issue(&self, account_id: &AccountId, username: Option<&str>) -> Result<SessionToken>;
}

/// Issuer handing out random opaque tokens, for tests and embedding.
pub struct StaticSessionIssuer;

#[async_trait]
impl SessionIssuer for StaticSessionIssuer {
    async fn issue(
        &self,
        _account_id: &AccountId,
        _username: Option<&str>,
    ) -> Result<SessionToken> {
        Ok(SessionToken::new(Uuid::new_v4().to_string()))
    }
}

/// Proof of vault-password knowledge for one authenticated identity.
///
/// Holds the proven vault password for the caller's transient session
/// state, so per-record encrypt/decrypt calls don't repeat the guard's
/// derivation. Never persisted; the password zeroizes when this value is
/// dropped.
pub struct VaultAccess {
    account_id: AccountId,
    vault_password: SensitiveString,
}

impl VaultAccess {
    pub(crate) fn new(account_id: AccountId, vault_password: SensitiveString) -> Self {
        Self {
            account_id,
            vault_password,
        }
    }

    /// The identity this access was proven for.
    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    /// The proven vault password.
    ///
    /// # Security
    /// Use immediately for key re-derivation; do not copy out of the
    /// wrapper or write anywhere durable.
    pub fn vault_password(&self) -> &SensitiveString {
        &self.vault_password
    }
}

impl fmt::Debug for VaultAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaultAccess")
            .field("account_id", &self.account_id)
            .field("vault_password", &"[REDACTED]")
            .finish()
    }
}
