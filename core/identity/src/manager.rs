//! Identity manager: registration and login workflows.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use credvault_common::{AccountId, Error, Result, SensitiveString};
use credvault_crypto::{derive_vault_key, lookup_hash, FieldCipher, SecretHasher};
use credvault_storage::{IdentityRecord, IdentityStore};

use crate::config::IdentityConfig;
use crate::session::{Session, SessionIssuer};

/// Input for the registration workflow.
#[derive(Debug)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    /// Account login secret.
    pub password: SensitiveString,
    /// Vault secret; must differ from the account password.
    pub vault_password: SensitiveString,
    pub timezone: String,
}

/// Input for the login workflow.
#[derive(Debug)]
pub struct LoginRequest {
    /// Username or email; both live in the same lookup space.
    pub identifier: String,
    pub password: SensitiveString,
}

/// Orchestrates registration and login over injected collaborators.
///
/// Stateless per invocation; safe to share across concurrent requests.
pub struct IdentityManager {
    store: Arc<dyn IdentityStore>,
    issuer: Arc<dyn SessionIssuer>,
    hasher: Arc<dyn SecretHasher>,
    cipher: Arc<dyn FieldCipher>,
    config: IdentityConfig,
}

impl IdentityManager {
    /// Create a manager over the given collaborators.
    pub fn new(
        store: Arc<dyn IdentityStore>,
        issuer: Arc<dyn SessionIssuer>,
        hasher: Arc<dyn SecretHasher>,
        cipher: Arc<dyn FieldCipher>,
        config: IdentityConfig,
    ) -> Self {
        Self {
            store,
            issuer,
            hasher,
            cipher,
            config,
        }
    }

    /// Register a new account.
    ///
    /// # Preconditions
    /// - All fields present; account password and vault password differ
    ///
    /// # Postconditions
    /// - Exactly one identity record persisted, or none on any failure
    /// - Neither the vault password nor the derived key outlives the call
    ///
    /// # Errors
    /// - `Error::Validation` on missing input or equal secrets
    /// - `Error::Conflict` if either identifier is already registered,
    ///   whether caught by the pre-check or by the store's constraint
    pub async fn register(&self, account: NewAccount) -> Result<Session> {
        let NewAccount {
            username,
            email,
            password,
            vault_password,
            timezone,
        } = account;

        if username.trim().is_empty() {
            return Err(Error::Validation("Username is required".to_string()));
        }
        if email.trim().is_empty() {
            return Err(Error::Validation("Email is required".to_string()));
        }
        if timezone.trim().is_empty() {
            return Err(Error::Validation("Timezone is required".to_string()));
        }
        if password.is_empty() {
            return Err(Error::Validation("Password is required".to_string()));
        }
        if vault_password.is_empty() {
            return Err(Error::Validation("Vault password is required".to_string()));
        }
        if password.as_str() == vault_password.as_str() {
            return Err(Error::Validation(
                "Vault password must differ from the account password".to_string(),
            ));
        }

        let (username_hash, email_hash) = {
            let config = self.config.clone();
            let folded_username = username.to_lowercase();
            let folded_email = email.to_lowercase();

            run_blocking(move || {
                let username_hash =
                    lookup_hash(&folded_username, config.fixed_salt(), config.kdf_params())?;
                let email_hash =
                    lookup_hash(&folded_email, config.fixed_salt(), config.kdf_params())?;
                Ok((username_hash, email_hash))
            })
            .await?
        };

        // Advisory pre-check; two concurrent registrations may both pass it,
        // and the store's uniqueness constraint decides the loser.
        if self.store.contains_hash(&username_hash).await?
            || self.store.contains_hash(&email_hash).await?
        {
            return Err(Error::Conflict("Identifier already registered".to_string()));
        }

        let record = {
            let hasher = Arc::clone(&self.hasher);
            let cipher = Arc::clone(&self.cipher);
            let config = self.config.clone();
            let username = username.clone();

            run_blocking(move || {
                let password_hash = hasher.hash(password.as_str())?;

                let vault_key = derive_vault_key(
                    vault_password.as_bytes(),
                    config.fixed_salt(),
                    config.kdf_params(),
                )?;

                let verifier = Uuid::new_v4().to_string();

                let username_cipher = cipher.encrypt(&username, &vault_key)?;
                let email_cipher = cipher.encrypt(&email, &vault_key)?;
                let verifier_cipher = cipher.encrypt(&verifier, &vault_key)?;

                // Key and plaintext secrets zeroize before the record leaves
                // this closure; error paths above zeroize at scope end.
                drop(vault_key);
                drop(password);
                drop(vault_password);

                Ok(IdentityRecord {
                    account_id: AccountId::new(),
                    username_cipher,
                    email_cipher,
                    username_hash,
                    email_hash,
                    password_hash,
                    verifier_cipher,
                    timezone,
                    created_at: Utc::now(),
                    last_login_at: None,
                })
            })
            .await?
        };

        let account_id = record.account_id;
        self.store.insert(record).await?;

        let token = self.issuer.issue(&account_id, Some(&username)).await?;

        info!(account_id = %account_id, "Account registered");
        Ok(Session { account_id, token })
    }

    /// Authenticate an account and issue a session.
    ///
    /// Unknown identifier and wrong password produce the same
    /// `Error::Authentication`; the vault key and verifier are never
    /// touched here.
    pub async fn login(&self, request: LoginRequest) -> Result<Session> {
        let LoginRequest {
            identifier,
            password,
        } = request;

        if identifier.trim().is_empty() {
            return Err(Error::Validation("Identifier is required".to_string()));
        }
        if password.is_empty() {
            return Err(Error::Validation("Password is required".to_string()));
        }

        let hash = {
            let config = self.config.clone();
            let folded = identifier.to_lowercase();

            run_blocking(move || lookup_hash(&folded, config.fixed_salt(), config.kdf_params()))
                .await?
        };

        let record = match self.store.find_by_lookup_hash(&hash).await? {
            Some(record) => record,
            None => {
                debug!("Login rejected: unknown identifier");
                return Err(Error::Authentication);
            }
        };

        let verified = {
            let hasher = Arc::clone(&self.hasher);
            let encoded = record.password_hash.clone();

            run_blocking(move || {
                let ok = hasher.verify(&encoded, password.as_str());
                drop(password);
                Ok(ok)
            })
            .await?
        };

        if !verified {
            debug!(account_id = %record.account_id, "Login rejected: password mismatch");
            return Err(Error::Authentication);
        }

        self.store.record_login(&record.account_id, Utc::now()).await?;

        let token = self.issuer.issue(&record.account_id, None).await?;

        info!(account_id = %record.account_id, "Login succeeded");
        Ok(Session {
            account_id: record.account_id,
            token,
        })
    }
}

/// Run memory-hard work on the blocking pool.
///
/// Derivations cost tens of milliseconds and a 64 MiB working set at
/// production parameters; they must not stall an async scheduler thread.
pub(crate) async fn run_blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| Error::Internal(format!("Blocking task failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IdentityConfig;
    use crate::session::StaticSessionIssuer;
    use credvault_common::SensitiveBytes;
    use credvault_crypto::{Argon2SecretHasher, ChaChaFieldCipher, KdfParams};
    use credvault_storage::MemoryStore;

    fn test_manager() -> (IdentityManager, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let secret = SensitiveBytes::new(b"test-application-secret".to_vec());
        let config = IdentityConfig::new(&secret, KdfParams::for_tests()).unwrap();

        let manager = IdentityManager::new(
            store.clone(),
            Arc::new(StaticSessionIssuer),
            Arc::new(Argon2SecretHasher::new(KdfParams::for_tests())),
            Arc::new(ChaChaFieldCipher),
            config,
        );

        (manager, store)
    }

    fn alice() -> NewAccount {
        NewAccount {
            username: "alice".to_string(),
            email: "alice@x.com".to_string(),
            password: SensitiveString::new("Passw0rd!"),
            vault_password: SensitiveString::new("VaultPass123!"),
            timezone: "Europe/Vienna".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_persists_record() {
        let (manager, store) = test_manager();

        let session = manager.register(alice()).await.unwrap();

        let record = store
            .find_by_id(&session.account_id)
            .await
            .unwrap()
            .expect("record persisted");

        assert!(!record.username_cipher.is_empty());
        assert!(!record.email_cipher.is_empty());
        assert!(!record.verifier_cipher.is_empty());
        assert!(record.password_hash.starts_with("$argon2id$"));
        assert_eq!(record.timezone, "Europe/Vienna");
        assert!(record.last_login_at.is_none());
    }

    #[tokio::test]
    async fn test_register_stores_no_plaintext() {
        let (manager, store) = test_manager();

        let session = manager.register(alice()).await.unwrap();
        let record = store.find_by_id(&session.account_id).await.unwrap().unwrap();

        let dump = serde_json::to_string(&record).unwrap();
        assert!(!dump.contains("alice@x.com"));
        assert!(!dump.contains("Passw0rd!"));
        assert!(!dump.contains("VaultPass123!"));
    }

    #[tokio::test]
    async fn test_register_rejects_equal_secrets() {
        let (manager, _) = test_manager();

        let mut account = alice();
        account.vault_password = SensitiveString::new("Passw0rd!");

        let result = manager.register(account).await;
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn test_register_rejects_missing_fields() {
        let (manager, _) = test_manager();

        let mut account = alice();
        account.email = "  ".to_string();

        let result = manager.register(account).await;
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn test_register_duplicate_username_conflicts() {
        let (manager, _) = test_manager();

        manager.register(alice()).await.unwrap();

        // Same username, different case and email.
        let mut dup = alice();
        dup.username = "Alice".to_string();
        dup.email = "other@x.com".to_string();

        let result = manager.register(dup).await;
        assert!(matches!(result, Err(Error::Conflict(_))));
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflicts() {
        let (manager, _) = test_manager();

        manager.register(alice()).await.unwrap();

        let mut dup = alice();
        dup.username = "bob".to_string();

        let result = manager.register(dup).await;
        assert!(matches!(result, Err(Error::Conflict(_))));
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_registration() {
        let (manager, _) = test_manager();

        let mut second = alice();
        second.email = "alice2@x.com".to_string();

        let (a, b) = tokio::join!(manager.register(alice()), manager.register(second));

        let successes = [&a, &b].iter().filter(|r| r.is_ok()).count();
        let conflicts = [&a, &b]
            .iter()
            .filter(|r| matches!(r, Err(Error::Conflict(_))))
            .count();

        assert_eq!(successes, 1);
        assert_eq!(conflicts, 1);
    }

    #[tokio::test]
    async fn test_login_with_username() {
        let (manager, store) = test_manager();
        let registered = manager.register(alice()).await.unwrap();

        let session = manager
            .login(LoginRequest {
                identifier: "alice".to_string(),
                password: SensitiveString::new("Passw0rd!"),
            })
            .await
            .unwrap();

        assert_eq!(session.account_id, registered.account_id);

        let record = store.find_by_id(&session.account_id).await.unwrap().unwrap();
        assert!(record.last_login_at.is_some());
    }

    #[tokio::test]
    async fn test_login_with_email_and_case_folding() {
        let (manager, _) = test_manager();
        manager.register(alice()).await.unwrap();

        let session = manager
            .login(LoginRequest {
                identifier: "Alice@X.com".to_string(),
                password: SensitiveString::new("Passw0rd!"),
            })
            .await;

        assert!(session.is_ok());
    }

    #[tokio::test]
    async fn test_login_wrong_password_leaves_record_unchanged() {
        let (manager, store) = test_manager();
        let registered = manager.register(alice()).await.unwrap();

        let result = manager
            .login(LoginRequest {
                identifier: "alice".to_string(),
                password: SensitiveString::new("wrong"),
            })
            .await;

        assert!(matches!(result, Err(Error::Authentication)));

        let record = store
            .find_by_id(&registered.account_id)
            .await
            .unwrap()
            .unwrap();
        assert!(record.last_login_at.is_none());
    }

    #[tokio::test]
    async fn test_login_unknown_identifier_is_same_failure() {
        let (manager, _) = test_manager();

        let result = manager
            .login(LoginRequest {
                identifier: "nobody".to_string(),
                password: SensitiveString::new("whatever"),
            })
            .await;

        assert!(matches!(result, Err(Error::Authentication)));
    }
}
