//! Identity store trait definition.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::record::IdentityRecord;
use credvault_common::{AccountId, Result};

/// Keyed record store for identity records.
///
/// Implementations own durability and must enforce the lookup-hash
/// uniqueness constraints atomically: the registration workflow's
/// check-then-insert pre-check is advisory, and the losing side of a
/// concurrent insert must surface as a conflict, not as a second record.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Insert a new record.
    ///
    /// # Postconditions
    /// - All-or-nothing: on any error, no partial record is left behind
    ///
    /// # Errors
    /// - `Error::Conflict` if either lookup hash is already present
    /// - `Error::Storage` on backend failure
    async fn insert(&self, record: IdentityRecord) -> Result<()>;

    /// Find the record whose username or email hash equals `hash`.
    ///
    /// Username and email hashes share one lookup space, so a single hash
    /// matches whichever column holds it.
    async fn find_by_lookup_hash(&self, hash: &str) -> Result<Option<IdentityRecord>>;

    /// Find a record by account id.
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<IdentityRecord>>;

    /// Check whether a lookup hash is already registered.
    async fn contains_hash(&self, hash: &str) -> Result<bool>;

    /// Set `last_login_at` for an account.
    ///
    /// # Errors
    /// - `Error::NotFound` if the account does not exist
    async fn record_login(&self, id: &AccountId, at: DateTime<Utc>) -> Result<()>;
}
