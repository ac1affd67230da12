//! In-memory identity store for testing and embedding.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::record::IdentityRecord;
use crate::store::IdentityStore;
use credvault_common::{AccountId, Error, Result};

/// In-memory identity store.
///
/// All data is held in memory and lost on drop. Both lookup hashes are
/// checked and claimed under a single write lock, so concurrent inserts of
/// the same identifier resolve to exactly one success and one conflict,
/// the same guarantee a durable backend provides with unique indexes.
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Default)]
struct Inner {
    records: HashMap<AccountId, IdentityRecord>,
    hash_index: HashMap<String, AccountId>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner::default())),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityStore for MemoryStore {
    async fn insert(&self, record: IdentityRecord) -> Result<()> {
        let mut inner = self.inner.write().unwrap();

        if inner.hash_index.contains_key(&record.username_hash)
            || inner.hash_index.contains_key(&record.email_hash)
        {
            return Err(Error::Conflict("Identifier already registered".to_string()));
        }

        inner
            .hash_index
            .insert(record.username_hash.clone(), record.account_id);
        inner
            .hash_index
            .insert(record.email_hash.clone(), record.account_id);
        inner.records.insert(record.account_id, record);

        Ok(())
    }

    async fn find_by_lookup_hash(&self, hash: &str) -> Result<Option<IdentityRecord>> {
        let inner = self.inner.read().unwrap();

        let record = inner
            .hash_index
            .get(hash)
            .and_then(|id| inner.records.get(id))
            .cloned();

        Ok(record)
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<IdentityRecord>> {
        let inner = self.inner.read().unwrap();
        Ok(inner.records.get(id).cloned())
    }

    async fn contains_hash(&self, hash: &str) -> Result<bool> {
        let inner = self.inner.read().unwrap();
        Ok(inner.hash_index.contains_key(hash))
    }

    async fn record_login(&self, id: &AccountId, at: DateTime<Utc>) -> Result<()> {
        let mut inner = self.inner.write().unwrap();

        match inner.records.get_mut(id) {
            Some(record) => {
                record.last_login_at = Some(at);
                Ok(())
            }
            None => Err(Error::NotFound("Account not found".to_string())),
        }
    }
}
