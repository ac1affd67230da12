//! Identity record model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use credvault_common::AccountId;

/// One registered user's persistent record.
///
/// Identifier plaintext never appears here: `username_cipher` and
/// `email_cipher` are decryptable only with the vault key, while
/// `username_hash` and `email_hash` exist solely for equality lookup.
/// `verifier_cipher` holds a random value whose successful decryption is
/// the proof of vault-password knowledge. The vault password itself, and
/// the key derived from it, are never stored in any field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityRecord {
    /// Opaque unique identifier, assigned at creation, immutable.
    pub account_id: AccountId,
    /// AEAD blob of the plaintext username.
    pub username_cipher: String,
    /// AEAD blob of the plaintext email.
    pub email_cipher: String,
    /// Deterministic hash of the lowercased username; globally unique.
    pub username_hash: String,
    /// Deterministic hash of the lowercased email; globally unique.
    pub email_hash: String,
    /// PHC-encoded hash of the account login secret; verified, never decoded.
    pub password_hash: String,
    /// AEAD blob of the random verifier generated once at registration.
    pub verifier_cipher: String,
    /// Descriptive attribute, stored in plain form.
    pub timezone: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Updated on each successful login.
    pub last_login_at: Option<DateTime<Utc>>,
}

impl IdentityRecord {
    /// Check whether either lookup hash matches.
    pub fn matches_hash(&self, hash: &str) -> bool {
        self.username_hash == hash || self.email_hash == hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serialization() {
        let record = IdentityRecord {
            account_id: AccountId::new(),
            username_cipher: "blob-a".to_string(),
            email_cipher: "blob-b".to_string(),
            username_hash: "hash-a".to_string(),
            email_hash: "hash-b".to_string(),
            password_hash: "$argon2id$v=19$m=8192,t=1,p=1$c2FsdA$aGFzaA".to_string(),
            verifier_cipher: "blob-c".to_string(),
            timezone: "Europe/Vienna".to_string(),
            created_at: Utc::now(),
            last_login_at: None,
        };

        let json = serde_json::to_string(&record).unwrap();
        let restored: IdentityRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.account_id, record.account_id);
        assert_eq!(restored.username_hash, record.username_hash);
        assert_eq!(restored.last_login_at, None);
    }

    #[test]
    fn test_matches_hash() {
        let record = IdentityRecord {
            account_id: AccountId::new(),
            username_cipher: String::new(),
            email_cipher: String::new(),
            username_hash: "hash-a".to_string(),
            email_hash: "hash-b".to_string(),
            password_hash: String::new(),
            verifier_cipher: String::new(),
            timezone: String::new(),
            created_at: Utc::now(),
            last_login_at: None,
        };

        assert!(record.matches_hash("hash-a"));
        assert!(record.matches_hash("hash-b"));
        assert!(!record.matches_hash("hash-c"));
    }
}
