//! User document store
//!
//! A small document store for signup records. Records live in memory
//! behind a RwLock and are mirrored to a single JSON document written
//! atomically, so a crash mid-write never corrupts the store.
//!
//! Username uniqueness is enforced inside the write lock: concurrent
//! signups with the same username serialize and the loser gets
//! `DuplicateUsername`.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use atomicwrites::{AtomicFile, OverwriteBehavior::AllowOverwrite};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::password::{hash_password, verify_password};
use edurec_core::{Error, Result};

/// A stored user document. The password field holds a PHC hash, never the
/// supplied password.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserRecord {
    pub id: Uuid,
    pub fullname: String,
    pub dob: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub mobile: String,
    pub created_at: DateTime<Utc>,
}

/// Signup form input, password still in the clear.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub fullname: String,
    pub dob: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub mobile: String,
}

/// Store of user records keyed by username.
pub struct UserStore {
    users: RwLock<HashMap<String, UserRecord>>,
    path: Option<PathBuf>,
}

impl UserStore {
    /// Open the store backed by `dir/users.json`, loading any existing
    /// records.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let path = dir.join("users.json");

        let users = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            let records: Vec<UserRecord> = serde_json::from_str(&raw)?;
            debug!("Loaded {} user records from {:?}", records.len(), path);
            records
                .into_iter()
                .map(|r| (r.username.clone(), r))
                .collect()
        } else {
            HashMap::new()
        };

        Ok(Self {
            users: RwLock::new(users),
            path: Some(path),
        })
    }

    /// In-memory store with no persistence, for tests.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            path: None,
        }
    }

    /// Insert a signup record.
    ///
    /// Validates required fields, hashes the password, and enforces
    /// username uniqueness while holding the write lock.
    pub fn insert_one(&self, new: NewUser) -> Result<UserRecord> {
        if new.username.trim().is_empty() {
            return Err(Error::InvalidInput("username must not be empty".to_string()));
        }
        if new.email.trim().is_empty() || !new.email.contains('@') {
            return Err(Error::InvalidInput(format!(
                "invalid email address: {}",
                new.email
            )));
        }

        let password_hash = hash_password(&new.password)?;
        let record = UserRecord {
            id: Uuid::new_v4(),
            fullname: new.fullname,
            dob: new.dob,
            username: new.username,
            email: new.email,
            password_hash,
            mobile: new.mobile,
            created_at: Utc::now(),
        };

        let mut users = self.users.write();
        if users.contains_key(&record.username) {
            return Err(Error::DuplicateUsername(record.username));
        }
        users.insert(record.username.clone(), record.clone());
        // A record that failed to persist must not stay visible, or a
        // signup reported as failed could still log in until restart.
        if let Err(e) = self.persist(&users) {
            users.remove(&record.username);
            return Err(e);
        }

        Ok(record)
    }

    /// Look up a record by username.
    pub fn find_one(&self, username: &str) -> Option<UserRecord> {
        self.users.read().get(username).cloned()
    }

    /// Verify a login attempt. `Ok(None)` covers both unknown usernames
    /// and wrong passwords, so callers cannot distinguish the two.
    pub fn verify_login(&self, username: &str, password: &str) -> Result<Option<UserRecord>> {
        let Some(record) = self.find_one(username) else {
            return Ok(None);
        };
        if verify_password(password, &record.password_hash)? {
            Ok(Some(record))
        } else {
            Ok(None)
        }
    }

    #[inline]
    #[must_use]
    pub fn count(&self) -> usize {
        self.users.read().len()
    }

    /// Write the full record set atomically. Called under the write lock
    /// so concurrent mutations serialize.
    fn persist(&self, users: &HashMap<String, UserRecord>) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let mut records: Vec<&UserRecord> = users.values().collect();
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        let json = serde_json::to_string_pretty(&records)?;

        AtomicFile::new(path, AllowOverwrite)
            .write(|f| f.write_all(json.as_bytes()))
            .map_err(|e| Error::Storage(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> NewUser {
        NewUser {
            fullname: "Alice Example".to_string(),
            dob: "1999-04-12".to_string(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "s3cret-passphrase".to_string(),
            mobile: "5550100".to_string(),
        }
    }

    #[test]
    fn test_insert_and_find() {
        let store = UserStore::in_memory();
        let record = store.insert_one(alice()).unwrap();
        assert_eq!(record.username, "alice");
        assert_ne!(record.password_hash, "s3cret-passphrase");

        let found = store.find_one("alice").unwrap();
        assert_eq!(found, record);
        assert!(store.find_one("bob").is_none());
    }

    #[test]
    fn test_duplicate_username_rejected_first_record_unchanged() {
        let store = UserStore::in_memory();
        let first = store.insert_one(alice()).unwrap();

        let mut second = alice();
        second.email = "other@example.com".to_string();
        let err = store.insert_one(second).unwrap_err();
        assert!(matches!(err, Error::DuplicateUsername(u) if u == "alice"));

        // The original record is untouched.
        assert_eq!(store.find_one("alice").unwrap(), first);
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_verify_login() {
        let store = UserStore::in_memory();
        store.insert_one(alice()).unwrap();

        assert!(store
            .verify_login("alice", "s3cret-passphrase")
            .unwrap()
            .is_some());
        assert!(store.verify_login("alice", "wrong").unwrap().is_none());
        assert!(store.verify_login("nobody", "whatever").unwrap().is_none());
    }

    #[test]
    fn test_failed_persist_rolls_back_insert() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = UserStore::open(temp_dir.path()).unwrap();
        // Removing the backing directory makes the atomic write fail.
        drop(temp_dir);

        assert!(store.insert_one(alice()).is_err());
        assert!(store.find_one("alice").is_none());
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn test_invalid_input_rejected() {
        let store = UserStore::in_memory();

        let mut blank = alice();
        blank.username = "  ".to_string();
        assert!(store.insert_one(blank).is_err());

        let mut bad_email = alice();
        bad_email.email = "not-an-email".to_string();
        assert!(store.insert_one(bad_email).is_err());
    }

    #[test]
    fn test_persistence_reopen() {
        let temp_dir = tempfile::tempdir().unwrap();

        {
            let store = UserStore::open(temp_dir.path()).unwrap();
            store.insert_one(alice()).unwrap();
        }

        // Reopen (simulates restart) and verify the record survived.
        let store = UserStore::open(temp_dir.path()).unwrap();
        assert_eq!(store.count(), 1);
        let record = store.find_one("alice").unwrap();
        assert!(store
            .verify_login("alice", "s3cret-passphrase")
            .unwrap()
            .is_some());
        assert_eq!(record.email, "alice@example.com");
    }
}
