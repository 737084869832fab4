//! Durable key-value storage.
//!
//! Values are UTF-8 JSON text addressed by a [`StorageKey`]: a partition (global
//! or one user) plus a logical name inside it. Backends never build keys by
//! string concatenation, so a user id can only ever address its own partition.
//!
//! The helpers at the bottom of this module are the only way the state layer
//! touches storage. They are best-effort: failures are logged and swallowed, and
//! the in-memory transition that preceded the write stands.

use std::fmt;

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

pub const SESSION_USER: &str = "user";
pub const DIRECTORY: &str = "users";
pub const CART: &str = "cart";
pub const ORDERS: &str = "orders";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Partition {
    Global,
    User(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StorageKey {
    pub partition: Partition,
    pub name: &'static str,
}

impl StorageKey {
    pub fn global(name: &'static str) -> Self {
        Self {
            partition: Partition::Global,
            name,
        }
    }

    pub fn user(user_id: impl Into<String>, name: &'static str) -> Self {
        Self {
            partition: Partition::User(user_id.into()),
            name,
        }
    }

    pub fn session() -> Self {
        Self::global(SESSION_USER)
    }

    pub fn directory() -> Self {
        Self::global(DIRECTORY)
    }

    pub fn cart(user_id: &str) -> Self {
        Self::user(user_id, CART)
    }

    pub fn orders(user_id: &str) -> Self {
        Self::user(user_id, ORDERS)
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.partition {
            Partition::Global => write!(f, "global/{}", self.name),
            Partition::User(id) => write!(f, "user[{id}]/{}", self.name),
        }
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage quota exceeded: needed {needed} bytes, {available} available")]
    QuotaExceeded { needed: usize, available: usize },

    #[error("storage lock poisoned")]
    Poisoned,
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Synchronous key-value backend. Only one logical writer exists at a time.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &StorageKey) -> StorageResult<Option<String>>;

    fn set(&self, key: &StorageKey, value: String) -> StorageResult<()>;

    fn remove(&self, key: &StorageKey) -> StorageResult<()>;
}

/// Reads and decodes `key`. Missing, unreadable, or malformed entries all
/// come back as `None`.
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &StorageKey) -> Option<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(err) => {
            tracing::warn!(key = %key, error = %err, "storage read failed");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(key = %key, error = %err, "discarding malformed stored value");
            None
        }
    }
}

/// Encodes and writes `value`. Returns whether the write landed.
pub fn persist_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &StorageKey,
    value: &T,
) -> bool {
    let result = serde_json::to_string(value)
        .map_err(StorageError::from)
        .and_then(|raw| store.set(key, raw));
    match result {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(key = %key, error = %err, "storage write failed");
            false
        }
    }
}

pub fn remove_entry(store: &dyn KeyValueStore, key: &StorageKey) -> bool {
    match store.remove(key) {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(key = %key, error = %err, "storage remove failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_partition_by_user() {
        assert_ne!(StorageKey::cart("a"), StorageKey::cart("b"));
        assert_ne!(StorageKey::cart("a"), StorageKey::orders("a"));
        assert_eq!(StorageKey::session().partition, Partition::Global);
        // A user literally named like a global key still lives in its own partition.
        assert_ne!(StorageKey::user("x", SESSION_USER), StorageKey::session());
    }

    #[test]
    fn malformed_values_load_as_absent() {
        let store = MemoryStore::new();
        let key = StorageKey::cart("u1");
        store.set(&key, "{not json".into()).unwrap();
        let loaded: Option<serde_json::Value> = load_json(&store, &key);
        assert!(loaded.is_none());
    }

    #[test]
    fn failed_write_is_reported_not_raised() {
        let store = MemoryStore::with_quota(4);
        let key = StorageKey::orders("u1");
        assert!(!persist_json(&store, &key, &vec!["a long value"; 4]));
        assert!(store.get(&key).unwrap().is_none());
    }
}
