//! In-memory [`KeyValueStore`] for tests and embedding hosts.
//!
//! An optional byte quota emulates browser storage limits: a write that
//! would push the total stored size over the quota fails with
//! `StorageUnavailable` and leaves the previous value in place.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{CoreError, Result};

use super::KeyValueStore;

#[derive(Debug, Default)]
pub struct InMemoryStore {
    values: RwLock<HashMap<String, String>>,
    quota: Option<usize>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(bytes: usize) -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
            quota: Some(bytes),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, String>>> {
        self.values
            .read()
            .map_err(|_| CoreError::StorageUnavailable("store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, String>>> {
        self.values
            .write()
            .map_err(|_| CoreError::StorageUnavailable("store lock poisoned".to_string()))
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.write()?;
        if let Some(quota) = self.quota {
            let others: usize = values
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            if others + key.len() + value.len() > quota {
                return Err(CoreError::StorageUnavailable(format!(
                    "quota of {} bytes exceeded",
                    quota
                )));
            }
        }
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.write()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let store = InMemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v1").unwrap();
        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v2"));
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn test_quota_rejects_and_keeps_old_value() {
        let store = InMemoryStore::with_quota(10);
        store.set("k", "small").unwrap();
        let err = store.set("k", "far too large a value").unwrap_err();
        assert!(matches!(err, CoreError::StorageUnavailable(_)));
        assert_eq!(store.get("k").unwrap().as_deref(), Some("small"));
    }
}
