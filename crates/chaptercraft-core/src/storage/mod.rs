//! Durable key-value storage abstraction.
//!
//! The [`KeyValueStore`] trait is the only way the core reaches durable
//! storage, enabling pluggable backends (the CLI's file store, the
//! in-memory store, a browser `localStorage` binding).
//!
//! Implementations must be `Send + Sync` so hosts can share them with an
//! async runtime.

pub mod memory;

use crate::error::Result;

/// String-valued storage addressed by key. Writes replace the whole value.
///
/// Failures are reported as
/// [`CoreError::StorageUnavailable`](crate::error::CoreError::StorageUnavailable).
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}
