//! Persistence gateway: versioned save/load of the single state record.
//!
//! `save` overwrites the whole record; there are no partial updates.
//! `load` never fails on malformed content; see [`crate::schema`].

use tracing::debug;

use crate::error::{CoreError, Result};
use crate::schema::{decode, PersistedRecord, CURRENT_SCHEMA_VERSION};
use crate::storage::KeyValueStore;

pub struct PersistenceGateway<S: KeyValueStore> {
    storage: S,
    key: String,
}

impl<S: KeyValueStore> PersistenceGateway<S> {
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Serialize and write the record, stamped with the current schema
    /// version. Returns the number of bytes written.
    pub fn save(&self, record: &PersistedRecord) -> Result<usize> {
        let stamped;
        let record = if record.schema_version == CURRENT_SCHEMA_VERSION {
            record
        } else {
            stamped = PersistedRecord {
                schema_version: CURRENT_SCHEMA_VERSION,
                ..record.clone()
            };
            &stamped
        };
        let text = serde_json::to_string(record).map_err(|e| {
            CoreError::StorageUnavailable(format!("failed to serialize state: {}", e))
        })?;

        self.storage.set(&self.key, &text)?;
        debug!(key = %self.key, bytes = text.len(), "state saved");
        Ok(text.len())
    }

    /// Read and migrate the record. `Ok(None)` when absent or unparsable.
    pub fn load(&self) -> Result<Option<PersistedRecord>> {
        match self.storage.get(&self.key)? {
            Some(text) => Ok(decode(&text)),
            None => Ok(None),
        }
    }

    pub fn clear(&self) -> Result<()> {
        self.storage.remove(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Paragraph, Project};
    use crate::storage::memory::InMemoryStore;
    use crate::store::ParagraphStore;

    fn gateway() -> PersistenceGateway<InMemoryStore> {
        PersistenceGateway::new(InMemoryStore::new(), "state")
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let gw = gateway();
        let record = PersistedRecord {
            project: Project {
                project_name: "P".into(),
                paragraphs: ParagraphStore::from(vec![Paragraph::new("a")]),
                ..Project::default()
            },
            ..PersistedRecord::default()
        };
        gw.save(&record).unwrap();
        assert_eq!(gw.load().unwrap(), Some(record));
    }

    #[test]
    fn test_load_absent_and_malformed() {
        let gw = gateway();
        assert_eq!(gw.load().unwrap(), None);
        gw.storage().set("state", "{{{").unwrap();
        assert_eq!(gw.load().unwrap(), None);
    }

    #[test]
    fn test_save_stamps_version() {
        let gw = gateway();
        let record = PersistedRecord {
            schema_version: 1,
            ..PersistedRecord::default()
        };
        gw.save(&record).unwrap();
        let raw = gw.storage().get("state").unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["schemaVersion"], CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn test_clear_removes_record() {
        let gw = gateway();
        gw.save(&PersistedRecord::default()).unwrap();
        assert!(gw.load().unwrap().is_some());
        gw.clear().unwrap();
        assert_eq!(gw.load().unwrap(), None);
        gw.clear().unwrap();
    }

    #[test]
    fn test_save_overwrites_wholesale() {
        let gw = gateway();
        let mut record = PersistedRecord::default();
        record.project.project_name = "first".into();
        gw.save(&record).unwrap();
        record.project.project_name = "second".into();
        gw.save(&record).unwrap();
        assert_eq!(gw.load().unwrap().unwrap().project.project_name, "second");
    }

    #[test]
    fn test_storage_failure_surfaces() {
        let gw = PersistenceGateway::new(InMemoryStore::with_quota(8), "state");
        let err = gw.save(&PersistedRecord::default()).unwrap_err();
        assert!(matches!(err, CoreError::StorageUnavailable(_)));
    }
}
