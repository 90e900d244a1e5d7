//! File-backed key-value storage.
//!
//! Each key is stored as `<dir>/<key>.json`. Writes go to a sibling
//! temporary file which is then renamed over the target, so a crash
//! mid-write never leaves a truncated record behind.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chaptercraft_core::storage::KeyValueStore;
use chaptercraft_core::{CoreError, Result};

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(CoreError::StorageUnavailable(format!(
                "invalid storage key '{}'",
                key
            )));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

fn unavailable(action: &str, path: &Path, e: std::io::Error) -> CoreError {
    CoreError::StorageUnavailable(format!("failed to {} {}: {}", action, path.display(), e))
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(unavailable("read", &path, e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir).map_err(|e| unavailable("create", &self.dir, e))?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value).map_err(|e| unavailable("write", &tmp, e))?;
        std::fs::rename(&tmp, &path).map_err(|e| unavailable("replace", &path, e))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(unavailable("remove", &path, e)),
        }
    }
}
