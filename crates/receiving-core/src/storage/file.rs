//! Directory-backed key-value store.
//!
//! Each key is one file inside the store directory. Writes go to a unique
//! temp file which is synced and then renamed over the destination, so a
//! reader sees either the old value or the new one.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, warn};

use crate::error::{ReceivingError, Result};
use crate::storage::traits::KeyValueStore;

/// Key-value store persisted as one file per key.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    quota_bytes: Option<usize>,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            ReceivingError::Storage(format!(
                "Failed to create store directory {}: {}",
                dir.display(),
                e
            ))
        })?;
        Ok(Self {
            dir,
            quota_bytes: None,
        })
    }

    /// Reject values larger than `bytes`, as a browser's storage quota would.
    pub fn with_quota(mut self, bytes: usize) -> Self {
        self.quota_bytes = Some(bytes);
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
        if !valid {
            return Err(ReceivingError::Validation(format!(
                "Invalid storage key: {:?}",
                key
            )));
        }
        Ok(self.dir.join(key))
    }

    fn write_atomic(&self, path: &Path, data: &[u8]) -> Result<()> {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| ReceivingError::StorageWrite(format!("System time error: {}", e)))?
            .as_nanos();
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| ReceivingError::StorageWrite("Invalid store filename".to_string()))?;
        let temp_path = self.dir.join(format!(".{}.{}.tmp", filename, nanos));

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_path)
            .map_err(|e| ReceivingError::StorageWrite(format!("Temp file create failed: {}", e)))?;
        if let Err(e) = file.write_all(data).and_then(|_| file.sync_all()) {
            let _ = fs::remove_file(&temp_path);
            return Err(ReceivingError::StorageWrite(format!(
                "Temp file write failed: {}",
                e
            )));
        }
        drop(file);

        crate::fs::rename_with_fallback(&temp_path, path)
            .map_err(|e| ReceivingError::StorageWrite(format!("Atomic rename failed: {}", e)))?;

        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ReceivingError::Storage(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key)?;
        if let Some(quota) = self.quota_bytes {
            if value.len() > quota {
                warn!(key, size = value.len(), quota, "store quota exceeded");
                return Err(ReceivingError::StorageWrite(format!(
                    "Quota exceeded: {} bytes for {} (limit {})",
                    value.len(),
                    key,
                    quota
                )));
            }
        }
        self.write_atomic(&path, value.as_bytes())?;
        debug!(key, size = value.len(), "stored value");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.key_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ReceivingError::StorageWrite(format!(
                "Failed to remove {}: {}",
                path.display(),
                e
            ))),
        }
    }
}
