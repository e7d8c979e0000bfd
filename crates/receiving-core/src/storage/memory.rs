//! In-memory key-value store for tests and embedding.

use std::collections::HashMap;

use crate::error::{ReceivingError, Result};
use crate::storage::traits::KeyValueStore;

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    quota_bytes: Option<usize>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject values larger than `bytes`.
    pub fn with_quota(mut self, bytes: usize) -> Self {
        self.quota_bytes = Some(bytes);
        self
    }

    /// Make every subsequent `set` fail, simulating a full or broken backend.
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes {
            return Err(ReceivingError::StorageWrite(format!(
                "Write to {} rejected",
                key
            )));
        }
        if let Some(quota) = self.quota_bytes {
            if value.len() > quota {
                return Err(ReceivingError::StorageWrite(format!(
                    "Quota exceeded: {} bytes for {} (limit {})",
                    value.len(),
                    key,
                    quota
                )));
            }
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_write_keeps_value() {
        let mut store = MemoryStore::new();
        store.set("k", "v1").unwrap();
        store.fail_writes(true);
        assert!(store.set("k", "v2").is_err());
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v1"));
    }

    #[test]
    fn test_quota() {
        let mut store = MemoryStore::new().with_quota(3);
        assert!(store.set("k", "abc").is_ok());
        assert!(store.set("k", "abcd").is_err());
        assert_eq!(store.len(), 1);
    }
}
