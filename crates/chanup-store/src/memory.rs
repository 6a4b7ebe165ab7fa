//! In-memory storage handler
//!
//! Shared `Arc<RwLock<BTreeMap>>` state; clones observe the same data. A batch is applied
//! under a single write guard so readers never see it half-applied.

use chanup_core::{Result, StorageEffects, WriteBatch, WriteOp};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Memory storage handler
#[derive(Debug, Clone, Default)]
pub struct MemoryStorageHandler {
    data: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
}

impl MemoryStorageHandler {
    /// Create an empty handler
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with initial data
    pub fn with_data(data: BTreeMap<String, Vec<u8>>) -> Self {
        Self {
            data: Arc::new(RwLock::new(data)),
        }
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether nothing is stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keys starting with `prefix`, in order
    pub fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.data
            .read()
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, _)| k.clone())
            .collect()
    }

    /// Copy of all stored data
    pub fn snapshot(&self) -> BTreeMap<String, Vec<u8>> {
        self.data.read().clone()
    }
}

impl StorageEffects for MemoryStorageHandler {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.data.read().get(key).cloned())
    }

    fn apply_batch(&self, batch: WriteBatch) -> Result<()> {
        let mut data = self.data.write();
        for op in batch {
            match op {
                WriteOp::Put { key, value } => {
                    data.insert(key, value);
                }
                WriteOp::Delete { key } => {
                    data.remove(&key);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_applies_in_order() {
        let storage = MemoryStorageHandler::new();

        let mut batch = WriteBatch::new();
        batch.put("a", vec![1]).put("b", vec![2]).delete("a");
        storage.apply_batch(batch).unwrap();

        assert_eq!(storage.read("a").unwrap(), None);
        assert_eq!(storage.read("b").unwrap(), Some(vec![2]));
    }

    #[test]
    fn test_delete_absent_key_is_noop() {
        let storage = MemoryStorageHandler::new();
        let mut batch = WriteBatch::new();
        batch.delete("missing");
        storage.apply_batch(batch).unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn test_clones_share_state() {
        let storage = MemoryStorageHandler::new();
        let view = storage.clone();

        let mut batch = WriteBatch::new();
        batch.put("k", vec![7]);
        storage.apply_batch(batch).unwrap();

        assert_eq!(view.read("k").unwrap(), Some(vec![7]));
    }

    #[test]
    fn test_prefix_listing() {
        let mut data = BTreeMap::new();
        data.insert("x/1".to_string(), vec![]);
        data.insert("x/2".to_string(), vec![]);
        data.insert("y/1".to_string(), vec![]);
        let storage = MemoryStorageHandler::with_data(data);

        assert_eq!(storage.keys_with_prefix("x/"), vec!["x/1", "x/2"]);
        assert_eq!(storage.len(), 3);
    }
}
