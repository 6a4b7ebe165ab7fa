//! Storage effects
//!
//! Byte-level keyed store. Writes are only ever submitted as a `WriteBatch`, which the handler
//! must apply atomically: after `apply_batch` returns, either every operation in the batch is
//! visible or none is.

use crate::errors::Result;
use std::sync::Arc;

/// Single staged write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    /// Insert or replace `key`
    Put {
        /// Storage key
        key: String,
        /// Encoded value
        value: Vec<u8>,
    },
    /// Remove `key`; removing an absent key is a no-op
    Delete {
        /// Storage key
        key: String,
    },
}

impl WriteOp {
    /// Key this operation touches
    pub fn key(&self) -> &str {
        match self {
            Self::Put { key, .. } | Self::Delete { key } => key,
        }
    }
}

/// Ordered set of writes applied as one unit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    /// Empty batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a put
    pub fn put(&mut self, key: impl Into<String>, value: Vec<u8>) -> &mut Self {
        self.ops.push(WriteOp::Put {
            key: key.into(),
            value,
        });
        self
    }

    /// Stage a delete
    pub fn delete(&mut self, key: impl Into<String>) -> &mut Self {
        self.ops.push(WriteOp::Delete { key: key.into() });
        self
    }

    /// Staged operations in submission order
    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    /// Number of staged operations
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// No operations staged
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl IntoIterator for WriteBatch {
    type Item = WriteOp;
    type IntoIter = std::vec::IntoIter<WriteOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}

/// Keyed storage with atomic batch writes
pub trait StorageEffects: Send + Sync {
    /// Read the value at `key`
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Apply every operation in `batch`, in order, atomically
    fn apply_batch(&self, batch: WriteBatch) -> Result<()>;
}

impl<T: StorageEffects + ?Sized> StorageEffects for Arc<T> {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).read(key)
    }

    fn apply_batch(&self, batch: WriteBatch) -> Result<()> {
        (**self).apply_batch(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_preserves_order() {
        let mut batch = WriteBatch::new();
        batch.put("a", vec![1]).delete("b").put("a", vec![2]);

        let keys: Vec<&str> = batch.ops().iter().map(WriteOp::key).collect();
        assert_eq!(keys, vec!["a", "b", "a"]);
        assert_eq!(batch.len(), 3);
    }
}
