use super::{Storage, StorageError};
use fxhash::FxHashMap;
use parking_lot::RwLock;
use serde_json::Value;

/// Volatile in-process backend; contents are lost with the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: RwLock<FxHashMap<String, Value>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }
}

impl Storage for MemoryStorage {
    fn set_value(&self, key: &str, value: Value) -> Result<Option<Value>, StorageError> {
        Ok(self.values.write().insert(key.to_owned(), value))
    }

    fn get_value(&self, key: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.values.read().get(key).cloned())
    }

    fn remove_value(&self, key: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.values.write().remove(key))
    }
}
