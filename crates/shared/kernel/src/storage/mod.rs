//! The key/value persistence subsystem.
//!
//! Backends store JSON values by string key. Typed access and target-scoped keys are
//! layered on top through inherent methods on `dyn Storage`, so every backend gets
//! them for free.

mod memory;

pub use memory::MemoryStorage;

use crate::target::Target;
use art_domain::constants::TARGET_KEY_SEPARATOR;
use art_error::{error_context, format_context};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::borrow::Cow;
use std::fmt::Debug;
use std::sync::{Arc, LazyLock};
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Serialization failure{}: {source}", format_context(.context))]
    Serialization { source: serde_json::Error, context: Option<Cow<'static, str>> },

    #[error("Storage backend failure{}: {message}", format_context(.context))]
    Backend { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

error_context!(
    StorageError, StorageErrorExt,
    variants: [Serialization, Backend],
    sources: [Serialization(serde_json::Error)]
);

pub trait Storage: Debug + Send + Sync {
    /// Stores `value` under `key`, returning the value it replaced.
    ///
    /// # Errors
    /// [`StorageError::Backend`] if the backend cannot persist the value.
    fn set_value(&self, key: &str, value: Value) -> Result<Option<Value>, StorageError>;

    /// # Errors
    /// [`StorageError::Backend`] if the backend cannot be read.
    fn get_value(&self, key: &str) -> Result<Option<Value>, StorageError>;

    /// # Errors
    /// [`StorageError::Backend`] if the backend cannot be modified.
    fn remove_value(&self, key: &str) -> Result<Option<Value>, StorageError>;
}

impl dyn Storage + '_ {
    /// Stores a typed value and returns the previous one if it was of the same type.
    ///
    /// # Errors
    /// [`StorageError::Serialization`] if `value` cannot be encoded, or any backend error.
    pub fn set<V>(&self, key: &str, value: &V) -> Result<Option<V>, StorageError>
    where
        V: Serialize + DeserializeOwned,
    {
        let encoded = serde_json::to_value(value).context(format!("Encoding '{key}'"))?;
        let previous = self.set_value(key, encoded)?;
        Ok(previous.and_then(|p| decode(key, p)))
    }

    /// Reads a typed value. A stored value of a different shape reads as `None`.
    ///
    /// # Errors
    /// Any backend error.
    pub fn get<V: DeserializeOwned>(&self, key: &str) -> Result<Option<V>, StorageError> {
        Ok(self.get_value(key)?.and_then(|v| decode(key, v)))
    }

    /// [`set`](Self::set) under a key scoped to `target`.
    ///
    /// # Errors
    /// See [`set`](Self::set).
    pub fn set_for<V>(
        &self,
        target: &dyn Target,
        key: &str,
        value: &V,
    ) -> Result<Option<V>, StorageError>
    where
        V: Serialize + DeserializeOwned,
    {
        self.set(&target_key(target, key), value)
    }

    /// [`get`](Self::get) under a key scoped to `target`.
    ///
    /// # Errors
    /// See [`get`](Self::get).
    pub fn get_for<V: DeserializeOwned>(
        &self,
        target: &dyn Target,
        key: &str,
    ) -> Result<Option<V>, StorageError> {
        self.get(&target_key(target, key))
    }
}

fn decode<V: DeserializeOwned>(key: &str, value: Value) -> Option<V> {
    serde_json::from_value(value)
        .inspect_err(|e| debug!(key, error = %e, "Stored value has a different type"))
        .ok()
}

/// Storage key of `key` scoped to `target`: `<unique id>#<key>`.
#[must_use]
pub fn target_key(target: &dyn Target, key: &str) -> String {
    format!("{}{TARGET_KEY_SEPARATOR}{key}", target.unique_id())
}

static DEFAULT_STORAGE: LazyLock<Arc<dyn Storage>> =
    LazyLock::new(|| Arc::new(MemoryStorage::new()));

/// The process-wide default backend, shared by every configuration that was not given
/// its own storage.
#[must_use]
pub fn default_storage() -> Arc<dyn Storage> {
    Arc::clone(&*DEFAULT_STORAGE)
}

/// Whether `storage` is the instance returned by [`default_storage`].
#[must_use]
pub fn is_default(storage: &Arc<dyn Storage>) -> bool {
    Arc::ptr_eq(storage, &*DEFAULT_STORAGE)
}
