//! Durable key-value persistence.
//!
//! Every collection (favorites, downloaded books) is one JSON blob under one
//! key and is rewritten whole on every save. There are no partial updates.
//!
//! Stores built on top of this module update memory first and write through
//! afterwards. A failed write is logged and reported as
//! [`Durability::MemoryOnly`]; the in-memory change is kept, so memory and
//! disk may diverge until the next successful save.

mod error;
mod memory;
mod sqlite;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Storage keys used by the application.
pub mod keys {
    pub const LANGUAGE: &str = "language";
    pub const VERSION_EN: &str = "version_en";
    pub const VERSION_ES: &str = "version_es";
    pub const THEME: &str = "theme";
    pub const FAVORITES: &str = "favorites";
    pub const DOWNLOADED_BOOKS: &str = "downloadedBooks";
}

/// Whether a mutation reached durable storage.
#[must_use = "a MemoryOnly result means the change will not survive a restart"]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Durability {
    /// The durable write succeeded.
    Persisted,
    /// The durable write failed; the change lives in memory only.
    MemoryOnly,
}

impl Durability {
    #[must_use]
    pub fn is_persisted(self) -> bool {
        matches!(self, Self::Persisted)
    }
}

/// String-keyed get/set storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync + std::fmt::Debug {
    /// Reads the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backing storage cannot be read.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replaces the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backing storage cannot be written.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Reads and deserializes a JSON blob.
///
/// # Errors
///
/// Returns [`StoreError::Serialization`] if the stored value is not valid JSON
/// for `T`, or the backend error if the read fails.
pub async fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    let Some(raw) = store.get(key).await? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StoreError::serialization(key, source))
}

/// Serializes `value` and writes it whole under `key`.
///
/// # Errors
///
/// Returns [`StoreError::Serialization`] if `value` cannot be serialized, or
/// the backend error if the write fails.
pub async fn save_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let raw =
        serde_json::to_string(value).map_err(|source| StoreError::serialization(key, source))?;
    store.set(key, &raw).await
}

/// Store doubles shared by unit tests.
#[cfg(test)]
pub(crate) mod testing {
    use async_trait::async_trait;

    use super::{KeyValueStore, MemoryStore, StoreError};

    /// Reads from an inner [`MemoryStore`]; every write fails.
    #[derive(Debug, Default)]
    pub(crate) struct ReadOnlyStore {
        pub(crate) inner: MemoryStore,
    }

    #[async_trait]
    impl KeyValueStore for ReadOnlyStore {
        async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Database {
                key: key.to_string(),
                message: "attempt to write a readonly database".to_string(),
            })
        }
    }
}
