//! Error types for key-value store operations.

use thiserror::Error;

/// Errors that can occur while reading or writing the key-value store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backing database failed.
    #[error("database error for key '{key}': {message}")]
    Database {
        /// Key being read or written.
        key: String,
        /// Human-readable database error text.
        message: String,
    },

    /// Stored value could not be (de)serialized.
    #[error("invalid JSON for key '{key}': {source}")]
    Serialization {
        /// Key being read or written.
        key: String,
        /// The underlying serde error.
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    /// Creates a database error from a sqlx error.
    pub fn database(key: impl Into<String>, error: &sqlx::Error) -> Self {
        Self::Database {
            key: key.into(),
            message: error.to_string(),
        }
    }

    /// Creates a serialization error.
    pub fn serialization(key: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            key: key.into(),
            source,
        }
    }

    /// Returns the key the failed operation targeted.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Database { key, .. } | Self::Serialization { key, .. } => key,
        }
    }
}
