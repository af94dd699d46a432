//! Cache related error types

use thiserror::Error;

/// Errors raised by image cache implementations
#[derive(Error, Debug)]
pub enum CacheError {
    /// The key is not present in the cache
    #[error("Cache miss for '{key}'")]
    Miss { key: String },

    /// The cache store is not open or could not be opened
    #[error("Cache unavailable: {reason}")]
    Unavailable { reason: String },

    /// An entry already exists for the key and the store is add-only
    #[error("Cache entry for '{key}' already exists")]
    WriteConflict { key: String },

    /// The storage backend reported an error
    #[error("Cache store error: {message}")]
    Store { message: String },
}

impl CacheError {
    /// Create a cache miss error
    pub fn miss(key: &str) -> Self {
        Self::Miss {
            key: key.to_string(),
        }
    }

    /// Create a cache unavailable error
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// Create a write conflict error
    pub fn write_conflict(key: &str) -> Self {
        Self::WriteConflict {
            key: key.to_string(),
        }
    }

    /// Create a store error
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    /// Misses and duplicate writes happen in normal operation
    pub fn is_expected(&self) -> bool {
        matches!(self, Self::Miss { .. } | Self::WriteConflict { .. })
    }
}

impl From<sqlx::Error> for CacheError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolClosed | sqlx::Error::PoolTimedOut => {
                Self::unavailable(err.to_string())
            }
            _ => Self::store(err.to_string()),
        }
    }
}

impl From<std::io::Error> for CacheError {
    fn from(err: std::io::Error) -> Self {
        Self::unavailable(err.to_string())
    }
}
