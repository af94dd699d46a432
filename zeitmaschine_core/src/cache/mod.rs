//! Image cache abstraction and implementations
//!
//! Every cache maps a request path (see [`crate::image::cache_key`]) to the
//! binary body that was fetched for it. The [`ImageCache`] trait is
//! implemented by:
//!
//! - [`NullCache`]: stores nothing, used until a real cache is ready
//! - [`SqliteImageCache`]: durable storage surviving restarts

use crate::error::Result;
use async_trait::async_trait;
use bytes::Bytes;

pub mod handle;
pub mod null_cache;
pub mod sqlite_cache;

pub use handle::CacheHandle;
pub use null_cache::NullCache;
pub use sqlite_cache::SqliteImageCache;

/// Cache statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entry_count: u64,
    pub total_bytes: u64,
}

/// Trait for image cache implementations
#[async_trait]
pub trait ImageCache: Send + Sync {
    /// Get the blob stored under `key`
    ///
    /// Fails with `CacheError::Miss` if nothing is stored under the key.
    async fn get(&self, key: &str) -> Result<Bytes>;

    /// Store `value` under `key` and hand it back
    ///
    /// Implementations may be add-only and fail with
    /// `CacheError::WriteConflict` when the key is already present.
    async fn set(&self, key: &str, value: Bytes) -> Result<Bytes>;

    /// Remove the entry for `key`, returning whether one existed
    async fn remove(&self, key: &str) -> Result<bool>;

    /// Short name used in log messages
    fn name(&self) -> &'static str;
}
