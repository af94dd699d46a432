//! No-operation cache implementation
//!
//! Every lookup misses and every write is accepted and dropped, so a
//! service backed by it always goes to the network.

use crate::cache::ImageCache;
use crate::error::{CacheError, Result};
use async_trait::async_trait;
use bytes::Bytes;

/// A cache implementation that doesn't cache anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCache;

impl NullCache {
    /// Create a new null cache
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ImageCache for NullCache {
    async fn get(&self, key: &str) -> Result<Bytes> {
        Err(CacheError::miss(key).into())
    }

    async fn set(&self, key: &str, value: Bytes) -> Result<Bytes> {
        log::trace!("Null cache dropping '{key}'");
        Ok(value)
    }

    async fn remove(&self, _key: &str) -> Result<bool> {
        Ok(false)
    }

    fn name(&self) -> &'static str {
        "null"
    }
}
