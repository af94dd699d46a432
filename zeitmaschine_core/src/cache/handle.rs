//! Swappable reference to the active image cache

use crate::cache::{ImageCache, NullCache};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Holds exactly one active cache at a time
///
/// Starts out with whatever cache it is given (usually [`NullCache`]) and can
/// be upgraded in place once a persistent cache finishes opening. Readers
/// take a snapshot with [`CacheHandle::current`]; a swap never affects an
/// operation already holding a snapshot.
pub struct CacheHandle {
    current: RwLock<Arc<dyn ImageCache>>,
}

impl CacheHandle {
    pub fn new(cache: Arc<dyn ImageCache>) -> Self {
        Self {
            current: RwLock::new(cache),
        }
    }

    /// Handle backed by the null cache
    pub fn null() -> Self {
        Self::new(Arc::new(NullCache::new()))
    }

    /// Snapshot of the active cache
    pub async fn current(&self) -> Arc<dyn ImageCache> {
        self.current.read().await.clone()
    }

    /// Replace the active cache, returning the previous one
    pub async fn install(&self, cache: Arc<dyn ImageCache>) -> Arc<dyn ImageCache> {
        let mut current = self.current.write().await;
        log::debug!(
            "Switching image cache from '{}' to '{}'",
            current.name(),
            cache.name()
        );
        std::mem::replace(&mut *current, cache)
    }
}

impl Default for CacheHandle {
    fn default() -> Self {
        Self::null()
    }
}
