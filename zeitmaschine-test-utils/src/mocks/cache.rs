//! In-memory cache that records calls and can be told to fail

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Mutex;
use zeitmaschine_core::error::CacheError;
use zeitmaschine_core::{ImageCache, Result};

/// Add-only in-memory cache with call counters and failure injection
#[derive(Default)]
pub struct RecordingCache {
    state: Mutex<RecordingState>,
}

#[derive(Default)]
struct RecordingState {
    entries: HashMap<String, Bytes>,
    get_calls: usize,
    set_calls: usize,
    fail_reads: bool,
    fail_writes: bool,
}

impl RecordingCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate an entry without counting it as a `set`
    pub fn with_entry(self, key: &str, value: impl Into<Bytes>) -> Self {
        self.lock().entries.insert(key.to_string(), value.into());
        self
    }

    /// Make every `get` fail with a store error
    pub fn failing_reads(self) -> Self {
        self.lock().fail_reads = true;
        self
    }

    /// Make every `set` fail with a store error
    pub fn failing_writes(self) -> Self {
        self.lock().fail_writes = true;
        self
    }

    pub fn get_calls(&self) -> usize {
        self.lock().get_calls
    }

    pub fn set_calls(&self) -> usize {
        self.lock().set_calls
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RecordingState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl ImageCache for RecordingCache {
    async fn get(&self, key: &str) -> Result<Bytes> {
        let mut state = self.lock();
        state.get_calls += 1;

        if state.fail_reads {
            return Err(CacheError::store("injected read failure").into());
        }

        state
            .entries
            .get(key)
            .cloned()
            .ok_or_else(|| CacheError::miss(key).into())
    }

    async fn set(&self, key: &str, value: Bytes) -> Result<Bytes> {
        let mut state = self.lock();
        state.set_calls += 1;

        if state.fail_writes {
            return Err(CacheError::store("injected write failure").into());
        }
        if state.entries.contains_key(key) {
            return Err(CacheError::write_conflict(key).into());
        }

        state.entries.insert(key.to_string(), value.clone());
        Ok(value)
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        Ok(self.lock().entries.remove(key).is_some())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}
