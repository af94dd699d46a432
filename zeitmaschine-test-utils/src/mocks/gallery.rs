//! Mock remote gallery

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;
use zeitmaschine_core::error::{Error, NetworkError};
use zeitmaschine_core::{PageQuery, RemoteGallery, Result, cache_key};

/// Remote gallery serving canned responses and recording every call
///
/// Search responses are consumed in order; once the queue is empty an
/// empty result body is returned. Image blobs are looked up by cache key.
#[derive(Default)]
pub struct MockGallery {
    state: Mutex<MockState>,
}

#[derive(Default)]
struct MockState {
    search_responses: VecDeque<std::result::Result<Bytes, u16>>,
    blobs: HashMap<String, Bytes>,
    fetch_delay: Duration,
    queries: Vec<PageQuery>,
    fetches: Vec<String>,
}

impl MockGallery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a search response body
    pub fn with_search_response(self, body: Bytes) -> Self {
        self.lock().search_responses.push_back(Ok(body));
        self
    }

    /// Queue a search failure with the given HTTP status
    pub fn with_search_failure(self, status: u16) -> Self {
        self.lock().search_responses.push_back(Err(status));
        self
    }

    /// Serve `blob` for the rendition of `name`
    pub fn with_image(self, name: &str, rendition: &str, blob: impl Into<Bytes>) -> Self {
        self.lock()
            .blobs
            .insert(cache_key(name, rendition), blob.into());
        self
    }

    /// Delay every image fetch, to widen race windows in tests
    pub fn with_fetch_delay(self, delay: Duration) -> Self {
        self.lock().fetch_delay = delay;
        self
    }

    pub fn search_count(&self) -> usize {
        self.lock().queries.len()
    }

    pub fn queries(&self) -> Vec<PageQuery> {
        self.lock().queries.clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.lock().fetches.len()
    }

    /// Cache keys of every fetched rendition, in call order
    pub fn fetches(&self) -> Vec<String> {
        self.lock().fetches.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl RemoteGallery for MockGallery {
    async fn search(&self, query: &PageQuery) -> Result<Bytes> {
        let next = {
            let mut state = self.lock();
            state.queries.push(query.clone());
            state.search_responses.pop_front()
        };

        match next {
            Some(Ok(body)) => Ok(body),
            Some(Err(status)) => Err(Error::Network(NetworkError::status("mock://search", status))),
            None => Ok(Bytes::from_static(br#"{"hits":{"hits":[]}}"#)),
        }
    }

    async fn fetch_image(&self, name: &str, rendition: &str) -> Result<Bytes> {
        let key = cache_key(name, rendition);
        let (blob, delay) = {
            let mut state = self.lock();
            state.fetches.push(key.clone());
            (state.blobs.get(&key).cloned(), state.fetch_delay)
        };

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        blob.ok_or_else(|| Error::Network(NetworkError::status(format!("mock://{key}"), 404)))
    }
}
