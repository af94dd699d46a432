//! Image retrieval service
//!
//! Metadata pages always come from the remote gallery. Image renditions are
//! served cache-aside: the active cache is consulted first, a miss (or an
//! unusable cache) falls through to the network, and the fetched blob is
//! written back on a best-effort basis. A failing cache can only make a
//! request slower, never make it fail.

use crate::GalleryConfig;
use crate::cache::{CacheHandle, ImageCache, NullCache, SqliteImageCache};
use crate::error::{Error, Result};
use crate::image::{self, DEFAULT_RENDITION, ImageMetadata, PAGING_SIZE, PageQuery};
use crate::remote::{HttpGallery, RemoteGallery};
use bytes::Bytes;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Image service combining the remote gallery with a local cache
pub struct ImageService {
    /// Source of truth for metadata and blobs
    gallery: Arc<dyn RemoteGallery>,
    /// The active cache, initially the null cache
    cache: CacheHandle,
    page_size: usize,
}

impl ImageService {
    /// Create a service that does not cache until a cache is installed
    pub fn new(gallery: Arc<dyn RemoteGallery>) -> Self {
        Self::with_cache(gallery, Arc::new(NullCache::new()))
    }

    /// Create a service with an already opened cache
    pub fn with_cache(gallery: Arc<dyn RemoteGallery>, cache: Arc<dyn ImageCache>) -> Self {
        Self {
            gallery,
            cache: CacheHandle::new(cache),
            page_size: PAGING_SIZE,
        }
    }

    /// Override the number of results requested per page
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Build a service from configuration, waiting for the cache to open
    ///
    /// With `cache_path` set the SQLite cache is opened before returning. If
    /// it cannot be opened the service still works, backed by the null cache.
    pub async fn connect(config: &GalleryConfig, cache_path: Option<&Path>) -> Result<Self> {
        let gallery = HttpGallery::new(config)?;
        Self::connect_with(Arc::new(gallery), config.page_size, cache_path).await
    }

    /// Like [`ImageService::connect`] but with a caller supplied gallery
    pub async fn connect_with(
        gallery: Arc<dyn RemoteGallery>,
        page_size: usize,
        cache_path: Option<&Path>,
    ) -> Result<Self> {
        let service = Self::new(gallery).with_page_size(page_size);

        if let Some(path) = cache_path {
            match SqliteImageCache::open(path).await {
                Ok(cache) => {
                    service.install_cache(Arc::new(cache)).await;
                }
                Err(e) => {
                    log::warn!("Image cache unavailable, continuing without it: {e}");
                }
            }
        }

        Ok(service)
    }

    /// Open the SQLite cache in the background and install it when ready
    ///
    /// Requests issued before the task finishes are served by the cache that
    /// is active at that time.
    pub fn spawn_cache_upgrade(self: &Arc<Self>, path: PathBuf) -> JoinHandle<()> {
        let service = Arc::clone(self);
        tokio::spawn(async move {
            match SqliteImageCache::open(&path).await {
                Ok(cache) => {
                    service.install_cache(Arc::new(cache)).await;
                }
                Err(e) => {
                    log::warn!("Image cache unavailable, continuing without it: {e}");
                }
            }
        })
    }

    /// Replace the active cache
    pub async fn install_cache(&self, cache: Arc<dyn ImageCache>) {
        self.cache.install(cache).await;
    }

    /// The active cache
    pub async fn cache(&self) -> Arc<dyn ImageCache> {
        self.cache.current().await
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Fetch one page of image metadata, newest first, starting at `offset`
    ///
    /// Network and deserialization failures are returned unchanged.
    pub async fn get_images(&self, offset: usize) -> Result<Vec<ImageMetadata>> {
        let query = PageQuery::newest_first(offset, self.page_size);
        let body = self.gallery.search(&query).await?;
        let images = image::parse_search_response(&body)?;

        log::debug!("Loaded {} images at offset {offset}", images.len());

        Ok(images)
    }

    /// Fetch a rendition of an image, preferring the cache
    pub async fn get_image(&self, name: &str, rendition: &str) -> Result<Bytes> {
        let key = image::cache_key(name, rendition);
        let cache = self.cache.current().await;

        match cache.get(&key).await {
            Ok(blob) => {
                log::debug!("Cache hit for '{key}'");
                return Ok(blob);
            }
            Err(e) if e.is_cache_miss() => {
                log::debug!("Cache miss for '{key}' ({})", cache.name());
            }
            Err(e) => {
                log::warn!("Cache lookup for '{key}' failed, fetching from network: {e}");
            }
        }

        let blob = self.gallery.fetch_image(name, rendition).await?;
        self.write_back(&key, blob.clone()).await;

        Ok(blob)
    }

    /// Fetch the default rendition
    pub async fn get_thumbnail(&self, name: &str) -> Result<Bytes> {
        self.get_image(name, DEFAULT_RENDITION).await
    }

    async fn write_back(&self, key: &str, blob: Bytes) {
        let cache = self.cache.current().await;

        match cache.set(key, blob).await {
            Ok(_) => {}
            Err(Error::Cache(e)) if e.is_expected() => {
                log::debug!("Not caching '{key}': {e}");
            }
            Err(e) => {
                log::warn!("Error adding '{key}' to cache: {e}");
            }
        }
    }
}
