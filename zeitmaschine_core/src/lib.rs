//! zeitmaschine Core Library
//!
//! Image retrieval for the zeitmaschine photo gallery: paged metadata
//! queries against the search backend, and cache-aside fetching of image
//! renditions backed by a local persistent cache.

pub mod cache;
pub mod error;
pub mod gallery;
pub mod image;
pub mod remote;
pub mod service;
pub mod session;

// Re-export main types
pub use cache::{CacheHandle, CacheStats, ImageCache, NullCache, SqliteImageCache};
pub use error::{Error, Result};
pub use gallery::Gallery;
pub use image::{DEFAULT_RENDITION, ImageMetadata, PAGING_SIZE, PageQuery, cache_key};
pub use remote::{HttpGallery, RemoteGallery};
pub use service::ImageService;
pub use session::{Session, SessionStatus};

use error::ValidationError;

/// Remote gallery configuration
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Search endpoint receiving paged metadata queries
    pub endpoint: String,
    /// Base URL image renditions are fetched from
    pub base_url: String,
    pub page_size: usize,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            base_url: String::new(),
            page_size: PAGING_SIZE,
            timeout_seconds: 30,
            user_agent: format!("zeitmaschine/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl GalleryConfig {
    /// Create a configuration for the given endpoint and image base URL
    pub fn new(endpoint: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Check that the required values are present and the URLs parse
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("gallery.endpoint", &self.endpoint),
            ("gallery.base_url", &self.base_url),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::missing_configuration(field).into());
            }
            reqwest::Url::parse(value)
                .map_err(|e| ValidationError::invalid_url(field, value, e))?;
        }
        if self.page_size == 0 {
            return Err(
                ValidationError::invalid_value("gallery.page_size", "must be at least 1").into(),
            );
        }
        Ok(())
    }
}
