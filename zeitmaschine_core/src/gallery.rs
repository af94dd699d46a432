//! Accumulated gallery state
//!
//! Keeps every page loaded so far; the next page starts where the loaded
//! images end.

use crate::error::Result;
use crate::image::ImageMetadata;
use crate::service::ImageService;
use std::sync::Arc;

/// Images loaded so far, in the order the backend returned them
pub struct Gallery {
    service: Arc<ImageService>,
    images: Vec<ImageMetadata>,
    exhausted: bool,
}

impl Gallery {
    pub fn new(service: Arc<ImageService>) -> Self {
        Self {
            service,
            images: Vec::new(),
            exhausted: false,
        }
    }

    /// Load the next page and append it, returning how many images were added
    ///
    /// On error nothing is appended.
    pub async fn load_more(&mut self) -> Result<usize> {
        let page = self.service.get_images(self.images.len()).await?;
        let added = page.len();

        if added < self.service.page_size() {
            self.exhausted = true;
        }
        self.images.extend(page);

        Ok(added)
    }

    /// Load pages until the backend returns a short one
    pub async fn load_all(&mut self) -> Result<usize> {
        let mut total = 0;
        while self.has_more() {
            total += self.load_more().await?;
        }
        Ok(total)
    }

    /// False once a page came back shorter than the page size
    pub fn has_more(&self) -> bool {
        !self.exhausted
    }

    pub fn images(&self) -> &[ImageMetadata] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn into_images(self) -> Vec<ImageMetadata> {
        self.images
    }
}
