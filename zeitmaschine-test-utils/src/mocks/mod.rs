//! Mock implementations for testing

mod cache;
mod gallery;

pub use cache::RecordingCache;
pub use gallery::MockGallery;
