//! Test utilities for the zeitmaschine gallery client
//!
//! This crate provides mock implementations and response builders for
//! testing the image service without a network or a cache database.

pub mod builders;
pub mod mocks;

// Re-export commonly used types
pub use builders::SearchResponseBuilder;
pub use mocks::{MockGallery, RecordingCache};
