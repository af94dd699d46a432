//! Error types for the zeitmaschine core library
//!
//! Errors are grouped by where they originate: the remote gallery, the
//! response body, the local image cache, or the supplied configuration.

use thiserror::Error;

pub mod cache;
pub mod network;
pub mod validation;

pub use self::cache::CacheError;
pub use self::network::NetworkError;
pub use self::validation::ValidationError;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the zeitmaschine core library
#[derive(Error, Debug)]
pub enum Error {
    /// Query or fetch against the remote gallery failed
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// A response body did not have the expected shape
    #[error("Failed to deserialize response: {message}")]
    Deserialization { message: String },

    /// Local cache errors
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Configuration errors
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl Error {
    /// Create a deserialization error
    pub fn deserialization(message: impl Into<String>) -> Self {
        Self::Deserialization {
            message: message.into(),
        }
    }

    /// True if this is a cache miss
    pub fn is_cache_miss(&self) -> bool {
        matches!(self, Self::Cache(CacheError::Miss { .. }))
    }
}

// Conversions from external error types

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::deserialization(err.to_string());
        }
        Self::Network(NetworkError::from_reqwest(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::deserialization(err.to_string())
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Self::Cache(CacheError::from(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    #[test]
    fn test_cache_miss_detection() {
        let error = Error::Cache(CacheError::miss("image/thumbnail?name=a.jpg"));
        assert!(error.is_cache_miss());

        let error = Error::Cache(CacheError::write_conflict("image/thumbnail?name=a.jpg"));
        assert!(!error.is_cache_miss());
    }

    #[test]
    fn test_from_serde_json_error() {
        let parse_error = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let error: Error = parse_error.into();

        assert!(matches!(error, Error::Deserialization { .. }));
        assert!(error.to_string().contains("Failed to deserialize response"));
    }

    #[test]
    fn test_transparent_display() {
        let error = Error::Network(NetworkError::status("http://gallery/search", 500));
        assert_eq!(
            error.to_string(),
            "Request to http://gallery/search returned HTTP 500"
        );
    }

    #[test]
    fn test_error_trait_implementation() {
        let error = Error::Validation(ValidationError::missing_configuration("endpoint"));
        let _: &dyn StdError = &error;
    }
}
