//! Network related error types

use thiserror::Error;

/// Errors raised while talking to the remote gallery
#[derive(Error, Debug)]
pub enum NetworkError {
    /// The request could not be sent or the response body could not be read
    #[error("Request to {url} failed: {message}")]
    Request { url: String, message: String },

    /// The server answered with a non-success status
    #[error("Request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

impl NetworkError {
    /// Create a request error
    pub fn request(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Request {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a status error
    pub fn status(url: impl Into<String>, status: u16) -> Self {
        Self::Status {
            url: url.into(),
            status,
        }
    }

    /// Check if this error is transient and a caller may retry
    ///
    /// The core itself never retries.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Request { .. } => true,
            Self::Status { status, .. } => matches!(status, 500..=504),
        }
    }

    /// Build from a reqwest error, keeping the status when the server sent one
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        let url = err
            .url()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "<unknown>".to_string());

        match err.status() {
            Some(status) => Self::status(url, status.as_u16()),
            None => Self::request(url, err.to_string()),
        }
    }
}
