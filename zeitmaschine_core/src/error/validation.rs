//! Validation related error types

use thiserror::Error;

/// Configuration validation errors
#[derive(Error, Debug)]
pub enum ValidationError {
    /// A required configuration value is empty or absent
    #[error("Missing required configuration: {field}")]
    MissingConfiguration { field: String },

    /// A configured URL could not be parsed
    #[error("Invalid URL for '{field}' ({value}): {reason}")]
    InvalidUrl {
        field: String,
        value: String,
        reason: String,
    },

    /// A configuration value is present but unusable
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

impl ValidationError {
    /// Create a missing configuration error
    pub fn missing_configuration(field: &str) -> Self {
        Self::MissingConfiguration {
            field: field.to_string(),
        }
    }

    /// Create an invalid URL error
    pub fn invalid_url(field: &str, value: &str, reason: impl ToString) -> Self {
        Self::InvalidUrl {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(field: &str, reason: &str) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }
}
