//! Error types and handling for Spotdash
//!
//! This module defines the error types used throughout the application,
//! providing consistent error handling and reporting.

use thiserror::Error;

/// Result type alias for Spotdash operations
pub type Result<T> = std::result::Result<T, SpotdashError>;

/// Main error type for Spotdash
#[derive(Debug, Error)]
pub enum SpotdashError {
    /// Configuration-related errors (bad config file, unknown timezone)
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Upstream price feed payload has an invalid shape
    #[error("Malformed feed: {message}")]
    MalformedFeed { message: String },

    /// Network-related errors (feed fetch rejected or timed out)
    #[error("Network error: {message}")]
    Network { message: String },

    /// Not enough future price points to form a full charging window
    #[error("Insufficient data: {message}")]
    InsufficientData { message: String },

    /// HTTP/Web server errors
    #[error("Web server error: {message}")]
    Web { message: String },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// File I/O errors
    #[error("I/O error: {message}")]
    Io { message: String },

    /// Validation errors
    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    /// Generic errors with context
    #[error("Error: {message}")]
    Generic { message: String },
}

impl SpotdashError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        SpotdashError::Config {
            message: message.into(),
        }
    }

    /// Create a new malformed-feed error
    pub fn malformed_feed<S: Into<String>>(message: S) -> Self {
        SpotdashError::MalformedFeed {
            message: message.into(),
        }
    }

    /// Create a new network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        SpotdashError::Network {
            message: message.into(),
        }
    }

    /// Create a new insufficient-data error
    pub fn insufficient_data<S: Into<String>>(message: S) -> Self {
        SpotdashError::InsufficientData {
            message: message.into(),
        }
    }

    /// Create a new web error
    pub fn web<S: Into<String>>(message: S) -> Self {
        SpotdashError::Web {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(field: S, message: S) -> Self {
        SpotdashError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        SpotdashError::Io {
            message: message.into(),
        }
    }

    /// Create a new generic error
    pub fn generic<S: Into<String>>(message: S) -> Self {
        SpotdashError::Generic {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for SpotdashError {
    fn from(err: std::io::Error) -> Self {
        SpotdashError::io(err.to_string())
    }
}

impl From<serde_yaml::Error> for SpotdashError {
    fn from(err: serde_yaml::Error) -> Self {
        SpotdashError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for SpotdashError {
    fn from(err: serde_json::Error) -> Self {
        SpotdashError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for SpotdashError {
    fn from(err: reqwest::Error) -> Self {
        SpotdashError::network(err.to_string())
    }
}

impl From<chrono::ParseError> for SpotdashError {
    fn from(err: chrono::ParseError) -> Self {
        SpotdashError::validation("datetime".to_string(), err.to_string())
    }
}
