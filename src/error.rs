// src/error.rs

//! Unified error handling for confs-push.

use std::fmt;

use thiserror::Error;

/// Result type alias for confs-push operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input validation error
    #[error("{0}")]
    Validation(String),

    /// Remote conference list answered with something other than 200
    #[error("Got response code {status} when calling {url}")]
    Fetch { url: String, status: u16 },

    /// Delivery to a destination failed
    #[error("Failed to publish '{conference}' to {destination}: {message}")]
    Publish {
        destination: String,
        conference: String,
        message: String,
    },
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a publish error for one destination and conference.
    pub fn publish(
        destination: impl Into<String>,
        conference: impl Into<String>,
        message: impl fmt::Display,
    ) -> Self {
        Self::Publish {
            destination: destination.into(),
            conference: conference.into(),
            message: message.to_string(),
        }
    }
}
