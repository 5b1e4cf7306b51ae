// src/models/mod.rs

//! Domain models for confs-push.

mod conference;
mod config;

// Re-export all public types
pub use conference::{Conference, ConferenceKey};
pub use config::{
    Config, FeedConfig, FilterConfig, HttpConfig, LoggingConfig, PreviewConfig, StateConfig,
};
