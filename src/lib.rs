//! Truyen-Harvest: a concurrent novel catalog crawler
//!
//! This crate crawls a paginated novel catalog, follows each listing to its
//! detail page and a bounded number of chapters, and assembles a normalized,
//! deduplicated dataset (authors, categories, novels, chapters, chapter
//! bodies) that is written out as JSON at the end of the run.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod store;

use thiserror::Error;

/// Main error type for Truyen-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Truyen-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use store::{EntityStore, Snapshot};
