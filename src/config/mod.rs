//! Configuration module for Truyen-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. All settings have built-in defaults, so a config file only needs
//! to name the values it overrides.
//!
//! # Example
//!
//! ```no_run
//! use truyen_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Crawling {} listing pages", config.limits.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, LimitsConfig, OutputConfig, RetryConfig, SiteConfig, WorkerConfig};

// Re-export parser functions
pub use parser::{default_config, load_config};
