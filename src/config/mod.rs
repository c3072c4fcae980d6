//! Configuration management for codescrape
//!
//! This module provides a layered configuration system that loads settings from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use codescrape::config::Config;
//!
//! let config = Config::load().expect("Failed to load configuration");
//! println!("Workers: {}", config.downloader.num_workers);
//! ```
//!
//! # Environment Variables
//!
//! Configuration can be overridden using environment variables with the pattern:
//! `CODESCRAPE__<section>__<key>`
//!
//! Examples:
//! - `CODESCRAPE__DOWNLOADER__NUM_WORKERS=8`
//! - `CODESCRAPE__HTTP__REQUEST_TIMEOUT=30s`
//! - `CODESCRAPE__LOGGING__LEVEL=debug`
//!
//! # Configuration File
//!
//! By default, the configuration is loaded from `config/codescrape.toml`.
//! This can be overridden using the `CODESCRAPE_CONFIG` environment variable.

mod models;
mod sources;
mod validation;

pub use crate::humanize::HumanDuration;
pub use models::{Config, DownloaderConfig, HttpSettings, LoggingConfig};
pub use validation::ValidationError;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file is malformed or a value
    /// fails validation (zero workers, zero timeouts, ...).
    pub fn load() -> Result<Self, ConfigError> {
        let config = sources::load()?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Re-run validation, e.g. after applying CLI overrides
    pub fn validate(&self) -> Result<(), ConfigError> {
        validation::validate(self)?;
        Ok(())
    }
}
