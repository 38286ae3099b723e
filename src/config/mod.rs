//! Configuration management for reqchain
//!
//! This module provides a layered configuration system that loads settings from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use reqchain::config::Config;
//! use reqchain::handlers::HandlerRegistry;
//!
//! let config = Config::load().expect("Failed to load configuration");
//! let chain = config
//!     .build_chain(&HandlerRegistry::with_defaults())
//!     .expect("Failed to build chain");
//! println!("Chain: {:?}", chain.names());
//! ```
//!
//! # Environment Variables
//!
//! Configuration can be overridden using environment variables with the pattern:
//! `REQCHAIN__<section>__<key>`, e.g. `REQCHAIN__LOGGING__FILTER=debug`.
//!
//! # Configuration File
//!
//! By default, the configuration is loaded from `config/reqchain.toml`.
//! This can be overridden using the `REQCHAIN_CONFIG` environment variable.
//!
//! ```toml
//! [logging]
//! filter = "info"
//!
//! [[chain.handlers]]
//! kind = "identity"
//! field = "userId"
//!
//! [[chain.handlers]]
//! kind = "permission"
//!
//! [[chain.handlers]]
//! kind = "payload"
//! field = "log"
//! ```

mod models;
mod sources;
mod validation;

pub use models::{Config, LoggingConfig};
pub use validation::ValidationError;

use crate::chain::Chain;
use crate::handlers::{HandlerRegistry, RegistryError};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),

    #[error("Chain construction failed: {0}")]
    RegistryError(#[from] RegistryError),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables (`REQCHAIN__*`)
    /// 2. TOML file (`REQCHAIN_CONFIG`, default: `config/reqchain.toml`)
    /// 3. Default values
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration file is malformed
    /// - Validation against the built-in handler kinds fails
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(None, &HandlerRegistry::with_defaults())
    }

    /// Load configuration from a specific path
    ///
    /// Useful for testing with custom configuration files. The file must exist.
    pub fn load_from_path(path: PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path, true)?;
        validation::validate(&config, &HandlerRegistry::with_defaults())?;
        Ok(config)
    }

    /// Load with an optional explicit path, validating against `registry`.
    ///
    /// An explicit path (or `REQCHAIN_CONFIG`) that does not exist is an error.
    pub fn load_with(
        path: Option<PathBuf>,
        registry: &HandlerRegistry,
    ) -> Result<Self, ConfigError> {
        let config = sources::load(path)?;
        validation::validate(&config, registry)?;
        Ok(config)
    }

    pub fn validate(&self, registry: &HandlerRegistry) -> Result<(), ConfigError> {
        validation::validate(self, registry)?;
        Ok(())
    }

    /// Build the configured chain
    pub fn build_chain(&self, registry: &HandlerRegistry) -> Result<Chain, ConfigError> {
        Ok(registry.build_chain(&self.chain)?)
    }
}
