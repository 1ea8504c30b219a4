//! Configuration management for handlebox
//!
//! This module provides the [`HandleConfig`] value object and a layered
//! loader that reads settings from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use handlebox::config::HandleConfig;
//!
//! let config = HandleConfig::load().expect("Failed to load configuration");
//! println!("Handle: {}/{}", config.prefix, config.handle_name);
//! ```
//!
//! # Environment Variables
//!
//! Configuration can be overridden using environment variables with the pattern:
//! `HANDLEBOX__<key>`
//!
//! Examples:
//! - `HANDLEBOX__HANDLE_NAME=123456`
//! - `HANDLEBOX__API_BASE_URL=https://epic.example.org/api/handles`
//! - `HANDLEBOX__PREFIX__ORG=21.T12995` and `HANDLEBOX__PREFIX__ENV=TEST`
//!
//! `HANDLE_AUTHORIZATION` supplies the `Authorization` header unless one is
//! configured explicitly.
//!
//! # Configuration File
//!
//! By default, the configuration is loaded from `config/handlebox.toml`.
//! This can be overridden using the `HANDLEBOX_CONFIG` environment variable.
//!
//! Loading never validates: validation runs per operation and reports every
//! problem at once, see [`validate`].

mod models;
mod sources;
mod validation;

// Re-export public types
pub use crate::humanize::HumanDuration;
pub use models::{HandleConfig, HandlePrefix, HeadersMap};
pub use validation::{
    InvalidSettings, SETTINGS_INVALID, ValidationError, ValidationIssue, ValidationReport,
    validate,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),
}

impl HandleConfig {
    /// Load configuration from all sources (file + environment)
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables (`HANDLEBOX__*`)
    /// 2. TOML file (default: `config/handlebox.toml`)
    /// 3. Default values
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file is malformed or a value
    /// has the wrong shape (e.g. a non-boolean `verify_tls`).
    pub fn load() -> Result<Self, ConfigError> {
        Ok(sources::load()?)
    }

    /// Like [`HandleConfig::load`] but reading the given file
    ///
    /// `.env` and `HANDLE_AUTHORIZATION` are still applied.
    pub fn load_with_file(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        Ok(sources::load_at(Some(path))?)
    }

    /// Load configuration from a specific path
    ///
    /// Useful for testing with custom configuration files.
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        Ok(sources::load_from_sources(path)?)
    }

    /// Run all checks and return every failure
    pub fn validate(&self) -> ValidationReport {
        validation::validate(self)
    }

    /// Strict variant of [`HandleConfig::validate`]
    pub fn ensure_valid(&self) -> Result<(), InvalidSettings> {
        self.validate().into_result()
    }

    /// Prefix in "org/env" form, whichever shape was configured
    pub fn resolved_prefix(&self) -> String {
        self.prefix.resolve()
    }
}
