//! Configuration management for distfetch
//!
//! Settings are layered, lowest to highest priority:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables
//!
//! # Environment Variables
//!
//! Any key can be overridden with `DISTFETCH__<section>__<key>`:
//! - `DISTFETCH__FETCH__GATEWAYS=http://127.0.0.1:8080,https://ipfs.io`
//! - `DISTFETCH__FETCH__MAX_BYTES=64MB`
//! - `DISTFETCH__HTTP__READ_TIMEOUT_SECS=120`
//!
//! The distribution root itself is chosen by
//! [`dist_path_env`](crate::dist::dist_path_env), so `IPFS_DIST_PATH`
//! still overrides `dist.path`.
//!
//! # Configuration File
//!
//! By default the file is `config/distfetch.toml`; set `DISTFETCH_CONFIG`
//! to use another path.

mod models;
mod sources;
mod validation;

pub use crate::humanize::ByteSize;
pub use models::{Config, DistConfig, FetchConfig, HttpSettings};
pub use validation::ValidationError;

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
    /// Returns an error if the configuration file is malformed or
    /// validation fails.
    pub fn load() -> Result<Self, ConfigError> {
        let config = sources::load()?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path (plus environment)
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Distribution root after applying the `IPFS_DIST_PATH` override
    pub fn resolved_dist_path(&self) -> String {
        crate::dist::dist_path_env(&self.dist.path)
    }
}
