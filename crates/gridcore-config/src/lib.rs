// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # gridcore Configuration System
//!
//! Type-safe configuration for data specification generation with support for:
//! - TOML file parsing
//! - Environment variable overrides
//! - CLI argument overrides
//!
//! ## Usage
//!
//! ```rust,no_run
//! use gridcore_config::{load_config, GridcoreConfig};
//!
//! let config = load_config(None, None).expect("Failed to load config");
//!
//! println!("Machine: {}", config.machine.hostname);
//! println!("Timestep: {} us", config.machine.machine_time_step);
//! ```
//!
//! The loaded [`GridcoreConfig`] is built once and passed by reference into
//! the generator and resource-model calls. Nothing in the workspace reads
//! settings from process-wide state.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod loader;
pub mod types;
pub mod validation;

pub use loader::{apply_cli_overrides, apply_environment_overrides, find_config_file, load_config};
pub use types::*;
pub use validation::{validate_config, ConfigValidationError};

/// Errors raised while locating, parsing or checking run settings
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no gridcore configuration file found; searched: {0}")]
    FileNotFound(String),

    #[error("cannot read configuration: {0}")]
    IoError(#[from] std::io::Error),

    #[error("malformed configuration TOML: {0}")]
    ParseError(String),

    #[error("{0}")]
    ValidationError(String),

    #[error("bad configuration value: {0}")]
    InvalidValue(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseError(err.message().to_string())
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
