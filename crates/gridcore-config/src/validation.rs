//! Configuration validation
//!
//! This module provides validation logic to ensure configuration values are
//! consistent and within the ranges the embedded firmware accepts.

use crate::{ConfigError, ConfigResult, GridcoreConfig, MAX_SIZE_OF_BUFFERED_REGION_ON_CHIP};
use std::net::Ipv4Addr;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// One problem found in a configuration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("{field} must be set")]
    MissingRequired { field: String },

    #[error("{field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Validate the complete configuration
///
/// Checks for:
/// - Required fields
/// - Machine timing ranges
/// - Recording buffer consistency
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every problem found
pub fn validate_config(config: &GridcoreConfig) -> ConfigResult<()> {
    let mut errors = Vec::new();

    validate_required_fields(config, &mut errors);
    validate_machine(config, &mut errors);
    validate_buffers(config, &mut errors);
    validate_logging(config, &mut errors);

    if !errors.is_empty() {
        let problems: Vec<String> = errors.iter().map(ToString::to_string).collect();
        return Err(ConfigError::ValidationError(format!(
            "{} configuration problem(s): {}",
            problems.len(),
            problems.join("; ")
        )));
    }

    Ok(())
}

fn validate_required_fields(config: &GridcoreConfig, errors: &mut Vec<ConfigValidationError>) {
    if config.machine.hostname.is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "machine.hostname".to_string(),
        });
    }
    if config.reports.application_data_folder.is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "reports.application_data_folder".to_string(),
        });
    }
}

fn validate_machine(config: &GridcoreConfig, errors: &mut Vec<ConfigValidationError>) {
    if config.machine.machine_time_step == 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "machine.machine_time_step".to_string(),
            reason: "must be positive".to_string(),
        });
    }
    if config.machine.time_scale_factor == 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "machine.time_scale_factor".to_string(),
            reason: "must be positive".to_string(),
        });
    }
}

fn validate_buffers(config: &GridcoreConfig, errors: &mut Vec<ConfigValidationError>) {
    let buffers = &config.buffers;

    // recorded data is drained as 32-bit words
    if buffers.max_channel_buffer_bytes == 0 || buffers.max_channel_buffer_bytes % 4 != 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "buffers.max_channel_buffer_bytes".to_string(),
            reason: "must be a positive multiple of 4".to_string(),
        });
    }
    if buffers.max_channel_buffer_bytes > MAX_SIZE_OF_BUFFERED_REGION_ON_CHIP {
        errors.push(ConfigValidationError::InvalidValue {
            field: "buffers.max_channel_buffer_bytes".to_string(),
            reason: format!(
                "must not exceed {} bytes of on-chip buffer",
                MAX_SIZE_OF_BUFFERED_REGION_ON_CHIP
            ),
        });
    }

    if buffers.receive_buffer_host.parse::<Ipv4Addr>().is_err() {
        errors.push(ConfigValidationError::InvalidValue {
            field: "buffers.receive_buffer_host".to_string(),
            reason: format!("'{}' is not an IPv4 address", buffers.receive_buffer_host),
        });
    }

    if !buffers.enable_buffered_recording {
        return;
    }

    if buffers.receive_buffer_port == 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "buffers.receive_buffer_port".to_string(),
            reason: "must be set when buffered recording is enabled".to_string(),
        });
    }
    if buffers.buffer_size_before_receive == 0
        || buffers.buffer_size_before_receive > buffers.max_channel_buffer_bytes
    {
        errors.push(ConfigValidationError::InvalidValue {
            field: "buffers.buffer_size_before_receive".to_string(),
            reason: format!(
                "must be between 1 and max_channel_buffer_bytes ({})",
                buffers.max_channel_buffer_bytes
            ),
        });
    }
}

fn validate_logging(config: &GridcoreConfig, errors: &mut Vec<ConfigValidationError>) {
    if !LOG_LEVELS.contains(&config.logging.level.to_lowercase().as_str()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.level".to_string(),
            reason: format!("must be one of {}", LOG_LEVELS.join(", ")),
        });
    }
}
