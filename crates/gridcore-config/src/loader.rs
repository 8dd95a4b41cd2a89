// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! This module implements the 3-tier configuration loading system:
//! 1. TOML file (base defaults)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{validate_config, ConfigError, ConfigResult, GridcoreConfig};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "gridcore_configuration.toml";

/// Find the gridcore configuration file
///
/// Search order:
/// 1. `GRIDCORE_CONFIG_PATH` environment variable
/// 2. Current working directory: `./gridcore_configuration.toml`
/// 3. Parent directories (up to 5 levels)
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("GRIDCORE_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by GRIDCORE_CONFIG_PATH not found: {}",
            path.display()
        )));
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));

        let mut current = cwd.clone();
        for _ in 0..5 {
            if let Some(parent) = current.parent() {
                search_paths.push(parent.join(CONFIG_FILE_NAME));
                current = parent.to_path_buf();
            }
        }
    }

    for path in &search_paths {
        if path.exists() {
            return Ok(path.clone());
        }
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "'{}' not found in any of these locations:\n{}\n\nSet GRIDCORE_CONFIG_PATH to specify a custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load configuration from TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if config file is not found, contains invalid TOML, or fails validation
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<GridcoreConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: GridcoreConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config);
    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli);
    }

    validate_config(&config)?;
    Ok(config)
}

fn parse_flag(value: &str) -> bool {
    let lower = value.to_lowercase();
    lower == "true" || lower == "1" || lower == "yes"
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `GRIDCORE_HOSTNAME` -> `machine.hostname`
/// - `GRIDCORE_MACHINE_TIME_STEP` -> `machine.machine_time_step`
/// - `GRIDCORE_ENABLE_BUFFERED_RECORDING` -> `buffers.enable_buffered_recording`
/// - `GRIDCORE_RECEIVE_BUFFER_HOST` -> `buffers.receive_buffer_host`
/// - `GRIDCORE_RECEIVE_BUFFER_PORT` -> `buffers.receive_buffer_port`
/// - `GRIDCORE_APPLICATION_DATA_FOLDER` -> `reports.application_data_folder`
/// - `GRIDCORE_WRITE_TEXT_SPECS` -> `reports.write_text_specs`
/// - `GRIDCORE_MAX_WORKERS` -> `generation.max_workers`
/// - `GRIDCORE_LOG_LEVEL` -> `logging.level`
pub fn apply_environment_overrides(config: &mut GridcoreConfig) {
    if let Ok(value) = env::var("GRIDCORE_HOSTNAME") {
        config.machine.hostname = value;
    }
    if let Ok(value) = env::var("GRIDCORE_MACHINE_TIME_STEP") {
        if let Ok(step) = value.parse::<u32>() {
            config.machine.machine_time_step = step;
        }
    }

    if let Ok(value) = env::var("GRIDCORE_ENABLE_BUFFERED_RECORDING") {
        config.buffers.enable_buffered_recording = parse_flag(&value);
    }
    if let Ok(value) = env::var("GRIDCORE_RECEIVE_BUFFER_HOST") {
        config.buffers.receive_buffer_host = value;
    }
    if let Ok(value) = env::var("GRIDCORE_RECEIVE_BUFFER_PORT") {
        if let Ok(port) = value.parse::<u16>() {
            config.buffers.receive_buffer_port = port;
        }
    }

    if let Ok(value) = env::var("GRIDCORE_APPLICATION_DATA_FOLDER") {
        config.reports.application_data_folder = value;
    }
    if let Ok(value) = env::var("GRIDCORE_WRITE_TEXT_SPECS") {
        config.reports.write_text_specs = parse_flag(&value);
    }

    if let Ok(value) = env::var("GRIDCORE_MAX_WORKERS") {
        if let Ok(workers) = value.parse::<usize>() {
            config.generation.max_workers = workers;
        }
    }
    if let Ok(value) = env::var("GRIDCORE_LOG_LEVEL") {
        config.logging.level = value;
    }
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - Map of CLI arguments (e.g., `{"hostname": "192.168.240.1", "time_step": "500"}`)
pub fn apply_cli_overrides(config: &mut GridcoreConfig, cli_args: &HashMap<String, String>) {
    if let Some(value) = cli_args.get("hostname") {
        config.machine.hostname = value.clone();
    }
    if let Some(value) = cli_args.get("time_step") {
        if let Ok(step) = value.parse::<u32>() {
            config.machine.machine_time_step = step;
        }
    }
    if let Some(value) = cli_args.get("time_scale_factor") {
        if let Ok(factor) = value.parse::<u32>() {
            config.machine.time_scale_factor = factor;
        }
    }

    if let Some(value) = cli_args.get("buffered_recording") {
        config.buffers.enable_buffered_recording = parse_flag(value);
    }

    if let Some(value) = cli_args.get("app_data_folder") {
        config.reports.application_data_folder = value.clone();
    }
    if let Some(value) = cli_args.get("write_text_specs") {
        config.reports.write_text_specs = parse_flag(value);
    }

    if let Some(value) = cli_args.get("workers") {
        if let Ok(workers) = value.parse::<usize>() {
            config.generation.max_workers = workers;
        }
    }
    if let Some(value) = cli_args.get("log_level") {
        config.logging.level = value.clone();
    }
}
