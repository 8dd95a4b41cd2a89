// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines all configuration structs that map to sections in
//! `gridcore_configuration.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Reserved value of `reports.application_data_folder` that resolves to the
/// platform temporary directory.
pub const TEMP_FOLDER_SENTINEL: &str = "TEMP";

/// Largest recording buffer a single channel may keep on chip (1 MiB).
pub const MAX_SIZE_OF_BUFFERED_REGION_ON_CHIP: u32 = 1024 * 1024;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GridcoreConfig {
    pub machine: MachineConfig,
    pub buffers: BuffersConfig,
    pub reports: ReportsConfig,
    pub generation: GenerationConfig,
    pub logging: LoggingConfig,
}

/// Target machine and timing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Hostname or IP address of the board; used only for artifact naming
    pub hostname: String,
    /// Duration of one timestep in microseconds
    pub machine_time_step: u32,
    /// Slow-down factor applied on top of the timestep
    pub time_scale_factor: u32,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            hostname: "localhost".to_string(),
            machine_time_step: 1000,
            time_scale_factor: 1,
        }
    }
}

/// Recording buffer configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BuffersConfig {
    /// Stream recorded data to the host while the simulation runs
    pub enable_buffered_recording: bool,
    /// Bytes a core accumulates before asking the host to drain it
    pub buffer_size_before_receive: u32,
    /// Minimum number of timesteps between two drain requests
    pub time_between_requests: u32,
    /// IPv4 address of the host that receives buffered data
    pub receive_buffer_host: String,
    pub receive_buffer_port: u16,
    /// On-chip buffer reserved per recording channel
    pub max_channel_buffer_bytes: u32,
    /// Smallest SDRAM a buffered vertex can work with
    pub minimum_buffer_sdram: u32,
}

impl Default for BuffersConfig {
    fn default() -> Self {
        Self {
            enable_buffered_recording: false,
            buffer_size_before_receive: 16384,
            time_between_requests: 50,
            receive_buffer_host: "0.0.0.0".to_string(),
            receive_buffer_port: 17896,
            max_channel_buffer_bytes: MAX_SIZE_OF_BUFFERED_REGION_ON_CHIP,
            minimum_buffer_sdram: 1024,
        }
    }
}

/// Artifact and report locations
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReportsConfig {
    /// Folder for generated binaries; `TEMP` selects the OS temp directory
    pub application_data_folder: String,
    /// Write a human-readable mirror of every data specification
    pub write_text_specs: bool,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            application_data_folder: TEMP_FOLDER_SENTINEL.to_string(),
            write_text_specs: false,
        }
    }
}

/// Batch generation settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Worker threads used for generation (0 = available parallelism)
    pub max_workers: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub log_dir: PathBuf,
    pub file_logging: bool,
    pub retention_days: u64,
    pub retention_runs: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: PathBuf::from("./logs"),
            file_logging: false,
            retention_days: 30,
            retention_runs: 10,
        }
    }
}
