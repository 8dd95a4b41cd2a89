// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # gridcore-observability
//!
//! Logging infrastructure shared by all gridcore crates.
//!
//! Every crate logs through `tracing` with `target:` set to its crate name, so
//! the per-crate debug flags parsed here can raise one crate to `debug`
//! without flooding the others.
//!
//! ## Features
//! - `file-logging`: timestamped run folders with rotating per-crate files

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod config;
pub mod init;

pub use cli::*;
pub use config::*;
pub use init::*;

/// Known gridcore crate names for debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "gridcore-config",
    "gridcore-dsg",
    "gridcore-graph",
    "gridcore-frontend",
];
