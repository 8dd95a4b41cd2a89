// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # gridcore Front End
//!
//! Turns placed, routed graph vertices into the binary data specifications
//! their cores load at boot.
//!
//! ## Architecture
//!
//! ```text
//! graph + routing + placement
//!           |
//!   validate topology  (fail fast, nothing written)
//!           |
//!   region layout  --->  required_resources (SDRAM == blob length)
//!           |
//!   reserve / write / finalize  (gridcore-dsg)
//!           |
//!   persist at {run_root}/{host}_dataSpec_{x}_{y}_{p}.dat
//! ```
//!
//! Vertices opt in through capability traits: [`DataSpecable`] for
//! generation and [`ReceivesBuffersToHost`] for recording.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod batch;
pub mod error;
pub mod generator;
pub mod models;
pub mod vertex;

pub use batch::{generate_all, BatchOptions, BatchReport, VertexOutcome};
pub use error::{
    FrontendError, FrontendResult, GenerationError, GenerationErrorKind, VertexFailure,
};
pub use generator::{
    generate, generate_with_report, required_resources, GeneratedSpec, GenerationStage, StageTracker,
};
pub use models::{ConwayBasicCell, ConwayGrid};
pub use vertex::{
    BufferManager, DataSpecable, MachineVertex, ReceivesBuffersToHost, SimulatorVertex, WriteContext,
};
