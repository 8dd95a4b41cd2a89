// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # gridcore Data Specification
//!
//! Binary layout primitives for the start-of-day data every embedded core
//! reads before it runs:
//!
//! - **[`DataSpecWriter`]** - append-only, region-addressed encoder
//! - **[`DataSpecReader`]** - slices a finalized blob back into its regions
//! - **[`RegionLayout`]** - explicit ordered `(id, size, label)` list for one vertex
//! - **[`RecordingHeader`]** - recording/buffering header words and their size
//! - **[`ResourceContainer`]** - SDRAM / DTCM / CPU budget a vertex requires
//! - **[`ArtifactPaths`]** - where finished blobs and text mirrors are written
//!
//! ## Basic Usage
//!
//! ```rust
//! use gridcore_dsg::DataSpecWriter;
//!
//! let mut spec = DataSpecWriter::new();
//! spec.reserve(0, 8, Some("inputs")).unwrap();
//! spec.focus(0).unwrap();
//! spec.write_value(1).unwrap();
//!
//! // unwritten bytes are zero-padded up to the reserved size
//! assert_eq!(spec.finalize(), vec![1, 0, 0, 0, 0, 0, 0, 0]);
//! ```
//!
//! Nothing in this crate talks to hardware; persistence only writes files.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Size in bytes of one word on the embedded cores
pub const BYTES_PER_WORD: u32 = 4;

pub mod error;
pub mod paths;
pub mod persist;
pub mod reader;
pub mod recording;
pub mod region;
pub mod resources;
pub mod system;
pub mod writer;

pub use error::{DataSpecError, DataSpecResult};
pub use paths::{
    application_data_path, artifact_path, mem_write_base_address, resolve_run_root, ArtifactPaths,
    TEXT_SPEC_DIR_NAME,
};
pub use persist::persist_artifacts;
pub use reader::DataSpecReader;
pub use recording::{
    get_n_timesteps_in_buffer_space, recording_header_size, recording_region_size,
    recording_resources, Endpoint, RecordingChannel, RecordingConfig, RecordingHeader,
};
pub use region::{RegionLayout, RegionSpec};
pub use resources::{IpTagResource, ResourceContainer};
pub use system::{binary_fingerprint, write_system_region, RunLength, SystemRegion, SYSTEM_BYTES_REQUIREMENT};
pub use writer::{DataSpecWriter, DataWidth};
