// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Concrete vertex types.

pub mod conway;
pub mod grid;

pub use conway::{CellRegion, ConwayBasicCell, CONWAY_BINARY, PARTITION_ID};
pub use grid::{ConwayGrid, APP_CORES_PER_CHIP};
