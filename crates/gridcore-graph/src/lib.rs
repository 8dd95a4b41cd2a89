// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # gridcore Graph
//!
//! The external views a generation pass consumes:
//!
//! - **[`GraphQuery`]** / **[`MachineGraph`]** - vertices, edges and outgoing partitions
//! - **[`RoutingQuery`]** / **[`RoutingInfo`]** - first routing key per (vertex, partition)
//! - **[`Placements`]** - (hostname, chip x, chip y, core) per vertex
//! - **[`validate_vertex_topology`]** - fan-in, partition and self-loop checks
//!
//! All views are read-only during generation and shared across worker threads.

use thiserror::Error;

pub mod graph;
pub mod placement;
pub mod routing;
pub mod topology;

pub use graph::{Edge, GraphQuery, MachineGraph, OutgoingPartition, VertexId};
pub use placement::{Placement, Placements};
pub use routing::{RoutingInfo, RoutingQuery};
pub use topology::{validate_vertex_topology, TopologyError, ValidatedTopology};

/// Errors raised while building a graph
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("unknown vertex {0}")]
    UnknownVertex(VertexId),
}

pub type GraphResult<T> = Result<T, GraphError>;
