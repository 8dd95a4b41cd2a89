//! # gridcore
//!
//! Start-of-day data generation for graph applications running on grids of
//! small embedded cores. Each placed vertex gets one binary blob of
//! region-addressed, little-endian words that its core reads at boot.
//!
//! ## Quick Start
//!
//! ```rust
//! use gridcore::prelude::*;
//!
//! // 4x4 board, one live cell
//! let grid = ConwayGrid::torus(4, 4, 1000, "192.168.240.1", |x, y| (x, y) == (1, 1)).unwrap();
//! let cell = grid.cell_id(0, 0);
//! let recording = RecordingConfig {
//!     max_channel_buffer_bytes: 256,
//!     ..RecordingConfig::default()
//! };
//!
//! let bytes = generate(
//!     cell,
//!     &grid.graph,
//!     &grid.routing,
//!     grid.placements.get(cell).unwrap(),
//!     &recording,
//! )
//! .unwrap();
//!
//! let vertex = grid.graph.vertex(cell).unwrap();
//! assert_eq!(required_resources(vertex, &recording).unwrap().sdram_bytes as usize, bytes.len());
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Foundation: gridcore-config, gridcore-observability    │
//! │  (TOML settings, per-crate logging)                     │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Encoding: gridcore-dsg                                 │
//! │  (Region writer, recording header, resources, paths)    │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Graph: gridcore-graph                                  │
//! │  (Graph, routing, placement views, topology checks)     │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application: gridcore-frontend                         │
//! │  (Per-vertex generation, batch persistence, models)     │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## License
//!
//! Apache-2.0

pub use gridcore_config as config;
pub use gridcore_dsg as dsg;
pub use gridcore_frontend as frontend;
pub use gridcore_graph as graph;
pub use gridcore_observability as observability;

/// Prelude - commonly used types and traits
pub mod prelude {
    pub use gridcore_config::{load_config, GridcoreConfig};
    pub use gridcore_dsg::{
        artifact_path, DataSpecReader, DataSpecWriter, RecordingConfig, RegionLayout, RegionSpec,
        ResourceContainer, RunLength,
    };
    pub use gridcore_frontend::{
        generate, generate_all, generate_with_report, required_resources, BatchOptions,
        ConwayBasicCell, ConwayGrid, DataSpecable, GenerationError, ReceivesBuffersToHost,
    };
    pub use gridcore_graph::{GraphQuery, MachineGraph, Placement, Placements, RoutingInfo, VertexId};
}
