// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Toroidal board of Game of Life cells, ready for generation.

use super::conway::{ConwayBasicCell, PARTITION_ID};
use gridcore_graph::{GraphResult, MachineGraph, Placement, Placements, RoutingInfo, VertexId};
use tracing::debug;

/// Application cores available on one chip; core 0 runs the monitor
pub const APP_CORES_PER_CHIP: u32 = 16;

/// Graph, routing keys and placements of a whole board
#[derive(Debug, Clone)]
pub struct ConwayGrid {
    pub width: usize,
    pub height: usize,
    pub graph: MachineGraph<ConwayBasicCell>,
    pub routing: RoutingInfo,
    pub placements: Placements,
}

impl ConwayGrid {
    /// Build a `width` x `height` torus; `alive(x, y)` gives the initial states
    ///
    /// Cells are placed row-major, [`APP_CORES_PER_CHIP`] per chip with chips
    /// laid along x. Each cell broadcasts on its own routing key.
    pub fn torus<F>(
        width: usize,
        height: usize,
        machine_time_step: u32,
        hostname: &str,
        alive: F,
    ) -> GraphResult<Self>
    where
        F: Fn(usize, usize) -> bool,
    {
        let mut graph = MachineGraph::new();
        let mut routing = RoutingInfo::new();
        let mut placements = Placements::new();

        for y in 0..height {
            for x in 0..width {
                let label = format!("cell_{}_{}", x, y);
                let id = graph.add_vertex(ConwayBasicCell::new(label, alive(x, y), machine_time_step));
                let index = id.0 as u32;
                routing.insert(id, PARTITION_ID, index);
                placements.insert(
                    id,
                    Placement::new(hostname, index / APP_CORES_PER_CHIP, 0, index % APP_CORES_PER_CHIP + 1),
                );
            }
        }

        let id = |x: usize, y: usize| VertexId(y * width + x);
        for y in 0..height {
            for x in 0..width {
                for dy in [height.saturating_sub(1), 0, 1] {
                    for dx in [width.saturating_sub(1), 0, 1] {
                        if dx == 0 && dy == 0 {
                            continue;
                        }
                        graph.add_edge(id(x, y), id((x + dx) % width, (y + dy) % height), PARTITION_ID)?;
                    }
                }
            }
        }

        debug!(
            target: "gridcore-frontend",
            "Built {}x{} grid: {} cells, {} edges",
            width,
            height,
            graph.n_vertices(),
            graph.n_edges()
        );
        Ok(Self {
            width,
            height,
            graph,
            routing,
            placements,
        })
    }

    pub fn cell_id(&self, x: usize, y: usize) -> VertexId {
        VertexId(y * self.width + x)
    }
}
