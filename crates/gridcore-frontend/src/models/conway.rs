// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Game of Life cell.
//!
//! Each cell runs on its own core, broadcasts its state on the `STATE`
//! partition and listens to exactly eight neighbours.
//!
//! | region | label            | bytes                   |
//! |--------|------------------|-------------------------|
//! | 0      | system           | 16                      |
//! | 1      | inputs           | 8 (key present, key)    |
//! | 2      | state            | 4 (1 alive, 0 dead)     |
//! | 3      | neighbour_states | 8 (alive, dead)         |
//! | 4      | recording        | header + channel buffer |

use crate::{
    BufferManager, DataSpecable, MachineVertex, ReceivesBuffersToHost, SimulatorVertex, WriteContext,
};
use byteorder::{ByteOrder, LittleEndian};
use gridcore_dsg::{
    recording_region_size, DataSpecError, DataSpecResult, DataSpecWriter, RecordingChannel,
    RecordingConfig, RegionLayout, RegionSpec, SYSTEM_BYTES_REQUIREMENT,
};
use gridcore_graph::{GraphQuery, Placement};
use tracing::warn;

/// Executable image loaded on every cell core
pub const CONWAY_BINARY: &str = "conways_cell.aplx";

/// Partition carrying state broadcasts
pub const PARTITION_ID: &str = "STATE";

const TRANSMISSION_DATA_SIZE: u32 = 2 * 4;
const STATE_DATA_SIZE: u32 = 4;
const NEIGHBOUR_INITIAL_STATES_SIZE: u32 = 2 * 4;
const RECORDED_BYTES_PER_TIMESTEP: u32 = 100;

/// Region ids of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum CellRegion {
    System = 0,
    Transmissions = 1,
    State = 2,
    NeighbourInitialStates = 3,
    Results = 4,
}

impl CellRegion {
    pub const fn id(self) -> u32 {
        self as u32
    }
}

/// One cell of the grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConwayBasicCell {
    simulator: SimulatorVertex,
    state: bool,
}

impl ConwayBasicCell {
    pub fn new(label: impl Into<String>, state: bool, machine_time_step: u32) -> Self {
        Self {
            simulator: SimulatorVertex::new(label, CONWAY_BINARY, machine_time_step),
            state,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.state
    }

    pub fn simulator_mut(&mut self) -> &mut SimulatorVertex {
        &mut self.simulator
    }

    /// Recorded states of this cell, one per timestep
    ///
    /// Dropped data is logged and whatever arrived is still decoded.
    pub fn get_data<B: BufferManager>(&self, buffer_manager: &B, placement: &Placement) -> DataSpecResult<Vec<bool>> {
        let channel = self.recorded_region_ids()[0];
        let (raw, data_missing) = buffer_manager.data_for(placement, channel);
        if data_missing {
            warn!(
                target: "gridcore-frontend",
                "Missing recorded data from ({}, {}, {}) for '{}'",
                placement.x,
                placement.y,
                placement.p,
                self.label()
            );
        }

        if raw.len() % 4 != 0 {
            return Err(DataSpecError::MalformedRegion {
                region: CellRegion::Results.id(),
                reason: format!("{} recorded bytes is not a whole number of words", raw.len()),
            });
        }
        Ok(raw.chunks_exact(4).map(|w| LittleEndian::read_u32(w) != 0).collect())
    }
}

impl MachineVertex for ConwayBasicCell {
    fn label(&self) -> &str {
        self.simulator.label()
    }
}

impl DataSpecable for ConwayBasicCell {
    const FAN_IN: usize = 8;

    fn simulator(&self) -> &SimulatorVertex {
        &self.simulator
    }

    fn region_layout(&self, recording: &RecordingConfig) -> DataSpecResult<RegionLayout> {
        let recording_size = recording_region_size(&self.recording_channels(recording))?;
        Ok(RegionLayout::new(vec![
            RegionSpec::new(CellRegion::System.id(), SYSTEM_BYTES_REQUIREMENT, "system"),
            RegionSpec::new(CellRegion::Transmissions.id(), TRANSMISSION_DATA_SIZE, "inputs"),
            RegionSpec::new(CellRegion::State.id(), STATE_DATA_SIZE, "state"),
            RegionSpec::new(
                CellRegion::NeighbourInitialStates.id(),
                NEIGHBOUR_INITIAL_STATES_SIZE,
                "neighbour_states",
            ),
            RegionSpec::new(CellRegion::Results.id(), recording_size, "recording"),
        ]))
    }

    fn system_region_id(&self) -> u32 {
        CellRegion::System.id()
    }

    fn write_transmission<G: GraphQuery<Vertex = Self>>(
        &self,
        spec: &mut DataSpecWriter,
        ctx: &WriteContext<'_, G>,
    ) -> DataSpecResult<()> {
        spec.focus(CellRegion::Transmissions.id())?;
        spec.write_value(ctx.routing_key.is_some() as u32)?;
        spec.write_value(ctx.routing_key.unwrap_or(0))
    }

    fn write_state(&self, spec: &mut DataSpecWriter) -> DataSpecResult<()> {
        spec.focus(CellRegion::State.id())?;
        spec.write_value(self.state as u32)
    }

    fn write_neighbour_state<G: GraphQuery<Vertex = Self>>(
        &self,
        spec: &mut DataSpecWriter,
        ctx: &WriteContext<'_, G>,
    ) -> DataSpecResult<()> {
        let incoming = &ctx.topology.incoming;
        let alive = incoming
            .iter()
            .filter(|edge| ctx.graph.vertex(edge.pre).is_some_and(|cell| cell.is_alive()))
            .count() as u32;
        let dead = incoming.len() as u32 - alive;

        spec.focus(CellRegion::NeighbourInitialStates.id())?;
        spec.write_array(&[alive, dead])
    }
}

impl ReceivesBuffersToHost for ConwayBasicCell {
    fn recording_region_id(&self) -> u32 {
        CellRegion::Results.id()
    }

    fn recording_channels(&self, recording: &RecordingConfig) -> Vec<RecordingChannel> {
        vec![recording.channel()]
    }

    fn bytes_per_timestep(&self) -> Vec<u32> {
        vec![RECORDED_BYTES_PER_TIMESTEP]
    }
}
