// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Vertex capabilities.
//!
//! A vertex that produces a data specification implements [`DataSpecable`].
//! Recording into host-drained buffers is the separate capability
//! [`ReceivesBuffersToHost`]; the generator requires both at compile time.

use crate::{FrontendError, FrontendResult};
use gridcore_dsg::{
    get_n_timesteps_in_buffer_space, DataSpecResult, DataSpecWriter, RecordingChannel,
    RecordingConfig, RegionLayout, RunLength,
};
use gridcore_graph::{
    validate_vertex_topology, GraphQuery, Placement, TopologyError, ValidatedTopology, VertexId,
};
use serde::{Deserialize, Serialize};

/// Anything that lives in a machine graph
pub trait MachineVertex {
    fn label(&self) -> &str;
}

/// Executable image, timestep and run length shared by every simulated vertex
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulatorVertex {
    label: String,
    binary_name: String,
    machine_time_step: u32,
    run_length: Option<RunLength>,
}

impl SimulatorVertex {
    pub fn new(label: impl Into<String>, binary_name: impl Into<String>, machine_time_step: u32) -> Self {
        Self {
            label: label.into(),
            binary_name: binary_name.into(),
            machine_time_step,
            run_length: None,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn binary_name(&self) -> &str {
        &self.binary_name
    }

    /// Timestep in microseconds
    pub fn machine_time_step(&self) -> u32 {
        self.machine_time_step
    }

    /// Run length, indefinite until set
    pub fn run_length(&self) -> RunLength {
        self.run_length.unwrap_or_default()
    }

    /// Fix the run length; allowed once per vertex
    pub fn set_run_length(&mut self, run_length: RunLength) -> FrontendResult<()> {
        if self.run_length.is_some() {
            return Err(FrontendError::RunLengthAlreadySet {
                label: self.label.clone(),
            });
        }
        self.run_length = Some(run_length);
        Ok(())
    }
}

/// What a vertex's region writers may look at
pub struct WriteContext<'g, G: GraphQuery> {
    pub vertex_id: VertexId,
    pub graph: &'g G,
    pub topology: ValidatedTopology<'g>,
    /// First key of the vertex's outgoing partition, if one was allocated
    pub routing_key: Option<u32>,
}

/// A vertex that can generate its start-of-day data
///
/// The generator drives the hooks in a fixed order: transmission, state,
/// neighbour state. Each hook focuses its own region.
pub trait DataSpecable: MachineVertex + Sized + Sync {
    /// Incoming edges the vertex protocol requires
    const FAN_IN: usize;

    fn simulator(&self) -> &SimulatorVertex;

    /// Every region the vertex needs, built fresh for each pass
    ///
    /// Fails when a region size cannot be represented, e.g. an oversized
    /// recording buffer.
    fn region_layout(&self, recording: &RecordingConfig) -> DataSpecResult<RegionLayout>;

    fn system_region_id(&self) -> u32 {
        0
    }

    fn dtcm_bytes(&self) -> u32 {
        0
    }

    fn cpu_cycle_estimate(&self) -> u32 {
        0
    }

    fn validate_topology<'g, G: GraphQuery<Vertex = Self>>(
        &self,
        graph: &'g G,
        id: VertexId,
    ) -> Result<ValidatedTopology<'g>, TopologyError> {
        validate_vertex_topology(graph, id, Self::FAN_IN)
    }

    fn write_transmission<G: GraphQuery<Vertex = Self>>(
        &self,
        spec: &mut DataSpecWriter,
        ctx: &WriteContext<'_, G>,
    ) -> DataSpecResult<()>;

    fn write_state(&self, spec: &mut DataSpecWriter) -> DataSpecResult<()>;

    fn write_neighbour_state<G: GraphQuery<Vertex = Self>>(
        &self,
        spec: &mut DataSpecWriter,
        ctx: &WriteContext<'_, G>,
    ) -> DataSpecResult<()>;
}

/// A vertex that records into buffers drained by the host
pub trait ReceivesBuffersToHost {
    /// Region holding the recording header and channel buffers
    fn recording_region_id(&self) -> u32;

    fn recording_channels(&self, recording: &RecordingConfig) -> Vec<RecordingChannel>;

    /// Bytes recorded per timestep, one entry per channel
    fn bytes_per_timestep(&self) -> Vec<u32>;

    fn minimum_buffer_sdram_usage(&self) -> u32 {
        1024
    }

    fn n_timesteps_in_buffer_space(&self, buffer_space: u32) -> u32 {
        get_n_timesteps_in_buffer_space(buffer_space, &self.bytes_per_timestep())
    }

    fn recorded_region_ids(&self) -> Vec<u32> {
        vec![0]
    }
}

/// Host-side store of data drained from recording channels
pub trait BufferManager {
    /// Recorded bytes of one channel, and whether the device dropped any
    fn data_for(&self, placement: &Placement, channel: u32) -> (Vec<u8>, bool);
}
