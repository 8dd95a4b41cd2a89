// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Per-vertex data specification generation.
//!
//! One pass walks a fixed sequence of stages:
//!
//! ```text
//! Start -> ValidateTopology -> ReserveRegions -> WriteSystem -> WriteTransmission
//!       -> WriteState -> WriteNeighbourState -> WriteRecordingHeader -> Finalize -> Done
//! ```
//!
//! Any failing stage moves the pass to `Failed` and the partially built
//! stream is dropped. Topology is checked before anything is reserved.

use crate::{DataSpecable, GenerationError, GenerationErrorKind, ReceivesBuffersToHost, WriteContext};
use gridcore_dsg::{
    recording_resources, write_system_region, DataSpecResult, DataSpecWriter, RecordingConfig,
    RecordingHeader, RegionLayout, ResourceContainer,
};
use gridcore_graph::{GraphQuery, Placement, RoutingQuery, VertexId};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, trace, warn};

/// Position of a generation pass in its linear state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GenerationStage {
    Start,
    ValidateTopology,
    ReserveRegions,
    WriteSystem,
    WriteTransmission,
    WriteState,
    WriteNeighbourState,
    WriteRecordingHeader,
    Finalize,
    Done,
    Failed,
}

impl GenerationStage {
    /// The stage after this one; `Done` and `Failed` are absorbing
    pub const fn next(self) -> Self {
        use GenerationStage::*;
        match self {
            Start => ValidateTopology,
            ValidateTopology => ReserveRegions,
            ReserveRegions => WriteSystem,
            WriteSystem => WriteTransmission,
            WriteTransmission => WriteState,
            WriteState => WriteNeighbourState,
            WriteNeighbourState => WriteRecordingHeader,
            WriteRecordingHeader => Finalize,
            Finalize => Done,
            Done => Done,
            Failed => Failed,
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, GenerationStage::Done | GenerationStage::Failed)
    }
}

impl fmt::Display for GenerationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Tracks the stage of one pass and tags failures with it
#[derive(Debug)]
pub struct StageTracker {
    label: String,
    stage: GenerationStage,
}

impl StageTracker {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            stage: GenerationStage::Start,
        }
    }

    pub fn stage(&self) -> GenerationStage {
        self.stage
    }

    /// Move to the next stage and return it
    pub fn advance(&mut self) -> GenerationStage {
        self.stage = self.stage.next();
        trace!(target: "gridcore-frontend", "[{}] -> {}", self.label, self.stage);
        self.stage
    }

    /// Record a failure at the current stage; the tracker ends in `Failed`
    pub fn fail(&mut self, kind: impl Into<GenerationErrorKind>) -> GenerationError {
        let err = GenerationError::new(self.label.clone(), self.stage, kind);
        self.stage = GenerationStage::Failed;
        err
    }
}

/// Output of a successful pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSpec {
    pub bytes: Vec<u8>,
    pub layout: RegionLayout,
    /// One line per written value, when requested
    pub text_report: Option<String>,
}

/// Generate the data specification of one vertex
///
/// Returns the finalized blob. Nothing is written to disk.
pub fn generate<V, G, R>(
    vertex_id: VertexId,
    graph: &G,
    routing: &R,
    placement: &Placement,
    recording: &RecordingConfig,
) -> Result<Vec<u8>, GenerationError>
where
    V: DataSpecable + ReceivesBuffersToHost,
    G: GraphQuery<Vertex = V>,
    R: RoutingQuery,
{
    generate_with_report(vertex_id, graph, routing, placement, recording, false).map(|spec| spec.bytes)
}

/// Generate one vertex, optionally keeping a text mirror of every write
pub fn generate_with_report<V, G, R>(
    vertex_id: VertexId,
    graph: &G,
    routing: &R,
    placement: &Placement,
    recording: &RecordingConfig,
    text_mirror: bool,
) -> Result<GeneratedSpec, GenerationError>
where
    V: DataSpecable + ReceivesBuffersToHost,
    G: GraphQuery<Vertex = V>,
    R: RoutingQuery,
{
    let vertex = graph.vertex(vertex_id).ok_or_else(|| {
        GenerationError::new(
            vertex_id.to_string(),
            GenerationStage::Start,
            GenerationErrorKind::Configuration(format!("vertex {} is not in the graph", vertex_id)),
        )
    })?;
    let mut tracker = StageTracker::new(vertex.label());
    debug!(target: "gridcore-frontend", "Generating data spec for '{}' at {}", vertex.label(), placement);

    tracker.advance();
    let topology = vertex
        .validate_topology(graph, vertex_id)
        .map_err(|e| tracker.fail(e))?;
    let routing_key = routing.first_key(vertex_id, &topology.partition.identifier);
    if routing_key.is_none() {
        warn!(
            target: "gridcore-frontend",
            "No routing key for partition '{}' of '{}'; the core will not transmit",
            topology.partition.identifier,
            vertex.label()
        );
    }
    let ctx = WriteContext {
        vertex_id,
        graph,
        topology,
        routing_key,
    };

    let mut spec = if text_mirror {
        DataSpecWriter::with_text_mirror()
    } else {
        DataSpecWriter::new()
    };

    tracker.advance();
    let layout = vertex
        .region_layout(recording)
        .and_then(|layout| {
            layout.reserve_all(&mut spec)?;
            Ok(layout)
        })
        .map_err(|e| tracker.fail(e))?;

    tracker.advance();
    let simulator = vertex.simulator();
    write_system_region(
        &mut spec,
        vertex.system_region_id(),
        simulator.binary_name(),
        simulator.machine_time_step(),
        simulator.run_length(),
    )
    .map_err(|e| tracker.fail(e))?;

    tracker.advance();
    vertex.write_transmission(&mut spec, &ctx).map_err(|e| tracker.fail(e))?;

    tracker.advance();
    vertex.write_state(&mut spec).map_err(|e| tracker.fail(e))?;

    tracker.advance();
    vertex.write_neighbour_state(&mut spec, &ctx).map_err(|e| tracker.fail(e))?;

    tracker.advance();
    let channels = vertex.recording_channels(recording);
    RecordingHeader::from_config(&channels, recording)
        .and_then(|header| header.write_into(&mut spec, vertex.recording_region_id()))
        .map_err(|e| tracker.fail(e))?;

    tracker.advance();
    let bytes = spec.finalize();
    layout.check_blob_len(bytes.len()).map_err(|e| tracker.fail(e))?;
    let text_report = spec.text_report();

    tracker.advance();
    debug!(
        target: "gridcore-frontend",
        "Generated {} bytes in {} regions for '{}'",
        bytes.len(),
        layout.regions().len(),
        vertex.label()
    );
    Ok(GeneratedSpec {
        bytes,
        layout,
        text_report,
    })
}

/// Resources the vertex needs; SDRAM equals the length of its generated blob
///
/// # Errors
/// `SizeOverflow` when the layout does not fit in 32-bit SDRAM addressing.
pub fn required_resources<V>(vertex: &V, recording: &RecordingConfig) -> DataSpecResult<ResourceContainer>
where
    V: DataSpecable + ReceivesBuffersToHost,
{
    let layout = vertex.region_layout(recording)?;
    let mut resources = ResourceContainer::new(
        layout.total_bytes()?,
        vertex.dtcm_bytes(),
        vertex.cpu_cycle_estimate(),
    );
    resources.iptags = recording_resources(&vertex.recording_channels(recording))?.iptags;
    Ok(resources)
}
