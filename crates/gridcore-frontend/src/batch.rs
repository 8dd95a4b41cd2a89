// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Whole-graph generation with persistence.
//!
//! Vertices are generated independently on a bounded rayon pool. A failing
//! vertex is reported and skipped; nothing is persisted for it and the rest
//! of the batch carries on.

use crate::{
    generate_with_report, DataSpecable, FrontendError, FrontendResult, ReceivesBuffersToHost,
    VertexFailure,
};
use gridcore_config::GridcoreConfig;
use gridcore_dsg::{artifact_path, persist_artifacts, ArtifactPaths, RecordingConfig};
use gridcore_graph::{GraphQuery, Placement, Placements, RoutingQuery, VertexId};
use rayon::prelude::*;
use tracing::{info, warn};

/// Settings for one batch run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOptions {
    /// Worker threads; 0 uses the host's parallelism
    pub max_workers: usize,
    /// Run root, or the `TEMP` sentinel
    pub run_root: String,
    pub write_text_specs: bool,
}

impl BatchOptions {
    pub fn from_config(config: &GridcoreConfig) -> Self {
        Self {
            max_workers: config.generation.max_workers,
            run_root: config.reports.application_data_folder.clone(),
            write_text_specs: config.reports.write_text_specs,
        }
    }
}

/// Result for one vertex of a batch
#[derive(Debug, Clone)]
pub struct VertexOutcome {
    pub vertex: VertexId,
    pub placement: Option<Placement>,
    pub result: Result<ArtifactPaths, VertexFailure>,
}

/// Per-vertex results, ordered by vertex id
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub outcomes: Vec<VertexOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &VertexOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = &VertexOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }

    pub fn is_complete(&self) -> bool {
        self.failed().next().is_none()
    }
}

fn generate_and_persist<V, G, R>(
    vertex: VertexId,
    placement: &Placement,
    graph: &G,
    routing: &R,
    recording: &RecordingConfig,
    options: &BatchOptions,
) -> Result<ArtifactPaths, VertexFailure>
where
    V: DataSpecable + ReceivesBuffersToHost,
    G: GraphQuery<Vertex = V>,
    R: RoutingQuery,
{
    let generated = generate_with_report(
        vertex,
        graph,
        routing,
        placement,
        recording,
        options.write_text_specs,
    )?;

    let paths = artifact_path(
        &placement.hostname,
        placement.x,
        placement.y,
        placement.p,
        &options.run_root,
        options.write_text_specs,
    );
    persist_artifacts(&paths, &generated.bytes, generated.text_report.as_deref()).map_err(|source| {
        VertexFailure::Persist {
            path: paths.binary.clone(),
            source,
        }
    })?;
    Ok(paths)
}

/// Generate and persist the data specification of every vertex in `graph`
///
/// # Errors
/// Only a worker pool that cannot be started fails the whole call; vertex
/// failures are collected in the returned report.
pub fn generate_all<V, G, R>(
    graph: &G,
    routing: &R,
    placements: &Placements,
    recording: &RecordingConfig,
    options: &BatchOptions,
) -> FrontendResult<BatchReport>
where
    V: DataSpecable + ReceivesBuffersToHost,
    G: GraphQuery<Vertex = V>,
    R: RoutingQuery,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.max_workers)
        .build()
        .map_err(|e| FrontendError::WorkerPool(e.to_string()))?;

    let vertex_ids = graph.vertex_ids();
    info!(
        target: "gridcore-frontend",
        "Generating data specs for {} vertices on {} workers",
        vertex_ids.len(),
        pool.current_num_threads()
    );

    let outcomes: Vec<VertexOutcome> = pool.install(|| {
        vertex_ids
            .par_iter()
            .map(|&vertex| {
                let placement = placements.get(vertex).cloned();
                let result = match &placement {
                    Some(placement) => {
                        generate_and_persist(vertex, placement, graph, routing, recording, options)
                    }
                    None => Err(VertexFailure::Unplaced(vertex)),
                };
                if let Err(e) = &result {
                    warn!(target: "gridcore-frontend", "Skipping vertex {}: {}", vertex, e);
                }
                VertexOutcome {
                    vertex,
                    placement,
                    result,
                }
            })
            .collect()
    });

    let report = BatchReport { outcomes };
    info!(
        target: "gridcore-frontend",
        "Data spec generation finished: {} written, {} failed",
        report.succeeded().count(),
        report.failed().count()
    );
    Ok(report)
}
