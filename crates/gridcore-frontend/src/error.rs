// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Front-end error types.

use crate::GenerationStage;
use gridcore_dsg::DataSpecError;
use gridcore_graph::{TopologyError, VertexId};
use std::path::PathBuf;
use thiserror::Error;

/// Why a generation step failed
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationErrorKind {
    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Spec(#[from] DataSpecError),

    #[error("configuration error: {0}")]
    Configuration(String),
}

/// A failed per-vertex generation, tagged with where it stopped
#[derive(Debug, Clone, PartialEq, Error)]
#[error("data spec generation for '{vertex}' failed at {stage}: {kind}")]
pub struct GenerationError {
    pub vertex: String,
    pub stage: GenerationStage,
    #[source]
    pub kind: GenerationErrorKind,
}

impl GenerationError {
    pub fn new(vertex: impl Into<String>, stage: GenerationStage, kind: impl Into<GenerationErrorKind>) -> Self {
        Self {
            vertex: vertex.into(),
            stage,
            kind: kind.into(),
        }
    }

    /// Topology failures are raised before any write; the vertex can be skipped
    pub fn is_topology(&self) -> bool {
        matches!(self.kind, GenerationErrorKind::Topology(_))
    }
}

/// Why one vertex of a batch produced no artifact
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VertexFailure {
    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("vertex {0} has no placement")]
    Unplaced(VertexId),

    #[error("failed to persist {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: DataSpecError,
    },
}

/// Errors outside a single generation pass
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrontendError {
    #[error("run length of '{label}' has already been set")]
    RunLengthAlreadySet { label: String },

    #[error("failed to start worker pool: {0}")]
    WorkerPool(String),
}

pub type FrontendResult<T> = Result<T, FrontendError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_names_vertex_stage_and_cause() {
        let err = GenerationError::new(
            "cell_3_4",
            GenerationStage::ValidateTopology,
            TopologyError::TopologyMismatch {
                expected: 8,
                observed: 9,
            },
        );
        let message = err.to_string();
        assert!(message.contains("cell_3_4"));
        assert!(message.contains("ValidateTopology"));
        assert!(message.contains("observed 9"));
        assert!(err.is_topology());
    }
}
