// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Pre-write topology validation.
//!
//! A generating vertex must have exactly one outgoing partition, a fixed
//! number of incoming edges and no edge from itself. The checks run in that
//! order and stop at the first violation. Nothing is mutated.

use crate::{Edge, GraphQuery, OutgoingPartition, VertexId};
use thiserror::Error;
use tracing::trace;

/// Topology violations; all are detected before any region is written
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopologyError {
    #[error("incoming edge count mismatch: expected {expected}, observed {observed}")]
    TopologyMismatch { expected: usize, observed: usize },

    #[error("vertex must have exactly one outgoing partition, observed {observed}")]
    MultiplePartition { observed: usize },

    #[error("vertex {vertex} has an incoming edge from itself")]
    SelfConnection { vertex: VertexId },
}

/// Borrowed view of a vertex that passed validation
#[derive(Debug, Clone)]
pub struct ValidatedTopology<'g> {
    pub partition: &'g OutgoingPartition,
    pub incoming: Vec<&'g Edge>,
}

/// Check the connectivity of `vertex` against a fixed fan-in
///
/// # Example
/// ```
/// use gridcore_graph::{validate_vertex_topology, MachineGraph, TopologyError};
///
/// let mut graph = MachineGraph::new();
/// let a = graph.add_vertex(());
/// let b = graph.add_vertex(());
/// graph.add_edge(a, b, "STATE").unwrap();
///
/// // `a` has a partition but no incoming edges
/// assert_eq!(
///     validate_vertex_topology(&graph, a, 1).unwrap_err(),
///     TopologyError::TopologyMismatch { expected: 1, observed: 0 }
/// );
/// ```
pub fn validate_vertex_topology<G: GraphQuery>(
    graph: &G,
    vertex: VertexId,
    expected_incoming: usize,
) -> Result<ValidatedTopology<'_>, TopologyError> {
    let partitions = graph.outgoing_partitions(vertex);
    let partition = match partitions.as_slice() {
        [only] => *only,
        other => {
            return Err(TopologyError::MultiplePartition {
                observed: other.len(),
            })
        }
    };

    let incoming = graph.incoming_edges(vertex);
    if incoming.len() != expected_incoming {
        return Err(TopologyError::TopologyMismatch {
            expected: expected_incoming,
            observed: incoming.len(),
        });
    }

    if incoming.iter().any(|edge| edge.pre == vertex) {
        return Err(TopologyError::SelfConnection { vertex });
    }

    trace!(
        target: "gridcore-graph",
        "Vertex {} topology ok: partition '{}', {} incoming",
        vertex,
        partition.identifier,
        incoming.len()
    );
    Ok(ValidatedTopology {
        partition,
        incoming,
    })
}
