// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Machine graph: vertices, directed edges and outgoing partitions.

use crate::{GraphError, GraphResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a vertex inside its [`MachineGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VertexId(pub usize);

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Directed connection between two vertices, carried by one partition
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub pre: VertexId,
    pub post: VertexId,
    pub partition: String,
}

/// All edges leaving one vertex under the same partition id
///
/// Every edge in a partition shares a single routing key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingPartition {
    pub pre: VertexId,
    pub identifier: String,
    pub edges: Vec<Edge>,
}

/// Read-only view of a graph used during generation
pub trait GraphQuery: Sync {
    type Vertex;

    fn vertex(&self, id: VertexId) -> Option<&Self::Vertex>;

    /// Distinct outgoing partitions of `id`, in first-use order
    fn outgoing_partitions(&self, id: VertexId) -> Vec<&OutgoingPartition>;

    /// Edges whose destination is `id`
    fn incoming_edges(&self, id: VertexId) -> Vec<&Edge>;

    /// Every vertex id, in insertion order
    fn vertex_ids(&self) -> Vec<VertexId>;
}

/// In-memory machine graph
#[derive(Debug, Clone)]
pub struct MachineGraph<V> {
    vertices: Vec<V>,
    partitions: Vec<OutgoingPartition>,
}

impl<V> Default for MachineGraph<V> {
    fn default() -> Self {
        Self {
            vertices: Vec::new(),
            partitions: Vec::new(),
        }
    }
}

impl<V> MachineGraph<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_vertex(&mut self, vertex: V) -> VertexId {
        self.vertices.push(vertex);
        VertexId(self.vertices.len() - 1)
    }

    /// Add a directed edge in `partition`, creating the partition on first use
    ///
    /// Self-loops are stored as given; rejecting them is the validator's job.
    pub fn add_edge(&mut self, pre: VertexId, post: VertexId, partition: &str) -> GraphResult<()> {
        for id in [pre, post] {
            if id.0 >= self.vertices.len() {
                return Err(GraphError::UnknownVertex(id));
            }
        }

        let edge = Edge {
            pre,
            post,
            partition: partition.to_string(),
        };
        match self
            .partitions
            .iter_mut()
            .find(|p| p.pre == pre && p.identifier == partition)
        {
            Some(existing) => existing.edges.push(edge),
            None => self.partitions.push(OutgoingPartition {
                pre,
                identifier: partition.to_string(),
                edges: vec![edge],
            }),
        }
        Ok(())
    }

    pub fn vertex_mut(&mut self, id: VertexId) -> Option<&mut V> {
        self.vertices.get_mut(id.0)
    }

    pub fn n_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn n_edges(&self) -> usize {
        self.partitions.iter().map(|p| p.edges.len()).sum()
    }

    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &V)> {
        self.vertices.iter().enumerate().map(|(i, v)| (VertexId(i), v))
    }
}

impl<V: Sync> GraphQuery for MachineGraph<V> {
    type Vertex = V;

    fn vertex(&self, id: VertexId) -> Option<&V> {
        self.vertices.get(id.0)
    }

    fn outgoing_partitions(&self, id: VertexId) -> Vec<&OutgoingPartition> {
        self.partitions.iter().filter(|p| p.pre == id).collect()
    }

    fn incoming_edges(&self, id: VertexId) -> Vec<&Edge> {
        self.partitions
            .iter()
            .flat_map(|p| p.edges.iter())
            .filter(|e| e.post == id)
            .collect()
    }

    fn vertex_ids(&self) -> Vec<VertexId> {
        (0..self.vertices.len()).map(VertexId).collect()
    }
}
