// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Routing keys assigned to (source vertex, partition) pairs.

use crate::VertexId;
use ahash::AHashMap;

/// Lookup of the first routing key of a partition
pub trait RoutingQuery: Sync {
    fn first_key(&self, vertex: VertexId, partition: &str) -> Option<u32>;
}

/// Keys allocated by the router, one per outgoing partition
#[derive(Debug, Clone, Default)]
pub struct RoutingInfo {
    keys: AHashMap<(VertexId, String), u32>,
}

impl RoutingInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the key of a partition, returning the key it replaced
    pub fn insert(&mut self, vertex: VertexId, partition: &str, key: u32) -> Option<u32> {
        self.keys.insert((vertex, partition.to_string()), key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl RoutingQuery for RoutingInfo {
    fn first_key(&self, vertex: VertexId, partition: &str) -> Option<u32> {
        self.keys.get(&(vertex, partition.to_string())).copied()
    }
}
