// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Where each vertex runs.

use crate::VertexId;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Physical location of one core; never changes after placement
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    pub hostname: String,
    pub x: u32,
    pub y: u32,
    pub p: u32,
}

impl Placement {
    pub fn new(hostname: impl Into<String>, x: u32, y: u32, p: u32) -> Self {
        Self {
            hostname: hostname.into(),
            x,
            y,
            p,
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:({}, {}, {})", self.hostname, self.x, self.y, self.p)
    }
}

/// Placement of every vertex in a graph
#[derive(Debug, Clone, Default)]
pub struct Placements {
    by_vertex: AHashMap<VertexId, Placement>,
}

impl Placements {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, vertex: VertexId, placement: Placement) {
        self.by_vertex.insert(vertex, placement);
    }

    pub fn get(&self, vertex: VertexId) -> Option<&Placement> {
        self.by_vertex.get(&vertex)
    }

    pub fn len(&self) -> usize {
        self.by_vertex.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_vertex.is_empty()
    }

    /// Placements sorted by vertex id
    pub fn iter_sorted(&self) -> Vec<(VertexId, &Placement)> {
        let mut entries: Vec<_> = self.by_vertex.iter().map(|(v, p)| (*v, p)).collect();
        entries.sort_by_key(|(v, _)| *v);
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_iteration() {
        let mut placements = Placements::new();
        placements.insert(VertexId(2), Placement::new("host", 0, 0, 3));
        placements.insert(VertexId(0), Placement::new("host", 0, 0, 1));

        let order: Vec<_> = placements.iter_sorted().into_iter().map(|(v, _)| v).collect();
        assert_eq!(order, vec![VertexId(0), VertexId(2)]);
        assert_eq!(placements.get(VertexId(2)).unwrap().to_string(), "host:(0, 0, 3)");
        assert!(placements.get(VertexId(1)).is_none());
    }
}
