// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Resource requirements reported to the external allocator.

use crate::recording::Endpoint;
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// An IP tag the board must route to a host endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IpTagResource {
    pub host: Ipv4Addr,
    pub port: u16,
    /// Strip the SDP header before forwarding
    pub strip_sdp: bool,
}

impl IpTagResource {
    pub fn from_endpoint(endpoint: Endpoint) -> Self {
        Self {
            host: endpoint.host,
            port: endpoint.port,
            strip_sdp: true,
        }
    }
}

/// What one vertex needs from the core it is placed on
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceContainer {
    pub sdram_bytes: u32,
    pub dtcm_bytes: u32,
    pub cpu_cycle_estimate: u32,
    pub iptags: Vec<IpTagResource>,
}

impl ResourceContainer {
    pub fn new(sdram_bytes: u32, dtcm_bytes: u32, cpu_cycle_estimate: u32) -> Self {
        Self {
            sdram_bytes,
            dtcm_bytes,
            cpu_cycle_estimate,
            iptags: Vec::new(),
        }
    }

    pub fn with_sdram(sdram_bytes: u32) -> Self {
        Self::new(sdram_bytes, 0, 0)
    }

    /// Add another container's requirements to this one
    ///
    /// Numeric budgets add up; IP tags are merged without duplicates.
    pub fn extend(&mut self, other: &ResourceContainer) {
        self.sdram_bytes += other.sdram_bytes;
        self.dtcm_bytes += other.dtcm_bytes;
        self.cpu_cycle_estimate += other.cpu_cycle_estimate;
        for tag in &other.iptags {
            if !self.iptags.contains(tag) {
                self.iptags.push(*tag);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extend_sums_and_dedups_tags() {
        let tag = IpTagResource::from_endpoint(Endpoint::new(Ipv4Addr::LOCALHOST, 17896));
        let mut base = ResourceContainer::new(100, 10, 1);
        base.iptags.push(tag);
        let mut other = ResourceContainer::new(28, 2, 3);
        other.iptags.push(tag);

        base.extend(&other);

        assert_eq!(base.sdram_bytes, 128);
        assert_eq!(base.dtcm_bytes, 12);
        assert_eq!(base.cpu_cycle_estimate, 4);
        assert_eq!(base.iptags, vec![tag]);
    }
}
