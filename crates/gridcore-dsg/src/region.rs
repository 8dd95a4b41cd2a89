// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Explicit region layouts.
//!
//! A vertex builds its [`RegionLayout`] at generation time. The same layout
//! drives the writer's reservations, the resource model's SDRAM figure and the
//! reader's slicing, so the three can never disagree.

use crate::{DataSpecError, DataSpecResult, DataSpecWriter};
use serde::{Deserialize, Serialize};

/// One reserved region: id, byte size and optional label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionSpec {
    pub id: u32,
    pub size: u32,
    pub label: Option<String>,
}

impl RegionSpec {
    pub fn new(id: u32, size: u32, label: &str) -> Self {
        Self {
            id,
            size,
            label: Some(label.to_string()),
        }
    }

    pub fn unlabelled(id: u32, size: u32) -> Self {
        Self {
            id,
            size,
            label: None,
        }
    }
}

/// Ordered list of regions for one vertex
///
/// # Example
/// ```
/// use gridcore_dsg::{RegionLayout, RegionSpec};
///
/// let layout = RegionLayout::new(vec![
///     RegionSpec::new(0, 16, "system"),
///     RegionSpec::new(1, 8, "inputs"),
/// ]);
/// assert_eq!(layout.total_bytes(), Ok(24));
/// assert_eq!(layout.offset_of(1), Some(16));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionLayout {
    regions: Vec<RegionSpec>,
}

impl RegionLayout {
    pub fn new(regions: Vec<RegionSpec>) -> Self {
        Self { regions }
    }

    pub fn push(&mut self, region: RegionSpec) {
        self.regions.push(region);
    }

    /// Regions in declaration (reservation) order
    pub fn regions(&self) -> &[RegionSpec] {
        &self.regions
    }

    pub fn get(&self, id: u32) -> Option<&RegionSpec> {
        self.regions.iter().find(|r| r.id == id)
    }

    pub fn size_of(&self, id: u32) -> Option<u32> {
        self.get(id).map(|r| r.size)
    }

    /// Sum of every declared region size
    ///
    /// # Errors
    /// `SizeOverflow` if the sum does not fit in a `u32`.
    pub fn total_bytes(&self) -> DataSpecResult<u32> {
        self.regions
            .iter()
            .try_fold(0u32, |total, r| total.checked_add(r.size))
            .ok_or_else(|| {
                DataSpecError::SizeOverflow(format!("layout of {} regions", self.regions.len()))
            })
    }

    /// Byte offset of a region inside the finalized stream (ascending id order)
    pub fn offset_of(&self, id: u32) -> Option<u32> {
        self.get(id)?;
        self.regions
            .iter()
            .filter(|r| r.id < id)
            .try_fold(0u32, |offset, r| offset.checked_add(r.size))
    }

    /// Reserve every region in declaration order
    pub fn reserve_all(&self, spec: &mut DataSpecWriter) -> DataSpecResult<()> {
        for region in &self.regions {
            spec.reserve(region.id, region.size, region.label.as_deref())?;
        }
        Ok(())
    }

    /// Check that a blob has exactly the size this layout implies
    pub fn check_blob_len(&self, len: usize) -> DataSpecResult<()> {
        let expected = self.total_bytes()?;
        if len != expected as usize {
            return Err(DataSpecError::LayoutMismatch {
                expected,
                actual: len as u32,
            });
        }
        Ok(())
    }
}
