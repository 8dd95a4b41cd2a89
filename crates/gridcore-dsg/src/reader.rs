// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Read-back of finalized data specifications.

use crate::{DataSpecError, DataSpecResult, RegionLayout, BYTES_PER_WORD};
use byteorder::{ByteOrder, LittleEndian};

/// Slices a finalized blob into the regions of the layout that produced it
///
/// # Example
/// ```
/// use gridcore_dsg::{DataSpecReader, DataSpecWriter, RegionLayout, RegionSpec};
///
/// let layout = RegionLayout::new(vec![RegionSpec::new(0, 8, "inputs")]);
/// let mut spec = DataSpecWriter::new();
/// layout.reserve_all(&mut spec).unwrap();
/// spec.focus(0).unwrap();
/// spec.write_array(&[1, 42]).unwrap();
///
/// let bytes = spec.finalize();
/// let reader = DataSpecReader::new(&bytes, &layout).unwrap();
/// assert_eq!(reader.words(0).unwrap(), vec![1, 42]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DataSpecReader<'a> {
    bytes: &'a [u8],
    layout: &'a RegionLayout,
}

impl<'a> DataSpecReader<'a> {
    pub fn new(bytes: &'a [u8], layout: &'a RegionLayout) -> DataSpecResult<Self> {
        layout.check_blob_len(bytes.len())?;
        Ok(Self { bytes, layout })
    }

    /// Raw bytes of one region, padding included
    pub fn region(&self, id: u32) -> DataSpecResult<&'a [u8]> {
        let size = self.layout.size_of(id).ok_or(DataSpecError::UnknownRegion(id))?;
        let offset = self.layout.offset_of(id).ok_or(DataSpecError::UnknownRegion(id))?;
        Ok(&self.bytes[offset as usize..(offset + size) as usize])
    }

    /// Region contents as little-endian 32-bit words
    pub fn words(&self, id: u32) -> DataSpecResult<Vec<u32>> {
        let region = self.region(id)?;
        if region.len() % BYTES_PER_WORD as usize != 0 {
            return Err(DataSpecError::MalformedRegion {
                region: id,
                reason: format!("{} bytes is not a whole number of words", region.len()),
            });
        }
        Ok(region.chunks_exact(4).map(LittleEndian::read_u32).collect())
    }

    /// A single word of a region
    pub fn word(&self, id: u32, index: usize) -> DataSpecResult<u32> {
        let region = self.region(id)?;
        let start = index * BYTES_PER_WORD as usize;
        region
            .get(start..start + 4)
            .map(LittleEndian::read_u32)
            .ok_or_else(|| DataSpecError::MalformedRegion {
                region: id,
                reason: format!("word {} is past the end of the region", index),
            })
    }
}
