// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Region-addressed data specification writer.
//!
//! Regions are reserved up front with a fixed size. Exactly one region has
//! write focus at a time and every region keeps its own linear cursor, so
//! switching focus away and back resumes where the last write stopped.
//! Finalizing concatenates the regions in ascending id order, zero-padding
//! each one to its reserved size.

use crate::{DataSpecError, DataSpecResult};
use byteorder::{ByteOrder, LittleEndian};
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Width of a single encoded value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataWidth {
    U8,
    U16,
    U32,
    U64,
}

impl DataWidth {
    pub const fn bytes(self) -> u32 {
        match self {
            DataWidth::U8 => 1,
            DataWidth::U16 => 2,
            DataWidth::U32 => 4,
            DataWidth::U64 => 8,
        }
    }

    const fn max_value(self) -> u64 {
        match self {
            DataWidth::U8 => u8::MAX as u64,
            DataWidth::U16 => u16::MAX as u64,
            DataWidth::U32 => u32::MAX as u64,
            DataWidth::U64 => u64::MAX,
        }
    }

    fn encode(self, value: u64, out: &mut Vec<u8>) {
        let mut buf = [0u8; 8];
        match self {
            DataWidth::U8 => buf[0] = value as u8,
            DataWidth::U16 => LittleEndian::write_u16(&mut buf[..2], value as u16),
            DataWidth::U32 => LittleEndian::write_u32(&mut buf[..4], value as u32),
            DataWidth::U64 => LittleEndian::write_u64(&mut buf, value),
        }
        out.extend_from_slice(&buf[..self.bytes() as usize]);
    }
}

impl Default for DataWidth {
    fn default() -> Self {
        DataWidth::U32
    }
}

#[derive(Debug, Clone)]
struct Region {
    size: u32,
    label: Option<String>,
    /// Bytes written so far; its length is the region's cursor
    data: Vec<u8>,
}

impl Region {
    fn cursor(&self) -> u32 {
        self.data.len() as u32
    }
}

/// Append-only encoder for one vertex's data specification
///
/// # Example
/// ```
/// use gridcore_dsg::{DataSpecError, DataSpecWriter};
///
/// let mut spec = DataSpecWriter::new();
/// spec.reserve(1, 4, Some("state")).unwrap();
/// spec.focus(1).unwrap();
/// spec.write_value(7).unwrap();
///
/// // a second word does not fit in a 4-byte region
/// assert!(matches!(spec.write_value(8), Err(DataSpecError::RegionOverflow { .. })));
/// assert_eq!(spec.finalize(), vec![7, 0, 0, 0]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DataSpecWriter {
    regions: BTreeMap<u32, Region>,
    focused: Option<u32>,
    text_mirror: Option<Vec<String>>,
}

impl DataSpecWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writer that also records one human-readable line per written value
    pub fn with_text_mirror() -> Self {
        Self {
            text_mirror: Some(Vec::new()),
            ..Self::default()
        }
    }

    /// Reserve a region of `size` bytes
    ///
    /// # Errors
    /// - `DuplicateRegion` if `region` is already reserved in this pass
    /// - `InvalidSize` if `size` is zero
    /// - `SizeOverflow` if the running total would not fit in a `u32`
    pub fn reserve(&mut self, region: u32, size: u32, label: Option<&str>) -> DataSpecResult<()> {
        if self.regions.contains_key(&region) {
            return Err(DataSpecError::DuplicateRegion(region));
        }
        if size == 0 {
            return Err(DataSpecError::InvalidSize { region, size });
        }
        if self.total_reserved().checked_add(size).is_none() {
            return Err(DataSpecError::SizeOverflow(format!(
                "region {} of {} bytes after {} reserved",
                region,
                size,
                self.total_reserved()
            )));
        }

        debug!(target: "gridcore-dsg", "Reserved region {} ({:?}): {} bytes", region, label, size);
        self.regions.insert(
            region,
            Region {
                size,
                label: label.map(str::to_string),
                data: Vec::with_capacity(size as usize),
            },
        );
        Ok(())
    }

    /// Move write focus to a reserved region
    pub fn focus(&mut self, region: u32) -> DataSpecResult<()> {
        if !self.regions.contains_key(&region) {
            return Err(DataSpecError::UnknownRegion(region));
        }
        self.focused = Some(region);
        Ok(())
    }

    pub fn focused_region(&self) -> Option<u32> {
        self.focused
    }

    /// Write a 32-bit word at the focused region's cursor
    pub fn write_value(&mut self, value: u32) -> DataSpecResult<()> {
        self.write_scalar(value as u64, DataWidth::U32)
    }

    /// Write `value` using `width` bytes, little-endian
    pub fn write_scalar(&mut self, value: u64, width: DataWidth) -> DataSpecResult<()> {
        self.write_values(std::slice::from_ref(&value), width)
    }

    /// Write a sequence of 32-bit words
    pub fn write_array(&mut self, values: &[u32]) -> DataSpecResult<()> {
        let widened: Vec<u64> = values.iter().map(|&v| v as u64).collect();
        self.write_values(&widened, DataWidth::U32)
    }

    /// Write a sequence of values of the given width
    ///
    /// The whole array is checked before any byte is written, so a failing
    /// call leaves the region exactly as it was.
    pub fn write_array_with_width(&mut self, values: &[u64], width: DataWidth) -> DataSpecResult<()> {
        self.write_values(values, width)
    }

    fn write_values(&mut self, values: &[u64], width: DataWidth) -> DataSpecResult<()> {
        let region_id = self.focused.ok_or(DataSpecError::NoRegionFocused)?;
        let region = self
            .regions
            .get_mut(&region_id)
            .ok_or(DataSpecError::UnknownRegion(region_id))?;

        if let Some(&value) = values.iter().find(|&&v| v > width.max_value()) {
            return Err(DataSpecError::ValueTooWide {
                value,
                width: width.bytes(),
            });
        }

        let offset = region.cursor();
        let attempted = width.bytes() as u64 * values.len() as u64;
        if offset as u64 + attempted > region.size as u64 {
            return Err(DataSpecError::RegionOverflow {
                region: region_id,
                size: region.size,
                offset,
                attempted: attempted.min(u32::MAX as u64) as u32,
            });
        }

        for (index, &value) in values.iter().enumerate() {
            if let Some(lines) = self.text_mirror.as_mut() {
                lines.push(format!(
                    "region {} ({}) offset {:#06x}: WRITE {} [{} bytes]",
                    region_id,
                    region.label.as_deref().unwrap_or("-"),
                    offset + index as u32 * width.bytes(),
                    value,
                    width.bytes()
                ));
            }
            width.encode(value, &mut region.data);
        }
        trace!(target: "gridcore-dsg", "Wrote {} bytes to region {} at offset {}", attempted, region_id, offset);
        Ok(())
    }

    /// Reserved size of a region
    pub fn region_size(&self, region: u32) -> Option<u32> {
        self.regions.get(&region).map(|r| r.size)
    }

    /// Bytes written so far into a region
    pub fn bytes_written(&self, region: u32) -> Option<u32> {
        self.regions.get(&region).map(Region::cursor)
    }

    pub fn region_label(&self, region: u32) -> Option<&str> {
        self.regions.get(&region).and_then(|r| r.label.as_deref())
    }

    /// Sum of every reserved region size
    pub fn total_reserved(&self) -> u32 {
        self.regions.values().map(|r| r.size).sum()
    }

    /// Concatenate all regions in ascending id order, zero-padded
    ///
    /// Takes `&self`, so calling it again yields the same bytes.
    pub fn finalize(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.total_reserved() as usize);
        for region in self.regions.values() {
            bytes.extend_from_slice(&region.data);
            bytes.resize(bytes.len() + (region.size as usize - region.data.len()), 0);
        }
        bytes
    }

    /// Text mirror of every written value in write order, if enabled
    pub fn text_report(&self) -> Option<String> {
        self.text_mirror.as_ref().map(|lines| {
            let mut report = lines.join("\n");
            if !report.is_empty() {
                report.push('\n');
            }
            report
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserve_rejects_duplicates_and_zero_size() {
        let mut spec = DataSpecWriter::new();
        spec.reserve(0, 16, Some("system")).unwrap();

        assert_eq!(
            spec.reserve(0, 4, None),
            Err(DataSpecError::DuplicateRegion(0))
        );
        assert_eq!(
            spec.reserve(1, 0, None),
            Err(DataSpecError::InvalidSize { region: 1, size: 0 })
        );
        assert_eq!(spec.total_reserved(), 16);
    }

    #[test]
    fn test_reserve_rejects_total_beyond_u32() {
        let mut spec = DataSpecWriter::new();
        spec.reserve(0, 16, Some("system")).unwrap();

        assert!(matches!(
            spec.reserve(1, u32::MAX - 8, None),
            Err(DataSpecError::SizeOverflow(_))
        ));
        assert_eq!(spec.region_size(1), None);
        assert_eq!(spec.total_reserved(), 16);
    }

    #[test]
    fn test_focus_unknown_region() {
        let mut spec = DataSpecWriter::new();
        assert_eq!(spec.focus(3), Err(DataSpecError::UnknownRegion(3)));
        assert_eq!(spec.focused_region(), None);
    }

    #[test]
    fn test_write_without_focus() {
        let mut spec = DataSpecWriter::new();
        spec.reserve(0, 4, None).unwrap();
        assert_eq!(spec.write_value(1), Err(DataSpecError::NoRegionFocused));
    }

    #[test]
    fn test_little_endian_widths() {
        let mut spec = DataSpecWriter::new();
        spec.reserve(0, 15, None).unwrap();
        spec.focus(0).unwrap();
        spec.write_scalar(0xAB, DataWidth::U8).unwrap();
        spec.write_scalar(0x1234, DataWidth::U16).unwrap();
        spec.write_scalar(0xDEADBEEF, DataWidth::U32).unwrap();
        spec.write_scalar(0x0102030405060708, DataWidth::U64).unwrap();

        assert_eq!(
            spec.finalize(),
            vec![
                0xAB, 0x34, 0x12, 0xEF, 0xBE, 0xAD, 0xDE, 0x08, 0x07, 0x06, 0x05, 0x04, 0x03,
                0x02, 0x01
            ]
        );
    }

    #[test]
    fn test_value_too_wide_for_width() {
        let mut spec = DataSpecWriter::new();
        spec.reserve(0, 4, None).unwrap();
        spec.focus(0).unwrap();

        assert_eq!(
            spec.write_scalar(256, DataWidth::U8),
            Err(DataSpecError::ValueTooWide { value: 256, width: 1 })
        );
        assert_eq!(spec.bytes_written(0), Some(0));
    }

    #[test]
    fn test_array_overflow_is_checked_before_writing() {
        let mut spec = DataSpecWriter::new();
        spec.reserve(0, 8, None).unwrap();
        spec.reserve(1, 4, None).unwrap();
        spec.focus(1).unwrap();
        spec.write_value(9).unwrap();
        spec.focus(0).unwrap();
        spec.write_value(1).unwrap();

        let result = spec.write_array(&[2, 3]);

        assert_eq!(
            result,
            Err(DataSpecError::RegionOverflow {
                region: 0,
                size: 8,
                offset: 4,
                attempted: 8
            })
        );
        // neither the failing region nor its neighbour changed
        assert_eq!(spec.bytes_written(0), Some(4));
        assert_eq!(spec.finalize(), vec![1, 0, 0, 0, 0, 0, 0, 0, 9, 0, 0, 0]);
    }

    #[test]
    fn test_refocus_resumes_region_cursor() {
        let mut spec = DataSpecWriter::new();
        spec.reserve(0, 8, None).unwrap();
        spec.reserve(1, 4, None).unwrap();

        spec.focus(0).unwrap();
        spec.write_value(1).unwrap();
        spec.focus(1).unwrap();
        spec.write_value(5).unwrap();
        spec.focus(0).unwrap();
        spec.write_value(2).unwrap();

        assert_eq!(spec.finalize(), vec![1, 0, 0, 0, 2, 0, 0, 0, 5, 0, 0, 0]);
    }

    #[test]
    fn test_finalize_orders_by_region_id() {
        let mut spec = DataSpecWriter::new();
        spec.reserve(4, 4, None).unwrap();
        spec.reserve(0, 4, None).unwrap();
        spec.focus(4).unwrap();
        spec.write_value(4).unwrap();
        spec.focus(0).unwrap();
        spec.write_value(1).unwrap();

        assert_eq!(spec.finalize(), vec![1, 0, 0, 0, 4, 0, 0, 0]);
    }

    #[test]
    fn test_text_mirror_lines_in_write_order() {
        let mut spec = DataSpecWriter::with_text_mirror();
        spec.reserve(1, 8, Some("inputs")).unwrap();
        spec.focus(1).unwrap();
        spec.write_array(&[1, 42]).unwrap();

        let report = spec.text_report().unwrap();
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "region 1 (inputs) offset 0x0000: WRITE 1 [4 bytes]");
        assert_eq!(lines[1], "region 1 (inputs) offset 0x0004: WRITE 42 [4 bytes]");

        assert!(DataSpecWriter::new().text_report().is_none());
    }
}
