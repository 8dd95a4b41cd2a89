// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/// Result type for data specification operations
pub type DataSpecResult<T> = Result<T, DataSpecError>;

/// Errors raised while building or decoding a data specification.
///
/// Every variant is a protocol-contract violation: the sizes a vertex
/// declared do not match what it tried to write. None of them are retried and
/// the partially built stream must be dropped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataSpecError {
    #[error("Region {0} is already reserved")]
    DuplicateRegion(u32),

    #[error("Region {0} has not been reserved")]
    UnknownRegion(u32),

    #[error("Region {region} cannot be reserved with size {size}")]
    InvalidSize { region: u32, size: u32 },

    #[error("{0} does not fit in 32-bit SDRAM addressing")]
    SizeOverflow(String),

    #[error("Write of {attempted} bytes at offset {offset} overflows region {region} of size {size}")]
    RegionOverflow {
        region: u32,
        size: u32,
        offset: u32,
        attempted: u32,
    },

    #[error("No region has write focus")]
    NoRegionFocused,

    #[error("Value {value:#x} does not fit in {width} bytes")]
    ValueTooWide { value: u64, width: u32 },

    #[error("Recording header is {actual} bytes but {expected} bytes were assumed")]
    HeaderSizeMismatch { expected: u32, actual: u32 },

    #[error("Blob of {actual} bytes does not match layout of {expected} bytes")]
    LayoutMismatch { expected: u32, actual: u32 },

    #[error("Malformed region {region}: {reason}")]
    MalformedRegion { region: u32, reason: String },

    #[error("Failed to persist data specification: {0}")]
    Io(String),
}

impl From<std::io::Error> for DataSpecError {
    fn from(err: std::io::Error) -> Self {
        DataSpecError::Io(err.to_string())
    }
}
