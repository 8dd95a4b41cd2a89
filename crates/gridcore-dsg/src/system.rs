// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! System bootstrap region.
//!
//! Four words read by the core's simulation framework before anything else:
//!
//! | word | content                                          |
//! |------|--------------------------------------------------|
//! | 0    | first 32 bits of MD5(binary name sans extension) |
//! | 1    | timestep in microseconds                         |
//! | 2    | 1 if the run is indefinite, else 0               |
//! | 3    | number of timesteps (0 when indefinite)          |
//!
//! The firmware compares word 0 with its own compiled-in value to check that
//! the right executable image was loaded.

use crate::{DataSpecError, DataSpecResult, DataSpecWriter, BYTES_PER_WORD};
use byteorder::{ByteOrder, LittleEndian};
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Bytes taken by the system region
pub const SYSTEM_BYTES_REQUIREMENT: u32 = 4 * BYTES_PER_WORD;

/// How long a vertex runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RunLength {
    #[default]
    Indefinite,
    Steps(u32),
}

impl RunLength {
    pub fn from_steps(steps: Option<u32>) -> Self {
        match steps {
            Some(n) => RunLength::Steps(n),
            None => RunLength::Indefinite,
        }
    }

    /// Two-word on-chip encoding: `(1, 0)` runs forever, `(0, N)` runs N steps
    pub const fn encode(self) -> (u32, u32) {
        match self {
            RunLength::Indefinite => (1, 0),
            RunLength::Steps(n) => (0, n),
        }
    }

    pub fn decode(infinite_flag: u32, steps: u32) -> Option<Self> {
        match (infinite_flag, steps) {
            (1, 0) => Some(RunLength::Indefinite),
            (0, n) => Some(RunLength::Steps(n)),
            _ => None,
        }
    }
}

/// Fingerprint of an executable image name
///
/// The extension is dropped first, so `conways_cell.aplx` and `conways_cell`
/// give the same value.
///
/// # Example
/// ```
/// use gridcore_dsg::binary_fingerprint;
///
/// assert_eq!(binary_fingerprint("conways_cell.aplx"), 0xf136558f);
/// assert_eq!(format!("{:08x}", binary_fingerprint("conways_cell")), "f136558f");
/// ```
pub fn binary_fingerprint(binary_name: &str) -> u32 {
    let application_name = Path::new(binary_name).with_extension("");
    let mut hasher = Md5::new();
    hasher.update(application_name.to_string_lossy().as_bytes());
    let digest = hasher.finalize();
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}

/// Focus `region` and write the system bootstrap words into it
pub fn write_system_region(
    spec: &mut DataSpecWriter,
    region: u32,
    binary_name: &str,
    machine_time_step: u32,
    run_length: RunLength,
) -> DataSpecResult<()> {
    let (infinite_flag, steps) = run_length.encode();
    spec.focus(region)?;
    spec.write_array(&[
        binary_fingerprint(binary_name),
        machine_time_step,
        infinite_flag,
        steps,
    ])
}

/// Decoded contents of a system region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemRegion {
    pub fingerprint: u32,
    pub machine_time_step: u32,
    pub run_length: RunLength,
}

impl SystemRegion {
    pub fn decode(region: u32, bytes: &[u8]) -> DataSpecResult<Self> {
        if bytes.len() < SYSTEM_BYTES_REQUIREMENT as usize {
            return Err(DataSpecError::MalformedRegion {
                region,
                reason: format!(
                    "system region needs {} bytes, got {}",
                    SYSTEM_BYTES_REQUIREMENT,
                    bytes.len()
                ),
            });
        }
        let word = |i: usize| LittleEndian::read_u32(&bytes[i * 4..i * 4 + 4]);
        let run_length = RunLength::decode(word(2), word(3)).ok_or_else(|| {
            DataSpecError::MalformedRegion {
                region,
                reason: format!("invalid run length encoding ({}, {})", word(2), word(3)),
            }
        })?;

        Ok(Self {
            fingerprint: word(0),
            machine_time_step: word(1),
            run_length,
        })
    }
}
