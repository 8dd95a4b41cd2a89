// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Recording region header.
//!
//! Layout of the header words (u32, little-endian):
//!
//! | word          | content                                        |
//! |---------------|------------------------------------------------|
//! | 0             | channel count `n`                              |
//! | 1             | minimum timesteps between drain requests       |
//! | 2             | bytes buffered before the host is asked to drain (0 = never) |
//! | 3 + 4i ..     | channel i: max size, buffered flag, IPv4, port |
//! | 3 + 4n + i    | channel i: buffer pointer, filled in by the core |
//!
//! The per-channel buffers follow the header inside the same region, so the
//! region occupies `recording_header_size(n) + Σ max sizes` bytes.

use crate::{DataSpecError, DataSpecResult, DataSpecWriter, IpTagResource, ResourceContainer, BYTES_PER_WORD};
use byteorder::{ByteOrder, LittleEndian};
use gridcore_config::{BuffersConfig, ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

const WORDS_BEFORE_CHANNELS: u32 = 3;
const WORDS_PER_CHANNEL: u32 = 4;
const POINTER_WORDS_PER_CHANNEL: u32 = 1;

/// Host-side destination of buffered data; opaque data, never connected to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    pub host: Ipv4Addr,
    pub port: u16,
}

impl Endpoint {
    pub const fn new(host: Ipv4Addr, port: u16) -> Self {
        Self { host, port }
    }
}

/// One recordable output stream of a vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingChannel {
    pub max_buffer_size: u32,
    pub buffered: bool,
    pub endpoint: Endpoint,
}

/// Run-wide recording settings, built once from configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingConfig {
    pub buffered: bool,
    pub time_between_requests: u32,
    /// Drain threshold; `None` when buffered recording is off
    pub buffer_size_before_receive: Option<u32>,
    pub endpoint: Endpoint,
    pub max_channel_buffer_bytes: u32,
    pub minimum_buffer_sdram: u32,
}

impl RecordingConfig {
    pub fn from_buffers(buffers: &BuffersConfig) -> ConfigResult<Self> {
        let host = buffers.receive_buffer_host.parse::<Ipv4Addr>().map_err(|_| {
            ConfigError::InvalidValue(format!(
                "buffers.receive_buffer_host '{}' is not an IPv4 address",
                buffers.receive_buffer_host
            ))
        })?;

        Ok(Self {
            buffered: buffers.enable_buffered_recording,
            time_between_requests: buffers.time_between_requests,
            buffer_size_before_receive: buffers
                .enable_buffered_recording
                .then_some(buffers.buffer_size_before_receive),
            endpoint: Endpoint::new(host, buffers.receive_buffer_port),
            max_channel_buffer_bytes: buffers.max_channel_buffer_bytes,
            minimum_buffer_sdram: buffers.minimum_buffer_sdram,
        })
    }

    /// A channel with the configured buffer size and destination
    pub fn channel(&self) -> RecordingChannel {
        self.channel_with_size(self.max_channel_buffer_bytes)
    }

    pub fn channel_with_size(&self, max_buffer_size: u32) -> RecordingChannel {
        RecordingChannel {
            max_buffer_size,
            buffered: self.buffered,
            endpoint: self.endpoint,
        }
    }
}

impl Default for RecordingConfig {
    fn default() -> Self {
        let buffers = BuffersConfig::default();
        Self {
            buffered: buffers.enable_buffered_recording,
            time_between_requests: buffers.time_between_requests,
            buffer_size_before_receive: None,
            endpoint: Endpoint::new(Ipv4Addr::UNSPECIFIED, buffers.receive_buffer_port),
            max_channel_buffer_bytes: buffers.max_channel_buffer_bytes,
            minimum_buffer_sdram: buffers.minimum_buffer_sdram,
        }
    }
}

/// Bytes taken by the header for `n_channels` channels
pub const fn recording_header_size(n_channels: u32) -> u32 {
    (WORDS_BEFORE_CHANNELS + (WORDS_PER_CHANNEL + POINTER_WORDS_PER_CHANNEL) * n_channels)
        * BYTES_PER_WORD
}

/// Bytes taken by the whole recording region: header plus channel buffers
///
/// # Errors
/// `SizeOverflow` if the total does not fit in a `u32`.
pub fn recording_region_size(channels: &[RecordingChannel]) -> DataSpecResult<u32> {
    u32::try_from(channels.len())
        .ok()
        .and_then(|n| {
            (WORDS_PER_CHANNEL + POINTER_WORDS_PER_CHANNEL)
                .checked_mul(n)?
                .checked_add(WORDS_BEFORE_CHANNELS)?
                .checked_mul(BYTES_PER_WORD)
        })
        .and_then(|header| {
            channels
                .iter()
                .try_fold(header, |total, c| total.checked_add(c.max_buffer_size))
        })
        .ok_or_else(|| {
            DataSpecError::SizeOverflow(format!("recording region of {} channel(s)", channels.len()))
        })
}

/// SDRAM and IP tags implied by a set of recording channels
///
/// Each distinct destination of a buffered channel needs one IP tag.
pub fn recording_resources(channels: &[RecordingChannel]) -> DataSpecResult<ResourceContainer> {
    let mut resources = ResourceContainer::with_sdram(recording_region_size(channels)?);
    for channel in channels.iter().filter(|c| c.buffered) {
        let tag = IpTagResource::from_endpoint(channel.endpoint);
        if !resources.iptags.contains(&tag) {
            resources.iptags.push(tag);
        }
    }
    Ok(resources)
}

/// How many timesteps of recording fit in `buffer_space` bytes
///
/// Returns `u32::MAX` when nothing is recorded per timestep.
pub fn get_n_timesteps_in_buffer_space(buffer_space: u32, bytes_per_timestep: &[u32]) -> u32 {
    let total: u32 = bytes_per_timestep.iter().sum();
    if total == 0 {
        return u32::MAX;
    }
    buffer_space / total
}

/// Header words for one recording region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingHeader {
    words: Vec<u32>,
    channels: Vec<RecordingChannel>,
    time_between_requests: u32,
    buffer_size_before_receive: Option<u32>,
}

impl RecordingHeader {
    /// Build the header words
    ///
    /// # Errors
    /// `HeaderSizeMismatch` if the produced words disagree with
    /// [`recording_header_size`].
    pub fn build(
        channels: &[RecordingChannel],
        time_between_requests: u32,
        buffer_size_before_receive: Option<u32>,
    ) -> DataSpecResult<Self> {
        let mut words = Vec::with_capacity(recording_header_size(channels.len() as u32) as usize / 4);
        words.push(channels.len() as u32);
        words.push(time_between_requests);
        words.push(buffer_size_before_receive.unwrap_or(0));
        for channel in channels {
            words.push(channel.max_buffer_size);
            words.push(channel.buffered as u32);
            words.push(u32::from(channel.endpoint.host));
            words.push(channel.endpoint.port as u32);
        }
        // pointers are filled in on chip
        words.extend(std::iter::repeat(0).take(channels.len()));

        let header = Self {
            words,
            channels: channels.to_vec(),
            time_between_requests,
            buffer_size_before_receive,
        };
        header.ensure_size(recording_header_size(channels.len() as u32))?;
        Ok(header)
    }

    /// Build from run-wide settings
    pub fn from_config(channels: &[RecordingChannel], config: &RecordingConfig) -> DataSpecResult<Self> {
        Self::build(
            channels,
            config.time_between_requests,
            config.buffer_size_before_receive,
        )
    }

    pub fn words(&self) -> &[u32] {
        &self.words
    }

    pub fn byte_size(&self) -> u32 {
        self.words.len() as u32 * BYTES_PER_WORD
    }

    pub fn channels(&self) -> &[RecordingChannel] {
        &self.channels
    }

    pub fn time_between_requests(&self) -> u32 {
        self.time_between_requests
    }

    pub fn buffer_size_before_receive(&self) -> Option<u32> {
        self.buffer_size_before_receive
    }

    /// Bytes of the full region: header plus every channel buffer
    pub fn region_size(&self) -> DataSpecResult<u32> {
        recording_region_size(&self.channels)
    }

    /// Fail unless the header occupies exactly `expected` bytes
    pub fn ensure_size(&self, expected: u32) -> DataSpecResult<()> {
        if self.byte_size() != expected {
            return Err(DataSpecError::HeaderSizeMismatch {
                expected,
                actual: self.byte_size(),
            });
        }
        Ok(())
    }

    /// Focus `region` and write the header at its start
    ///
    /// The reserved region must be exactly header plus buffers; anything else
    /// means the resource model and the header disagree.
    pub fn write_into(&self, spec: &mut DataSpecWriter, region: u32) -> DataSpecResult<()> {
        let reserved = spec.region_size(region).ok_or(DataSpecError::UnknownRegion(region))?;
        let needed = self.region_size()?;
        if reserved != needed {
            return Err(DataSpecError::HeaderSizeMismatch {
                expected: reserved,
                actual: needed,
            });
        }
        spec.focus(region)?;
        spec.write_array(&self.words)
    }

    /// Parse a header back from the start of a recording region
    pub fn decode(region: u32, bytes: &[u8]) -> DataSpecResult<Self> {
        let malformed = |reason: String| DataSpecError::MalformedRegion { region, reason };
        let word = |i: u32| -> DataSpecResult<u32> {
            let start = (i * BYTES_PER_WORD) as usize;
            bytes
                .get(start..start + 4)
                .map(LittleEndian::read_u32)
                .ok_or_else(|| malformed(format!("header truncated at word {}", i)))
        };

        let n_channels = word(0)?;
        let mut channels = Vec::with_capacity(n_channels as usize);
        for i in 0..n_channels {
            let base = WORDS_BEFORE_CHANNELS + i * WORDS_PER_CHANNEL;
            let port = word(base + 3)?;
            channels.push(RecordingChannel {
                max_buffer_size: word(base)?,
                buffered: word(base + 1)? != 0,
                endpoint: Endpoint::new(
                    Ipv4Addr::from(word(base + 2)?),
                    u16::try_from(port).map_err(|_| malformed(format!("port {} out of range", port)))?,
                ),
            });
        }
        let threshold = word(2)?;

        Self::build(
            &channels,
            word(1)?,
            (threshold != 0).then_some(threshold),
        )
    }
}
