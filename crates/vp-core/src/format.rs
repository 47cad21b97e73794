//! Audio format description (channels, bit depth, sample rate).
//!
//! Grounded on `rvoip-media-core`'s `AudioFormat`/`SampleRate` pair, reduced
//! to what the pipeline actually needs: PCM16 only, mono or stereo.

use std::fmt;

/// Pipeline-supported sample rates (§6 "Pipeline configuration options").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleRate {
    Rate8000,
    Rate16000,
    Rate24000,
    Rate48000,
}

impl SampleRate {
    /// Numeric rate in Hz.
    pub const fn as_hz(self) -> u32 {
        match self {
            Self::Rate8000 => 8_000,
            Self::Rate16000 => 16_000,
            Self::Rate24000 => 24_000,
            Self::Rate48000 => 48_000,
        }
    }

    /// Parse a rate from a raw Hz value, if it's one the pipeline supports.
    pub const fn from_hz(hz: u32) -> Option<Self> {
        match hz {
            8_000 => Some(Self::Rate8000),
            16_000 => Some(Self::Rate16000),
            24_000 => Some(Self::Rate24000),
            48_000 => Some(Self::Rate48000),
            _ => None,
        }
    }
}

impl Default for SampleRate {
    fn default() -> Self {
        Self::Rate48000
    }
}

impl fmt::Display for SampleRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Hz", self.as_hz())
    }
}

/// Channel count, bit depth, and sample rate of a PCM stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFormat {
    /// 1 = mono, 2 = stereo.
    pub channels: u8,
    /// Always 16 for this pipeline; kept explicit for clarity at call sites.
    pub bit_depth: u8,
    pub sample_rate: SampleRate,
}

impl Default for AudioFormat {
    fn default() -> Self {
        Self::mono_16bit(SampleRate::default())
    }
}

impl AudioFormat {
    pub const fn new(channels: u8, bit_depth: u8, sample_rate: SampleRate) -> Self {
        Self { channels, bit_depth, sample_rate }
    }

    pub const fn mono_16bit(sample_rate: SampleRate) -> Self {
        Self::new(1, 16, sample_rate)
    }

    pub const fn stereo_16bit(sample_rate: SampleRate) -> Self {
        Self::new(2, 16, sample_rate)
    }

    /// Number of `i16` samples per channel in a frame of the given duration.
    pub const fn samples_per_channel(&self, frame_duration_ms: u32) -> usize {
        crate::frame_size(self.sample_rate.as_hz(), frame_duration_ms)
    }
}
