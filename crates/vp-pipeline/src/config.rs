//! Pipeline configuration (spec §6). A plain struct with a `Default` impl
//! and `with_*` builder methods, the way `AudioPipelineBuilder` and
//! `SrtpConfig` configure the teacher's equivalents, plus TOML loading via
//! the `config` crate for host applications that want file-based tuning.

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

use vp_codec::types::CodecType;
use vp_core::format::SampleRate;
use vp_dsp::{AecConfig, AgcConfig, DenoiserConfig, DspChainConfig, ReceiveChainConfig, VadConfig};
use vp_srtp::SrtpProfile;

use crate::error::{PipelineError, Result};

/// Which direction(s) of the pipeline are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineMode {
    Capture,
    Playback,
    Duplex,
}

/// The denoiser this build is configured to behave like. `vp-dsp`'s
/// denoiser is a single energy-gate implementation regardless of this
/// setting (see `DESIGN.md`); the field exists so a `PipelineConfig`
/// round-trips the host's intent even though both variants currently
/// select the same code path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DenoiseEngine {
    SpeexDsp,
    RNNoise,
}

/// `SrtpProfile` lives in `vp-srtp` without `serde` derives (crypto code
/// has no business being deserialized from an untrusted file by itself);
/// this mirrors just the enum for config (de)serialization and converts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SrtpProfileConfig {
    AesCm128HmacSha1_80,
    AesCm128HmacSha1_32,
    AeadAes128Gcm,
    AeadAes256Gcm,
}

impl From<SrtpProfileConfig> for SrtpProfile {
    fn from(p: SrtpProfileConfig) -> Self {
        match p {
            SrtpProfileConfig::AesCm128HmacSha1_80 => Self::AesCm128HmacSha1_80,
            SrtpProfileConfig::AesCm128HmacSha1_32 => Self::AesCm128HmacSha1_32,
            SrtpProfileConfig::AeadAes128Gcm => Self::AeadAes128Gcm,
            SrtpProfileConfig::AeadAes256Gcm => Self::AeadAes256Gcm,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub mode: PipelineMode,
    pub sample_rate_hz: u32,
    pub channels: u8,
    pub frame_duration_ms: u32,

    pub enable_aec: bool,
    pub enable_denoise: bool,
    pub enable_agc: bool,
    pub denoise_engine: DenoiseEngine,

    pub codec: CodecTypeConfig,
    pub bitrate: u32,
    pub enable_fec: bool,

    pub enable_srtp: bool,
    pub srtp_profile: SrtpProfileConfig,
    #[serde(skip)]
    pub srtp_master_key: Vec<u8>,
    #[serde(skip)]
    pub srtp_master_salt: Vec<u8>,

    pub payload_type: u8,
    pub ssrc: Option<u32>,
    pub bind_addr: SocketAddr,
    pub remote_addr: Option<SocketAddr>,

    /// Ring capacity, in samples, for both the capture-in and playback-out
    /// rings (spec §4.1).
    pub ring_capacity_samples: usize,
}

/// Mirrors `vp_codec::types::CodecType` for (de)serialization; `vp-codec`
/// keeps its own type free of a `serde` dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CodecTypeConfig {
    G711Pcmu,
    G711Pcma,
    G722,
    Opus,
}

impl From<CodecTypeConfig> for CodecType {
    fn from(c: CodecTypeConfig) -> Self {
        match c {
            CodecTypeConfig::G711Pcmu => Self::G711Pcmu,
            CodecTypeConfig::G711Pcma => Self::G711Pcma,
            CodecTypeConfig::G722 => Self::G722,
            CodecTypeConfig::Opus => Self::Opus,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            mode: PipelineMode::Duplex,
            sample_rate_hz: SampleRate::Rate48000.as_hz(),
            channels: 1,
            frame_duration_ms: 20,
            enable_aec: true,
            enable_denoise: true,
            enable_agc: true,
            denoise_engine: DenoiseEngine::SpeexDsp,
            codec: CodecTypeConfig::Opus,
            bitrate: 32_000,
            enable_fec: false,
            enable_srtp: false,
            srtp_profile: SrtpProfileConfig::AesCm128HmacSha1_80,
            srtp_master_key: Vec::new(),
            srtp_master_salt: Vec::new(),
            payload_type: 111,
            ssrc: None,
            bind_addr: "0.0.0.0:0".parse().unwrap(),
            remote_addr: None,
            ring_capacity_samples: 48_000 * 2, // 2s @ 48kHz mono, plenty of headroom
        }
    }
}

impl PipelineConfig {
    pub fn with_mode(mut self, mode: PipelineMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_sample_rate(mut self, rate: SampleRate) -> Self {
        self.sample_rate_hz = rate.as_hz();
        self
    }

    pub fn with_codec(mut self, codec: CodecTypeConfig) -> Self {
        self.codec = codec;
        self
    }

    pub fn with_srtp(mut self, profile: SrtpProfileConfig, master_key: Vec<u8>, master_salt: Vec<u8>) -> Self {
        self.enable_srtp = true;
        self.srtp_profile = profile;
        self.srtp_master_key = master_key;
        self.srtp_master_salt = master_salt;
        self
    }

    pub fn with_remote_addr(mut self, addr: SocketAddr) -> Self {
        self.remote_addr = Some(addr);
        self
    }

    /// Samples per channel per frame at this config's rate/duration (§3).
    pub fn frame_size(&self) -> usize {
        vp_core::frame_size(self.sample_rate_hz, self.frame_duration_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if ![10, 20, 40, 60].contains(&self.frame_duration_ms) {
            return Err(PipelineError::InvalidConfig(format!(
                "frame_duration_ms must be one of 10/20/40/60, got {}",
                self.frame_duration_ms
            )));
        }
        if self.channels == 0 || self.channels > 2 {
            return Err(PipelineError::InvalidConfig(format!("channels must be 1 or 2, got {}", self.channels)));
        }
        if self.enable_srtp
            && (self.srtp_master_key.len() != SrtpProfile::from(self.srtp_profile).master_key_len()
                || self.srtp_master_salt.len() != SrtpProfile::from(self.srtp_profile).master_salt_len())
        {
            return Err(PipelineError::InvalidConfig("SRTP master key/salt length does not match profile".into()));
        }
        Ok(())
    }

    /// Load a config from a TOML file, layered over `Default::default()`
    /// (the `config` crate merges file values onto a fresh default so a
    /// host only needs to specify what it wants to override), the way
    /// `infra-common::config` loads layered application config.
    pub fn from_toml_file(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()
            .map_err(|e| PipelineError::InvalidConfig(e.to_string()))?;
        settings.try_deserialize().map_err(|e| PipelineError::InvalidConfig(e.to_string()))
    }

    pub(crate) fn dsp_chain_config(&self) -> DspChainConfig {
        let frame_size = self.frame_size();
        DspChainConfig {
            enable_aec: self.enable_aec,
            enable_denoise: self.enable_denoise,
            enable_agc: self.enable_agc,
            aec: AecConfig { sample_rate_hz: self.sample_rate_hz, ..AecConfig::default() },
            denoise: DenoiserConfig::default(),
            agc: AgcConfig { sample_rate_hz: self.sample_rate_hz, frame_size, ..AgcConfig::default() },
            vad: VadConfig::default(),
        }
    }

    pub(crate) fn receive_chain_config(&self) -> ReceiveChainConfig {
        ReceiveChainConfig::default()
    }
}
