//! Opus Audio Codec Implementation
//!
//! This module implements the Opus codec, a modern audio codec standardized 
//! by the Internet Engineering Task Force (IETF) in RFC 6716. Opus combines
//! the best features of both speech and music codecs with very low latency.

use crate::error::{CodecError, Result};
use crate::types::{AudioCodec, AudioCodecExt, CodecConfig, CodecInfo, SampleRate};
use crate::utils::{validate_opus_frame};
use tracing::{debug, trace, warn};

// Re-export OpusApplication from types to avoid duplication
pub use crate::types::OpusApplication;

/// Opus codec implementation
pub struct OpusCodec {
    /// Sample rate (8, 12, 16, 24, or 48 kHz)
    sample_rate: u32,
    /// Number of channels (1 or 2)
    channels: u8,
    /// Frame size in samples
    frame_size: usize,
    /// Codec configuration
    config: OpusConfig,
    /// Real libopus bindings when the `opus` feature is enabled, otherwise
    /// a deterministic simulation used for pipeline development without the
    /// native dependency.
    backend: OpusBackend,
}

enum OpusBackend {
    #[cfg(feature = "opus")]
    Real {
        encoder: audiopus::coder::Encoder,
        decoder: audiopus::coder::Decoder,
    },
    Simulated,
}

#[cfg(feature = "opus")]
fn audiopus_sample_rate(hz: u32) -> Result<audiopus::SampleRate> {
    match hz {
        8000 => Ok(audiopus::SampleRate::Hz8000),
        12000 => Ok(audiopus::SampleRate::Hz12000),
        16000 => Ok(audiopus::SampleRate::Hz16000),
        24000 => Ok(audiopus::SampleRate::Hz24000),
        48000 => Ok(audiopus::SampleRate::Hz48000),
        other => Err(CodecError::InvalidSampleRate {
            rate: other,
            supported: vec![8000, 12000, 16000, 24000, 48000],
        }),
    }
}

#[cfg(feature = "opus")]
fn audiopus_channels(channels: u8) -> Result<audiopus::Channels> {
    match channels {
        1 => Ok(audiopus::Channels::Mono),
        2 => Ok(audiopus::Channels::Stereo),
        other => Err(CodecError::InvalidChannelCount { channels: other, supported: vec![1, 2] }),
    }
}

#[cfg(feature = "opus")]
fn audiopus_application(app: OpusApplication) -> audiopus::Application {
    match app {
        OpusApplication::Voip => audiopus::Application::Voip,
        OpusApplication::Audio => audiopus::Application::Audio,
        OpusApplication::RestrictedLowDelay => audiopus::Application::LowDelay,
    }
}

/// Opus codec configuration
#[derive(Debug, Clone)]
pub struct OpusConfig {
    /// Application type (VoIP, Audio, or Low Delay)
    pub application: OpusApplication,
    /// Bitrate in bits per second
    pub bitrate: u32,
    /// Enable variable bitrate
    pub vbr: bool,
    /// Enable constrained VBR
    pub cvbr: bool,
    /// Complexity (0-10)
    pub complexity: u8,
    /// Enable inband FEC
    pub inband_fec: bool,
    /// DTX (Discontinuous Transmission)
    pub dtx: bool,
    /// Packet loss percentage (0-100)
    pub packet_loss_perc: u8,
    /// Force mono encoding
    pub force_mono: bool,
}

impl Default for OpusConfig {
    fn default() -> Self {
        Self {
            application: OpusApplication::Voip,
            bitrate: 64000,
            vbr: true,
            cvbr: false,
            complexity: 5,
            inband_fec: false,
            dtx: false,
            packet_loss_perc: 0,
            force_mono: false,
        }
    }
}

impl OpusCodec {
    /// Create a new Opus codec
    pub fn new(config: CodecConfig) -> Result<Self> {
        // Validate configuration
        let sample_rate = config.sample_rate.hz();
        
        // Opus supports 8, 12, 16, 24, 48 kHz
        if ![8000, 12000, 16000, 24000, 48000].contains(&sample_rate) {
            return Err(CodecError::InvalidSampleRate {
                rate: sample_rate,
                supported: vec![8000, 12000, 16000, 24000, 48000],
            });
        }
        
        // Opus supports mono and stereo
        if config.channels == 0 || config.channels > 2 {
            return Err(CodecError::InvalidChannelCount {
                channels: config.channels,
                supported: vec![1, 2],
            });
        }
        
        // Calculate frame size based on frame_size_ms or use default
        let frame_size = if let Some(frame_ms) = config.frame_size_ms {
            let samples_per_ms = sample_rate as f32 / 1000.0;
            (samples_per_ms * frame_ms) as usize
        } else {
            // Default to 20ms
            (sample_rate * 20 / 1000) as usize
        };
        
        // Create Opus configuration
        let opus_config = OpusConfig {
            application: config.parameters.opus.application,
            bitrate: config.parameters.opus.bitrate,
            vbr: config.parameters.opus.vbr,
            cvbr: config.parameters.opus.cvbr,
            complexity: config.parameters.opus.complexity,
            inband_fec: config.parameters.opus.inband_fec,
            dtx: config.parameters.opus.dtx,
            packet_loss_perc: config.parameters.opus.packet_loss_perc,
            force_mono: config.parameters.opus.force_mono,
        };
        
        debug!("Creating Opus codec: {}Hz, {}ch, {}bps, {:?} mode",
               sample_rate, config.channels, opus_config.bitrate, opus_config.application);

        let backend = Self::build_backend(sample_rate, config.channels, &opus_config)?;

        Ok(Self {
            sample_rate,
            channels: config.channels,
            frame_size,
            config: opus_config,
            backend,
        })
    }

    #[cfg(feature = "opus")]
    fn build_backend(sample_rate: u32, channels: u8, opus_config: &OpusConfig) -> Result<OpusBackend> {
        let sr = audiopus_sample_rate(sample_rate)?;
        let ch = audiopus_channels(channels)?;
        let mut encoder = audiopus::coder::Encoder::new(sr, ch, audiopus_application(opus_config.application))
            .map_err(|e| CodecError::ExternalLibraryError { library: "audiopus".to_string(), error: e.to_string() })?;
        let _ = encoder.set_bitrate(audiopus::Bitrate::BitsPerSecond(opus_config.bitrate as i32));
        let decoder = audiopus::coder::Decoder::new(sr, ch)
            .map_err(|e| CodecError::ExternalLibraryError { library: "audiopus".to_string(), error: e.to_string() })?;
        Ok(OpusBackend::Real { encoder, decoder })
    }

    #[cfg(not(feature = "opus"))]
    fn build_backend(_sample_rate: u32, _channels: u8, _opus_config: &OpusConfig) -> Result<OpusBackend> {
        Ok(OpusBackend::Simulated)
    }
    
    /// Get the compression ratio (variable for Opus)
    pub fn compression_ratio(&self) -> f32 {
        let uncompressed_bits = self.frame_size as f32 * 16.0 * self.channels as f32;
        let compressed_bits = self.config.bitrate as f32 * (self.frame_size as f32 / self.sample_rate as f32);
        compressed_bits / uncompressed_bits
    }
    
    /// Set the bitrate
    pub fn set_bitrate(&mut self, bitrate: u32) -> Result<()> {
        if bitrate < 6000 || bitrate > 510000 {
            return Err(CodecError::InvalidBitrate {
                bitrate,
                min: 6000,
                max: 510000,
            });
        }

        #[cfg(feature = "opus")]
        if let OpusBackend::Real { encoder, .. } = &mut self.backend {
            encoder
                .set_bitrate(audiopus::Bitrate::BitsPerSecond(bitrate as i32))
                .map_err(|e| CodecError::ExternalLibraryError {
                    library: "audiopus".to_string(),
                    error: e.to_string(),
                })?;
        }

        self.config.bitrate = bitrate;
        debug!("Opus bitrate set to {} bps", bitrate);
        Ok(())
    }

    /// Set complexity level (0-10)
    pub fn set_complexity(&mut self, complexity: u8) -> Result<()> {
        if complexity > 10 {
            return Err(CodecError::invalid_config("Complexity must be 0-10"));
        }

        #[cfg(feature = "opus")]
        if let OpusBackend::Real { encoder, .. } = &mut self.backend {
            encoder
                .set_complexity(complexity)
                .map_err(|e| CodecError::ExternalLibraryError {
                    library: "audiopus".to_string(),
                    error: e.to_string(),
                })?;
        }

        self.config.complexity = complexity;
        debug!("Opus complexity set to {}", complexity);
        Ok(())
    }

    /// Set the expected packet loss percentage, enabling the encoder to
    /// tune inband FEC aggressiveness.
    pub fn set_packet_loss_percent_inner(&mut self, percent: u8) -> Result<()> {
        let percent = percent.min(100);

        #[cfg(feature = "opus")]
        if let OpusBackend::Real { encoder, .. } = &mut self.backend {
            encoder
                .set_packet_loss_perc(percent)
                .map_err(|e| CodecError::ExternalLibraryError {
                    library: "audiopus".to_string(),
                    error: e.to_string(),
                })?;
        }

        self.config.packet_loss_perc = percent;
        Ok(())
    }

    fn real_encode(&mut self, samples: &[i16]) -> Result<Vec<u8>> {
        #[cfg(feature = "opus")]
        {
            if let OpusBackend::Real { encoder, .. } = &mut self.backend {
                let mut out = vec![0u8; 1275];
                let written = encoder
                    .encode(samples, &mut out)
                    .map_err(|e| CodecError::ExternalLibraryError {
                        library: "audiopus".to_string(),
                        error: e.to_string(),
                    })?;
                out.truncate(written);
                return Ok(out);
            }
        }
        self.simulate_encode(samples)
    }

    fn real_decode(&mut self, data: Option<&[u8]>) -> Result<Vec<i16>> {
        #[cfg(feature = "opus")]
        {
            let frame_size = self.frame_size;
            let channels = self.channels as usize;
            if let OpusBackend::Real { decoder, .. } = &mut self.backend {
                let mut out = vec![0i16; frame_size * channels];
                let produced = decoder
                    .decode(data, &mut out, false)
                    .map_err(|e| CodecError::ExternalLibraryError {
                        library: "audiopus".to_string(),
                        error: e.to_string(),
                    })?;
                out.truncate(produced * channels);
                return Ok(out);
            }
        }
        match data {
            Some(bytes) => self.simulate_decode(bytes),
            None => Ok(vec![0i16; self.frame_size * self.channels as usize]),
        }
    }

    /// Simulate Opus encoding
    fn simulate_encode(&mut self, samples: &[i16]) -> Result<Vec<u8>> {
        // Calculate target size based on bitrate
        let frame_duration_ms = (samples.len() as f32 * 1000.0) / 
                               (self.sample_rate as f32 * self.channels as f32);
        let target_bits = (self.config.bitrate as f32 * frame_duration_ms / 1000.0) as usize;
        let target_bytes = target_bits / 8;
        
        let mut encoded = Vec::with_capacity(target_bytes.max(10));
        
        // Simple simulation - just create dummy data
        for i in 0..target_bytes {
            encoded.push((i % 256) as u8);
        }
        
        Ok(encoded)
    }
    
    /// Simulate Opus decoding
    fn simulate_decode(&mut self, data: &[u8]) -> Result<Vec<i16>> {
        let mut samples = vec![0i16; self.frame_size * self.channels as usize];
        
        // Simple simulation - generate noise based on input
        for (i, sample) in samples.iter_mut().enumerate() {
            let data_idx = i % data.len();
            *sample = ((data[data_idx] as i16) << 8) | (i as i16 & 0xFF);
        }
        
        Ok(samples)
    }
}

impl AudioCodec for OpusCodec {
    fn encode(&mut self, samples: &[i16]) -> Result<Vec<u8>> {
        // Validate input
        validate_opus_frame(samples, SampleRate::from_hz(self.sample_rate))?;

        let encoded = self.real_encode(samples)?;

        trace!("Opus encoded {} samples to {} bytes",
               samples.len(), encoded.len());

        Ok(encoded)
    }

    fn decode(&mut self, data: &[u8]) -> Result<Vec<i16>> {
        if data.is_empty() {
            let plc_len = self.frame_size * self.channels as usize;
            return self.plc(plc_len);
        }

        let decoded = self.real_decode(Some(data))?;

        trace!("Opus decoded {} bytes to {} samples",
               data.len(), decoded.len());

        Ok(decoded)
    }

    fn info(&self) -> CodecInfo {
        CodecInfo {
            name: "Opus",
            sample_rate: self.sample_rate,
            channels: self.channels,
            bitrate: self.config.bitrate,
            frame_size: self.frame_size,
            payload_type: Some(111), // Dynamic payload type
        }
    }

    fn reset(&mut self) -> Result<()> {
        debug!("Opus codec reset");
        Ok(())
    }

    fn frame_size(&self) -> usize {
        self.frame_size
    }

    fn supports_variable_frame_size(&self) -> bool {
        true // Opus supports multiple frame sizes
    }

    fn set_bitrate(&mut self, bps: u32) -> Result<()> {
        self.set_bitrate(bps)
    }

    fn set_packet_loss_percent(&mut self, percent: u8) -> Result<()> {
        self.set_packet_loss_percent_inner(percent)
    }

    fn plc(&mut self, samples_to_synthesize: usize) -> Result<Vec<i16>> {
        #[cfg(feature = "opus")]
        {
            let channels = self.channels as usize;
            if let OpusBackend::Real { decoder, .. } = &mut self.backend {
                let mut out = vec![0i16; samples_to_synthesize];
                let produced = decoder
                    .decode(None, &mut out, false)
                    .map_err(|e| CodecError::ExternalLibraryError {
                        library: "audiopus".to_string(),
                        error: e.to_string(),
                    })?;
                out.truncate(produced * channels);
                return Ok(out);
            }
        }
        Ok(vec![0i16; samples_to_synthesize])
    }
}

impl AudioCodecExt for OpusCodec {
    fn encode_to_buffer(&mut self, samples: &[i16], output: &mut [u8]) -> Result<usize> {
        // Validate input
        validate_opus_frame(samples, SampleRate::from_hz(self.sample_rate))?;

        let encoded = self.real_encode(samples)?;

        if output.len() < encoded.len() {
            return Err(CodecError::BufferTooSmall {
                needed: encoded.len(),
                actual: output.len(),
            });
        }

        output[..encoded.len()].copy_from_slice(&encoded);

        trace!("Opus encoded {} samples to {} bytes (zero-alloc)",
               samples.len(), encoded.len());

        Ok(encoded.len())
    }

    fn decode_to_buffer(&mut self, data: &[u8], output: &mut [i16]) -> Result<usize> {
        let decoded = if data.is_empty() {
            let plc_len = self.frame_size * self.channels as usize;
            AudioCodec::plc(self, plc_len)?
        } else {
            self.real_decode(Some(data))?
        };

        if output.len() < decoded.len() {
            return Err(CodecError::BufferTooSmall {
                needed: decoded.len(),
                actual: output.len(),
            });
        }

        output[..decoded.len()].copy_from_slice(&decoded);

        trace!("Opus decoded {} bytes to {} samples (zero-alloc)",
               data.len(), decoded.len());

        Ok(decoded.len())
    }
    
    fn max_encoded_size(&self, input_samples: usize) -> usize {
        // Opus maximum frame size is 1275 bytes
        let bits_per_sample = self.config.bitrate as f32 / self.sample_rate as f32;
        let max_bytes = (input_samples as f32 * bits_per_sample / 8.0) as usize;
        max_bytes.min(1275)
    }
    
    fn max_decoded_size(&self, _input_bytes: usize) -> usize {
        // Opus can decode to various frame sizes
        let max_frame_ms = 60.0; // 60ms is the maximum
        ((self.sample_rate as f32 * max_frame_ms / 1000.0) as usize) * self.channels as usize
    }
}
