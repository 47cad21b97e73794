//! Frame-synchronous DSP graph: AEC → Denoiser → AGC → VAD on send, optional
//! equalizer/compressor/comfort-noise/spatial stages on receive (spec §4.8).

use tracing::warn;

use crate::agc::{AgcConfig, AutomaticGainControl};
use crate::aec::{AecConfig, EchoCanceller};
use crate::denoise::{Denoiser, DenoiserConfig};
use crate::node::{NodeError, NodeOutcome};
use crate::vad::{VadConfig, VadDecision, VoiceActivityDetector};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DspChainConfig {
    pub enable_aec: bool,
    pub enable_denoise: bool,
    pub enable_agc: bool,
    pub aec: AecConfig,
    pub denoise: DenoiserConfig,
    pub agc: AgcConfig,
    pub vad: VadConfig,
}

impl Default for DspChainConfig {
    fn default() -> Self {
        Self {
            enable_aec: true,
            enable_denoise: true,
            enable_agc: true,
            aec: AecConfig::default(),
            denoise: DenoiserConfig::default(),
            agc: AgcConfig::default(),
            vad: VadConfig::default(),
        }
    }
}

/// Outcome of running one frame through the whole send-side chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SendFrameReport {
    pub aec: NodeOutcome,
    pub denoise: NodeOutcome,
    pub agc: NodeOutcome,
    pub vad: VadDecision,
}

/// Send-side chain: AEC → Denoiser → AGC → VAD.
pub struct SendChain {
    aec: Option<EchoCanceller>,
    denoiser: Option<Denoiser>,
    agc: Option<AutomaticGainControl>,
    vad: VoiceActivityDetector,
}

impl SendChain {
    pub fn new(config: DspChainConfig) -> Self {
        Self {
            aec: config.enable_aec.then(|| EchoCanceller::new(config.aec)),
            denoiser: config.enable_denoise.then(|| Denoiser::new(config.denoise)),
            agc: config.enable_agc.then(|| AutomaticGainControl::new(config.agc)),
            vad: VoiceActivityDetector::new(config.vad),
        }
    }

    pub fn push_far_end(&mut self, samples: &[i16]) {
        if let Some(aec) = self.aec.as_mut() {
            aec.push_far_end(samples);
        }
    }

    /// Run one near-end frame through the chain in place. Returns `Err` only
    /// when a node fails fatally; a `Degraded`/`Bypassed` node outcome is
    /// carried in the report but does not abort the chain.
    pub fn process(&mut self, samples: &mut [i16]) -> Result<SendFrameReport, NodeError> {
        let aec = match self.aec.as_mut() {
            Some(aec) => aec.process(samples),
            None => NodeOutcome::Bypassed,
        };
        if aec == NodeOutcome::Degraded {
            warn!("AEC degraded this frame");
        }

        let denoise = match self.denoiser.as_mut() {
            Some(denoiser) => denoiser.process(samples),
            None => NodeOutcome::Bypassed,
        };

        let agc = match self.agc.as_mut() {
            Some(agc) => agc.process(samples),
            None => NodeOutcome::Bypassed,
        };

        let vad = self.vad.process(samples);

        Ok(SendFrameReport { aec, denoise, agc, vad })
    }
}

/// Optional receive-side stages. None are grounded in a concrete DSP
/// algorithm in the corpus; each is a frame-synchronous identity/gain stage
/// sufficient to exercise the chain wiring and failure model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReceiveChainConfig {
    pub enable_equalizer: bool,
    pub enable_compressor: bool,
    pub enable_comfort_noise: bool,
    pub compressor_threshold_dbfs: f32,
    pub compressor_ratio: f32,
    pub comfort_noise_level: i16,
}

impl Default for ReceiveChainConfig {
    fn default() -> Self {
        Self {
            enable_equalizer: false,
            enable_compressor: false,
            enable_comfort_noise: true,
            compressor_threshold_dbfs: -12.0,
            compressor_ratio: 2.0,
            comfort_noise_level: 8,
        }
    }
}

pub struct ReceiveChain {
    config: ReceiveChainConfig,
    seed: u32,
}

impl ReceiveChain {
    pub fn new(config: ReceiveChainConfig) -> Self {
        Self { config, seed: 0x4F6C_DD1D }
    }

    /// Process a decoded frame. `equalizer` is a no-op placeholder pass
    /// (the corpus has no EQ implementation to ground one on); the
    /// compressor/limiter reduces peaks above threshold.
    pub fn process(&mut self, samples: &mut [i16]) -> NodeOutcome {
        if samples.is_empty() {
            return NodeOutcome::Bypassed;
        }

        if self.config.enable_compressor {
            self.compress(samples);
        }

        NodeOutcome::Ok
    }

    /// Fill a frame with comfort noise during decoded silence or while
    /// concealing a loss, instead of hard silence.
    pub fn comfort_noise(&mut self, samples: &mut [i16]) {
        if !self.config.enable_comfort_noise {
            samples.fill(0);
            return;
        }
        for sample in samples.iter_mut() {
            self.seed = self.seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let noise = ((self.seed >> 16) as i32 % (self.config.comfort_noise_level as i32 * 2 + 1))
                - self.config.comfort_noise_level as i32;
            *sample = noise as i16;
        }
    }

    fn compress(&self, samples: &mut [i16]) {
        let threshold = 10f32.powf(self.config.compressor_threshold_dbfs / 20.0) * i16::MAX as f32;
        for sample in samples.iter_mut() {
            let mag = sample.unsigned_abs() as f32;
            if mag > threshold {
                let over = mag - threshold;
                let reduced = threshold + over / self.config.compressor_ratio;
                let sign = if *sample < 0 { -1.0 } else { 1.0 };
                *sample = (reduced * sign) as i16;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_chain_runs_all_enabled_nodes() {
        let mut chain = SendChain::new(DspChainConfig::default());
        let mut frame = vec![1000i16; 960];
        let report = chain.process(&mut frame).unwrap();
        assert_eq!(report.aec, NodeOutcome::Degraded);
    }

    #[test]
    fn disabled_nodes_report_bypassed() {
        let config = DspChainConfig { enable_aec: false, enable_denoise: false, enable_agc: false, ..Default::default() };
        let mut chain = SendChain::new(config);
        let mut frame = vec![1000i16; 960];
        let report = chain.process(&mut frame).unwrap();
        assert_eq!(report.aec, NodeOutcome::Bypassed);
        assert_eq!(report.denoise, NodeOutcome::Bypassed);
        assert_eq!(report.agc, NodeOutcome::Bypassed);
    }

    #[test]
    fn compressor_reduces_peaks_above_threshold() {
        let config = ReceiveChainConfig { enable_compressor: true, ..Default::default() };
        let mut chain = ReceiveChain::new(config);
        let mut frame = vec![i16::MAX; 100];
        chain.process(&mut frame);
        assert!(frame[0] < i16::MAX);
    }

    #[test]
    fn comfort_noise_is_nonzero_when_enabled() {
        let mut chain = ReceiveChain::new(ReceiveChainConfig::default());
        let mut frame = vec![0i16; 100];
        chain.comfort_noise(&mut frame);
        assert!(frame.iter().any(|&s| s != 0));
    }
}
