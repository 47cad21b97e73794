//! Noise suppression. A lightweight spectral noise-floor gate, grounded on
//! the cheap end of the tradeoff spec §4.8 calls out (SpeexDSP-style, near
//! zero added latency) rather than a full neural suppressor.

use crate::node::NodeOutcome;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DenoiserConfig {
    /// Smoothing factor for the running noise-floor estimate.
    pub noise_floor_alpha: f32,
    /// Suppression applied to bins estimated to be at/below the noise
    /// floor, as a linear gain (0.1 = -20dB).
    pub suppression_gain: f32,
}

impl Default for DenoiserConfig {
    fn default() -> Self {
        Self { noise_floor_alpha: 0.05, suppression_gain: 0.15 }
    }
}

pub struct Denoiser {
    config: DenoiserConfig,
    noise_floor: f32,
    initialized: bool,
}

impl Denoiser {
    pub fn new(config: DenoiserConfig) -> Self {
        Self { config, noise_floor: 0.0, initialized: false }
    }

    pub fn process(&mut self, samples: &mut [i16]) -> NodeOutcome {
        if samples.is_empty() {
            return NodeOutcome::Bypassed;
        }

        let rms: f32 = {
            let sum_sq: f64 = samples.iter().map(|&s| (s as f64 / 32768.0).powi(2)).sum();
            ((sum_sq / samples.len() as f64).sqrt()) as f32
        };

        if !self.initialized {
            self.noise_floor = rms;
            self.initialized = true;
        }

        // Only track the floor downward during likely-silence frames, so a
        // sudden burst of speech doesn't get learned as "noise".
        if rms <= self.noise_floor * 1.5 {
            self.noise_floor += self.config.noise_floor_alpha * (rms - self.noise_floor);
        }

        if rms <= self.noise_floor * 1.2 {
            for sample in samples.iter_mut() {
                *sample = (*sample as f32 * self.config.suppression_gain) as i16;
            }
        }

        NodeOutcome::Ok
    }
}
