//! Automatic gain control: fixed-gain, level-following adaptive, and a
//! clipping-protected digital mode (spec §4.8 item 3).

use crate::node::NodeOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgcMode {
    /// Apply a constant gain multiplier every frame.
    Fixed,
    /// Level-following gain with attack/release smoothing towards a target.
    Adaptive,
    /// Like `Adaptive`, but with headroom reserved so output never clips.
    Digital,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgcConfig {
    pub mode: AgcMode,
    pub sample_rate_hz: u32,
    pub frame_size: usize,
    /// Fixed-gain multiplier, used only in `AgcMode::Fixed`.
    pub fixed_gain: f32,
    /// Target level in dBFS for adaptive/digital modes.
    pub target_dbfs: f32,
    pub attack_time_ms: f32,
    pub release_time_ms: f32,
    /// Gain clamp in dB, applied symmetrically as [-max_gain_db, +max_gain_db]
    /// except the lower bound is clamped to 0 dB per spec (0..+30 dB).
    pub max_gain_db: f32,
}

impl Default for AgcConfig {
    fn default() -> Self {
        Self {
            mode: AgcMode::Adaptive,
            sample_rate_hz: 48_000,
            frame_size: 960,
            fixed_gain: 1.0,
            target_dbfs: -18.0,
            attack_time_ms: 10.0,
            release_time_ms: 100.0,
            max_gain_db: 30.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AgcDiagnostics {
    pub input_level_dbfs: f32,
    pub applied_gain: f32,
    pub limiter_active: bool,
}

pub struct AutomaticGainControl {
    config: AgcConfig,
    current_gain: f32,
    attack_coeff: f32,
    release_coeff: f32,
    last_diagnostics: AgcDiagnostics,
}

impl AutomaticGainControl {
    pub fn new(config: AgcConfig) -> Self {
        let frames_per_second = config.sample_rate_hz as f32 / config.frame_size as f32;
        let attack_coeff = Self::time_constant(config.attack_time_ms, frames_per_second);
        let release_coeff = Self::time_constant(config.release_time_ms, frames_per_second);
        Self {
            config,
            current_gain: 1.0,
            attack_coeff,
            release_coeff,
            last_diagnostics: AgcDiagnostics { input_level_dbfs: -96.0, applied_gain: 1.0, limiter_active: false },
        }
    }

    pub fn diagnostics(&self) -> AgcDiagnostics {
        self.last_diagnostics
    }

    pub fn process(&mut self, samples: &mut [i16]) -> NodeOutcome {
        if samples.is_empty() {
            return NodeOutcome::Bypassed;
        }

        let rms = Self::rms(samples);
        let input_dbfs = if rms > 0.0 { 20.0 * rms.log10() } else { -96.0 };

        let (gain, limiter_active) = match self.config.mode {
            AgcMode::Fixed => (self.config.fixed_gain, false),
            AgcMode::Adaptive => (self.adapt_gain(rms), false),
            AgcMode::Digital => {
                let adaptive = self.adapt_gain(rms);
                self.limit_for_headroom(adaptive, rms)
            }
        };

        for sample in samples.iter_mut() {
            let adjusted = *sample as f32 * gain;
            *sample = adjusted.clamp(i16::MIN as f32, i16::MAX as f32) as i16;
        }

        self.last_diagnostics =
            AgcDiagnostics { input_level_dbfs: input_dbfs, applied_gain: gain, limiter_active };

        NodeOutcome::Ok
    }

    fn adapt_gain(&mut self, rms: f32) -> f32 {
        let target_linear = 10f32.powf(self.config.target_dbfs / 20.0);
        let max_gain = 10f32.powf(self.config.max_gain_db / 20.0);
        let min_gain = 1.0; // spec clamps the lower bound to 0 dB

        let desired = if rms > 1e-6 { (target_linear / rms).clamp(min_gain, max_gain) } else { max_gain };

        let diff = desired - self.current_gain;
        let coeff = if diff > 0.0 { self.attack_coeff } else { self.release_coeff };
        self.current_gain += diff * coeff;
        self.current_gain
    }

    fn limit_for_headroom(&self, gain: f32, rms: f32) -> (f32, bool) {
        let headroom_threshold = 0.97;
        let predicted_peak = rms * gain;
        if predicted_peak > headroom_threshold {
            let limited = headroom_threshold / rms.max(1e-6);
            (limited.min(gain), true)
        } else {
            (gain, false)
        }
    }

    fn rms(samples: &[i16]) -> f32 {
        let sum_sq: f64 = samples.iter().map(|&s| (s as f64 / 32768.0).powi(2)).sum();
        ((sum_sq / samples.len() as f64).sqrt()) as f32
    }

    fn time_constant(time_ms: f32, frames_per_second: f32) -> f32 {
        let time_in_frames = (time_ms / 1000.0) * frames_per_second;
        if time_in_frames > 0.0 { 1.0 - (-1.0 / time_in_frames).exp() } else { 1.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_mode_applies_constant_gain() {
        let config = AgcConfig { mode: AgcMode::Fixed, fixed_gain: 2.0, ..Default::default() };
        let mut agc = AutomaticGainControl::new(config);
        let mut samples = vec![1000i16; 100];
        agc.process(&mut samples);
        assert!(samples.iter().all(|&s| s == 2000));
    }

    #[test]
    fn adaptive_mode_raises_quiet_signal_towards_target() {
        let config = AgcConfig { mode: AgcMode::Adaptive, ..Default::default() };
        let mut agc = AutomaticGainControl::new(config);
        let quiet = vec![200i16; 960];
        let mut gain_history = Vec::new();
        for _ in 0..200 {
            let mut frame = quiet.clone();
            agc.process(&mut frame);
            gain_history.push(agc.diagnostics().applied_gain);
        }
        assert!(gain_history.last().unwrap() > gain_history.first().unwrap());
    }

    #[test]
    fn digital_mode_never_exceeds_i16_range() {
        let config = AgcConfig { mode: AgcMode::Digital, ..Default::default() };
        let mut agc = AutomaticGainControl::new(config);
        let mut loud = vec![i16::MAX; 960];
        for _ in 0..50 {
            let mut frame = loud.clone();
            agc.process(&mut frame);
            loud = frame;
        }
        assert!(loud.iter().all(|&s| s <= i16::MAX && s >= i16::MIN));
    }

    #[test]
    fn empty_frame_bypassed() {
        let mut agc = AutomaticGainControl::new(AgcConfig::default());
        assert_eq!(agc.process(&mut []), NodeOutcome::Bypassed);
    }
}
