//! Acoustic echo canceller: an NLMS adaptive filter against a time-aligned
//! far-end reference (spec §4.8). A missing or stale reference is a soft
//! failure — the filter holds its last coefficients and backs off its
//! adaptation rate rather than bypassing cancellation outright.

use std::collections::VecDeque;

use crate::node::NodeOutcome;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AecConfig {
    pub tail_length_ms: u32,
    pub sample_rate_hz: u32,
    pub step_size: f32,
}

impl Default for AecConfig {
    fn default() -> Self {
        Self { tail_length_ms: 200, sample_rate_hz: 48_000, step_size: 0.1 }
    }
}

pub struct EchoCanceller {
    config: AecConfig,
    taps: usize,
    weights: Vec<f32>,
    far_end_history: VecDeque<f32>,
    far_end_reference: VecDeque<f32>,
    reference_ready_frames: u32,
}

impl EchoCanceller {
    pub fn new(config: AecConfig) -> Self {
        let taps = (config.sample_rate_hz as u64 * config.tail_length_ms as u64 / 1000) as usize;
        Self {
            config,
            taps,
            weights: vec![0.0; taps],
            far_end_history: VecDeque::from(vec![0.0; taps]),
            far_end_reference: VecDeque::new(),
            reference_ready_frames: 0,
        }
    }

    /// Push playback samples into the far-end reference line. Called from
    /// the playback callback thread, per spec §5's concurrency model.
    pub fn push_far_end(&mut self, samples: &[i16]) {
        for &s in samples {
            self.far_end_reference.push_back(s as f32 / 32768.0);
        }
        while self.far_end_reference.len() > self.taps * 4 {
            self.far_end_reference.pop_front();
        }
        self.reference_ready_frames += 1;
    }

    /// Cancel echo from one near-end (microphone) frame.
    pub fn process(&mut self, near_end: &mut [i16]) -> NodeOutcome {
        if self.far_end_reference.len() < self.taps {
            // Soft failure: nothing to align against yet. Hold weights,
            // reduce effective step size for when data does arrive.
            return NodeOutcome::Degraded;
        }

        let step = if self.reference_ready_frames < 10 { self.config.step_size * 0.25 } else { self.config.step_size };

        for sample in near_end.iter_mut() {
            let far = self.far_end_reference.pop_front().unwrap_or(0.0);
            self.far_end_history.push_back(far);
            self.far_end_history.pop_front();

            let estimate: f32 =
                self.far_end_history.iter().zip(self.weights.iter()).map(|(x, w)| x * w).sum();

            let near = *sample as f32 / 32768.0;
            let error = near - estimate;

            let energy: f32 = self.far_end_history.iter().map(|x| x * x).sum::<f32>() + 1e-6;
            let mu = step / energy;
            for (w, x) in self.weights.iter_mut().zip(self.far_end_history.iter()) {
                *w += mu * error * x;
            }

            *sample = (error.clamp(-1.0, 1.0) * 32768.0) as i16;
        }

        NodeOutcome::Ok
    }
}
