//! # vp-bwe: AIMD bandwidth estimator and quality-tier classifier (C6)
//!
//! A deliberately simpler control loop than full GCC/TWCC: additive
//! increase, multiplicative decrease driven by loss rate and RTT, held for
//! at least `hold_time_ms` between decisions. Quality tier is a separate,
//! UX-facing classification over the same inputs — it never feeds back
//! into the bitrate decision (spec §4.6).

mod config;
mod quality;

use std::time::{Duration, Instant};

pub use config::BweConfig;
pub use quality::QualityTier;

/// Inputs sampled once per RTCP report interval (spec §4.6).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BweInputs {
    pub packets_sent: u64,
    pub packets_lost: u64,
    pub rtt_ms: f32,
    pub jitter_ms: f32,
}

impl BweInputs {
    pub fn loss_rate(&self) -> f32 {
        if self.packets_sent == 0 {
            0.0
        } else {
            self.packets_lost as f32 / self.packets_sent as f32
        }
    }
}

/// The AIMD decision made on a given update (for observability/logging).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Increase,
    Decrease,
    Hold,
}

type ChangeCallback = Box<dyn FnMut(u32, u32, QualityTier) + Send>;

/// AIMD bandwidth estimator. `target_bitrate` moves by the AIMD rule;
/// `current_bitrate` chases `target_bitrate` through a first-order filter
/// so codec bitrate changes don't step discontinuously (spec §4.6).
pub struct BandwidthEstimator {
    config: BweConfig,
    target_bitrate: u32,
    current_bitrate: u32,
    last_decision_at: Option<Instant>,
    on_change: Option<ChangeCallback>,
}

impl BandwidthEstimator {
    pub fn new(config: BweConfig) -> Self {
        let start = config.initial_bitrate.clamp(config.min_bitrate, config.max_bitrate);
        Self {
            config,
            target_bitrate: start,
            current_bitrate: start,
            last_decision_at: None,
            on_change: None,
        }
    }

    pub fn on_bwe_change<F>(&mut self, callback: F)
    where
        F: FnMut(u32, u32, QualityTier) + Send + 'static,
    {
        self.on_change = Some(Box::new(callback));
    }

    /// Feed one report interval's worth of inputs. `now` and `elapsed`
    /// (time since the previous `update` call) are both caller-supplied so
    /// the estimator never touches the wall clock itself, keeping it
    /// deterministic and test-friendly.
    pub fn update(&mut self, inputs: BweInputs, now: Instant, elapsed: Duration) -> Decision {
        let due = self.last_decision_at.map(|t| now.duration_since(t) >= self.config.hold_time).unwrap_or(true);

        let decision = if !due {
            Decision::Hold
        } else {
            let loss_rate = inputs.loss_rate();
            if loss_rate > 0.10 || inputs.rtt_ms > 400.0 {
                self.target_bitrate = ((self.target_bitrate as f32) * 0.80) as u32;
                self.last_decision_at = Some(now);
                Decision::Decrease
            } else if loss_rate < 0.02 {
                let increment = (self.config.additive_increase_bps_per_sec * elapsed.as_secs_f32()) as u32;
                self.target_bitrate = self.target_bitrate.saturating_add(increment);
                self.last_decision_at = Some(now);
                Decision::Increase
            } else {
                Decision::Hold
            }
        };

        self.target_bitrate = self.target_bitrate.clamp(self.config.min_bitrate, self.config.max_bitrate);

        let old_current = self.current_bitrate;
        let alpha = self.config.smoothing_alpha;
        let delta = self.target_bitrate as f32 - self.current_bitrate as f32;
        self.current_bitrate = (self.current_bitrate as f32 + alpha * delta) as u32;
        self.current_bitrate = self.current_bitrate.clamp(self.config.min_bitrate, self.config.max_bitrate);

        let tier = QualityTier::classify(inputs.loss_rate(), inputs.rtt_ms, inputs.jitter_ms);
        if self.current_bitrate != old_current {
            if let Some(cb) = self.on_change.as_mut() {
                cb(old_current, self.current_bitrate, tier);
            }
        }

        decision
    }

    pub fn target_bitrate(&self) -> u32 {
        self.target_bitrate
    }

    pub fn current_bitrate(&self) -> u32 {
        self.current_bitrate
    }
}
