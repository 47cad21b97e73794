//! Estimator configuration and spec defaults (§4.6).

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BweConfig {
    pub initial_bitrate: u32,
    pub min_bitrate: u32,
    pub max_bitrate: u32,
    pub hold_time: Duration,
    pub additive_increase_bps_per_sec: f32,
    /// First-order filter coefficient for `current_bitrate` chasing
    /// `target_bitrate`; higher values track the target faster.
    pub smoothing_alpha: f32,
}

impl Default for BweConfig {
    fn default() -> Self {
        Self {
            initial_bitrate: 32_000,
            min_bitrate: 8_000,
            max_bitrate: 128_000,
            hold_time: Duration::from_millis(1000),
            additive_increase_bps_per_sec: 4_000.0,
            smoothing_alpha: 0.2,
        }
    }
}
