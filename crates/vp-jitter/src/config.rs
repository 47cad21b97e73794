//! Jitter buffer configuration and spec defaults (§4.7).

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JitterConfig {
    pub initial_delay_ms: u32,
    pub min_delay_ms: u32,
    pub max_delay_ms: u32,
    /// Sliding window over which the running-max inter-arrival deviation
    /// is tracked to adapt `target_delay_ms`.
    pub adaptation_window_ms: u32,
    /// Consecutive concealed frames before falling back to faded silence.
    pub plc_max_consecutive: u32,
    pub frame_duration_ms: u32,
    /// Loss fraction over `drain_window` that forces `Draining`.
    pub drain_loss_threshold: f32,
    pub drain_window_ms: u32,
}

impl Default for JitterConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: 60,
            min_delay_ms: 20,
            max_delay_ms: 500,
            adaptation_window_ms: 500,
            plc_max_consecutive: 3,
            frame_duration_ms: 20,
            drain_loss_threshold: 0.80,
            drain_window_ms: 2000,
        }
    }
}
