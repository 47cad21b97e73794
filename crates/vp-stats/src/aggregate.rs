//! Aggregate session statistics, accumulated from per-frame and transport
//! level counters (spec §4.10).

use crate::frame::FrameStats;
use crate::mos::{self, CodecQualityParams};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateStats {
    pub packets_sent: u64,
    pub packets_received: u64,
    pub packets_lost: u64,
    pub bytes_sent: u64,
    pub bytes_received: u64,
    pub jitter_ms: f32,
    pub rtt_ms: f32,
    pub mos_lq: f32,
    pub mos_cq: f32,
    pub r_factor: f32,
    pub signal_level_dbfs: f32,
    pub noise_level_dbfs: f32,
    pub snr_db: f32,
    pub clipping_rate: f32,
    pub speech_ratio: f32,
}

impl Default for AggregateStats {
    fn default() -> Self {
        Self {
            packets_sent: 0,
            packets_received: 0,
            packets_lost: 0,
            bytes_sent: 0,
            bytes_received: 0,
            jitter_ms: 0.0,
            rtt_ms: 0.0,
            mos_lq: 4.5,
            mos_cq: 4.5,
            r_factor: 93.2,
            signal_level_dbfs: f32::NEG_INFINITY,
            noise_level_dbfs: f32::NEG_INFINITY,
            snr_db: 0.0,
            clipping_rate: 0.0,
            speech_ratio: 0.0,
        }
    }
}

/// Accumulates per-frame observations and transport counters into the
/// aggregate view, recomputing MOS whenever `snapshot()` is called.
pub struct StatsCollector {
    codec: CodecQualityParams,
    packets_sent: u64,
    packets_received: u64,
    packets_lost: u64,
    bytes_sent: u64,
    bytes_received: u64,
    jitter_ms: f32,
    rtt_ms: f32,
    frames_seen: u64,
    speech_frames: u64,
    clipped_frames: u64,
    signal_sum_dbfs: f64,
    noise_floor_dbfs: f32,
}

impl StatsCollector {
    pub fn new(codec: CodecQualityParams) -> Self {
        Self {
            codec,
            packets_sent: 0,
            packets_received: 0,
            packets_lost: 0,
            bytes_sent: 0,
            bytes_received: 0,
            jitter_ms: 0.0,
            rtt_ms: 0.0,
            frames_seen: 0,
            speech_frames: 0,
            clipped_frames: 0,
            signal_sum_dbfs: 0.0,
            noise_floor_dbfs: -96.0,
        }
    }

    pub fn record_frame(&mut self, frame: &FrameStats) {
        self.frames_seen += 1;
        if frame.vad == vp_dsp::VadDecision::Speech {
            self.speech_frames += 1;
        }
        if frame.output_peak >= 0.999 {
            self.clipped_frames += 1;
        }
        if frame.output_rms_dbfs.is_finite() {
            self.signal_sum_dbfs += frame.output_rms_dbfs as f64;
        }
        if frame.vad == vp_dsp::VadDecision::Silence && frame.output_rms_dbfs.is_finite() {
            self.noise_floor_dbfs = self.noise_floor_dbfs * 0.9 + frame.output_rms_dbfs * 0.1;
        }
    }

    pub fn record_packet_sent(&mut self, bytes: usize) {
        self.packets_sent += 1;
        self.bytes_sent += bytes as u64;
    }

    pub fn record_packet_received(&mut self, bytes: usize) {
        self.packets_received += 1;
        self.bytes_received += bytes as u64;
    }

    pub fn record_packet_lost(&mut self) {
        self.packets_lost += 1;
    }

    pub fn update_network(&mut self, jitter_ms: f32, rtt_ms: f32) {
        self.jitter_ms = jitter_ms;
        self.rtt_ms = rtt_ms;
    }

    fn loss_percent(&self) -> f32 {
        let total = self.packets_received + self.packets_lost;
        if total == 0 {
            0.0
        } else {
            100.0 * self.packets_lost as f32 / total as f32
        }
    }

    pub fn snapshot(&self) -> AggregateStats {
        let loss_percent = self.loss_percent();
        let r_lq = mos::r_factor(0.0, self.codec, loss_percent);
        let one_way_delay = self.rtt_ms / 2.0;
        let r_cq = mos::r_factor(one_way_delay, self.codec, loss_percent);

        let signal_level_dbfs = if self.frames_seen > 0 {
            (self.signal_sum_dbfs / self.frames_seen as f64) as f32
        } else {
            f32::NEG_INFINITY
        };

        let snr_db = if signal_level_dbfs.is_finite() { signal_level_dbfs - self.noise_floor_dbfs } else { 0.0 };

        let speech_ratio = if self.frames_seen > 0 { self.speech_frames as f32 / self.frames_seen as f32 } else { 0.0 };
        let clipping_rate = if self.frames_seen > 0 { self.clipped_frames as f32 / self.frames_seen as f32 } else { 0.0 };

        AggregateStats {
            packets_sent: self.packets_sent,
            packets_received: self.packets_received,
            packets_lost: self.packets_lost,
            bytes_sent: self.bytes_sent,
            bytes_received: self.bytes_received,
            jitter_ms: self.jitter_ms,
            rtt_ms: self.rtt_ms,
            mos_lq: mos::mos_from_r(r_lq),
            mos_cq: mos::mos_from_r(r_cq),
            r_factor: r_cq,
            signal_level_dbfs,
            noise_level_dbfs: self.noise_floor_dbfs,
            snr_db,
            clipping_rate,
            speech_ratio,
        }
    }
}
