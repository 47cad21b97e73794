//! Per-frame statistics ingestion (spec §4.10).

use vp_dsp::{NodeOutcome, VadDecision};

/// Snapshot of everything worth knowing about one frame as it crosses the
/// pipeline, fed in after each send-side and receive-side pass.
#[derive(Debug, Clone, Copy)]
pub struct FrameStats {
    pub input_rms_dbfs: f32,
    pub input_peak: f32,
    pub output_rms_dbfs: f32,
    pub output_peak: f32,
    pub vad: VadDecision,
    pub aec_status: NodeOutcome,
    pub codec_size_bytes: usize,
    pub rtp_seq: u16,
    pub rtp_timestamp: u32,
    pub srtp_auth_ok: bool,
}
