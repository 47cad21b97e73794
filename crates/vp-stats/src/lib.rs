//! # vp-stats: per-frame and aggregate quality statistics (C10)
//!
//! Ingests per-frame DSP/codec/transport observations and exposes both the
//! raw per-frame record and a running aggregate view, including an
//! ITU-T G.107 E-model MOS estimate.

pub mod aggregate;
pub mod frame;
pub mod mos;

pub use aggregate::{AggregateStats, StatsCollector};
pub use frame::FrameStats;
pub use mos::CodecQualityParams;
