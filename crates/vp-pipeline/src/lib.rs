//! # vp-pipeline: full-duplex orchestrator (C9)
//!
//! Wires capture/playback ring buffers, the send/receive DSP chains,
//! codec encode/decode, RTP/SRTP, the jitter buffer and PLC scheduling,
//! bandwidth estimation, and the datagram transport into one pipeline
//! object with a small public surface: push a capture frame in, pull a
//! playback frame out, register callbacks, start/stop.
//!
//! Every other crate in this workspace is a component; this crate owns no
//! DSP or codec logic of its own, only the threads and locks that make
//! those components run together in real time (spec §4.9).

mod callbacks;
mod config;
mod error;
mod far_end;
mod pipeline;

pub use callbacks::{Callbacks, EncodedDataCallback, ErrorCallback, StateChangeCallback};
pub use config::{CodecTypeConfig, DenoiseEngine, PipelineConfig, PipelineMode, SrtpProfileConfig};
pub use error::{PipelineError, Result};
pub use far_end::FarEndDelayLine;
pub use pipeline::Pipeline;
