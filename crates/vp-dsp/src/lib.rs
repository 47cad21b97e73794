//! # vp-dsp: send/receive DSP chain (C8)
//!
//! Frame-synchronous graph run once per captured/decoded frame. Send side:
//! echo canceller, denoiser, AGC, VAD. Receive side (optional): equalizer,
//! compressor/limiter, comfort noise. Every node reports a [`node::NodeOutcome`]
//! so the orchestrator can distinguish best-effort degradation from a fatal
//! fault that should transition the pipeline to `Faulted`.

pub mod aec;
pub mod agc;
pub mod chain;
pub mod denoise;
pub mod node;
pub mod vad;

pub use aec::{AecConfig, EchoCanceller};
pub use agc::{AgcConfig, AgcMode, AutomaticGainControl};
pub use chain::{DspChainConfig, ReceiveChain, ReceiveChainConfig, SendChain, SendFrameReport};
pub use denoise::{Denoiser, DenoiserConfig};
pub use node::{NodeError, NodeOutcome};
pub use vad::{VadConfig, VadDecision, VoiceActivityDetector};
