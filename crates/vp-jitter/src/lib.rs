//! # vp-jitter: adaptive jitter buffer + PLC scheduling (C7)
//!
//! Buffers arriving frames by extended sequence number, adapts its target
//! delay to observed arrival-time deviation, and tells the playout clock
//! what to do each frame period: play, conceal via the codec's PLC, emit
//! faded silence once the concealment budget is spent, skip ahead, or
//! time-stretch to absorb a shrinking buffer.

pub mod buffer;
pub mod config;
pub mod state;

pub use buffer::{JitterBuffer, PopOutcome};
pub use config::JitterConfig;
pub use state::BufferState;
