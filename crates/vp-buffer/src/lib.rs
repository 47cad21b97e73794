//! # vp-buffer: lock-free PCM frame ring (spec §4.1, C1)
//!
//! A single-producer/single-consumer ring of `i16` samples, sized in
//! frames. Grounded on `rvoip-rtp-core::buffer`'s split between bounded
//! capacity accounting (`BufferLimits`) and the actual ring storage, with
//! the addition of the spec's two overflow policies: real-time producers
//! truncate on overflow, file-driven producers block until capacity frees.
//!
//! Ordering is FIFO per (producer, consumer) pair; `ringbuf`'s SPSC ring
//! gives us acquire/release semantics on the head/tail indices for free, so
//! a reader observes every write that happened-before the matching tail
//! publication.

mod ring;

pub use ring::{FrameRingReader, FrameRingWriter, OverflowPolicy};

use thiserror::Error;

/// Errors raised by the frame ring.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BufferError {
    #[error("ring capacity must be > 0")]
    ZeroCapacity,
    #[error("blocking write timed out after {0}ms")]
    WriteTimeout(u64),
}

pub type Result<T> = std::result::Result<T, BufferError>;

impl From<BufferError> for vp_core::Error {
    fn from(e: BufferError) -> Self {
        match e {
            BufferError::ZeroCapacity => vp_core::Error::InvalidParameter(e.to_string()),
            BufferError::WriteTimeout(ms) => vp_core::Error::NetworkTimeout(ms),
        }
    }
}

/// Create a new ring with the given capacity (in samples) and overflow
/// policy, returning the writer (producer) and reader (consumer) halves.
/// Each half is meant to live on exactly one thread (§4.1 "Concurrency:
/// lock-free... readers see all writes made before the matching tail
/// publication").
pub fn frame_ring(capacity_samples: usize, policy: OverflowPolicy) -> Result<(FrameRingWriter, FrameRingReader)> {
    if capacity_samples == 0 {
        return Err(BufferError::ZeroCapacity);
    }
    Ok(ring::build(capacity_samples, policy))
}
