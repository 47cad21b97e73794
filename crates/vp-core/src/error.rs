//! Top-level error taxonomy (spec §7).
//!
//! Every crate in this workspace defines its own `thiserror` enum for the
//! errors specific to its component (`CodecError`, `RtpError`, `SrtpError`,
//! ...). This module defines the *abstract* taxonomy spec §7 requires
//! callers be able to reason about regardless of which component raised
//! the error, plus the aggregating [`Error`] that `vp-pipeline` uses at its
//! public boundary.

use thiserror::Error;

/// Result alias used throughout `vp-core` and re-exported for convenience.
pub type Result<T> = std::result::Result<T, Error>;

/// The abstract error taxonomy from spec §7, independent of which
/// component raised the underlying error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller-supplied configuration rejected; surfaced synchronously, no
    /// state change.
    InvalidParameter,
    NotInitialized,
    AlreadyInitialized,
    /// Allocation failure; surfaces as `Faulted` state.
    OutOfMemory,
    /// Output capacity insufficient; caller retries with a larger buffer.
    BufferTooSmall,
    DeviceOpenFailed,
    DeviceStartFailed,
    /// Codec-level; current frame is dropped, statistics incremented,
    /// pipeline continues.
    EncodeFailed,
    DecodeFailed,
    /// SRTP; packet is silently dropped and counted.
    AuthFailed,
    ReplayAttack,
    /// Transient; receive loop continues.
    NetworkTimeout,
    /// File-I/O collaborators only; unused by the core pipeline itself.
    FileCorrupt,
}

impl ErrorKind {
    /// Whether an error of this kind is recovered locally (counted, never
    /// escalated) per §7's propagation policy, as opposed to one that
    /// surfaces synchronously or transitions the pipeline to `Faulted`.
    pub const fn is_single_frame_recoverable(self) -> bool {
        matches!(
            self,
            Self::EncodeFailed | Self::DecodeFailed | Self::AuthFailed | Self::ReplayAttack | Self::NetworkTimeout
        )
    }

    /// Whether an error of this kind mandates a transition to `Faulted`.
    pub const fn is_fatal(self) -> bool {
        matches!(self, Self::OutOfMemory | Self::DeviceOpenFailed | Self::DeviceStartFailed)
    }
}

/// Top-level pipeline error. Component crates convert their own error
/// types into this at the boundary where they're handed to `vp-pipeline`
/// or another cross-crate caller.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("component not initialized: {0}")]
    NotInitialized(String),

    #[error("component already initialized: {0}")]
    AlreadyInitialized(String),

    #[error("out of memory: {0}")]
    OutOfMemory(String),

    #[error("buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall { needed: usize, available: usize },

    #[error("device open failed: {0}")]
    DeviceOpenFailed(String),

    #[error("device start failed: {0}")]
    DeviceStartFailed(String),

    #[error("encode failed: {0}")]
    EncodeFailed(String),

    #[error("decode failed: {0}")]
    DecodeFailed(String),

    #[error("SRTP authentication failed")]
    AuthFailed,

    #[error("SRTP replay attack detected for seq {seq}")]
    ReplayAttack { seq: u64 },

    #[error("network operation timed out after {0}ms")]
    NetworkTimeout(u64),

    #[error("file corrupt: {0}")]
    FileCorrupt(String),
}

impl Error {
    /// Map to the abstract taxonomy (§7).
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidParameter(_) => ErrorKind::InvalidParameter,
            Self::NotInitialized(_) => ErrorKind::NotInitialized,
            Self::AlreadyInitialized(_) => ErrorKind::AlreadyInitialized,
            Self::OutOfMemory(_) => ErrorKind::OutOfMemory,
            Self::BufferTooSmall { .. } => ErrorKind::BufferTooSmall,
            Self::DeviceOpenFailed(_) => ErrorKind::DeviceOpenFailed,
            Self::DeviceStartFailed(_) => ErrorKind::DeviceStartFailed,
            Self::EncodeFailed(_) => ErrorKind::EncodeFailed,
            Self::DecodeFailed(_) => ErrorKind::DecodeFailed,
            Self::AuthFailed => ErrorKind::AuthFailed,
            Self::ReplayAttack { .. } => ErrorKind::ReplayAttack,
            Self::NetworkTimeout(_) => ErrorKind::NetworkTimeout,
            Self::FileCorrupt(_) => ErrorKind::FileCorrupt,
        }
    }

    /// §7 propagation policy: should this be recovered locally (counted,
    /// never escalated) rather than surfaced to the caller or faulted?
    pub const fn is_single_frame_recoverable(&self) -> bool {
        self.kind().is_single_frame_recoverable()
    }

    pub const fn is_fatal(&self) -> bool {
        self.kind().is_fatal()
    }
}
