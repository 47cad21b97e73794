//! Per-node failure model shared by every DSP stage (spec §4.8).

use thiserror::Error;

/// What happened running one node over one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeOutcome {
    /// Ran normally.
    Ok,
    /// Ran, but with reduced quality (e.g. AEC falling back to a slower
    /// adaptation rate because the far-end reference looked stale).
    Degraded,
    /// Skipped entirely this frame; input passed through unmodified.
    Bypassed,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeError {
    #[error("DSP node failed fatally")]
    Fatal,
}
