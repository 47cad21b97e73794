//! # vp-rtp: RTP packetization and session bookkeeping (C4)
//!
//! Builds and parses RTP packets, reconstructs the extended sequence number
//! across 16-bit wraps, tracks the RFC 3550 interarrival jitter estimate,
//! and schedules/ingests RTCP sender and receiver reports. Carries no
//! opinion about transport (see `vp-transport`) or encryption (see
//! `vp-srtp`) — this crate only knows about RTP/RTCP wire format and the
//! counters a session needs to keep.

pub mod error;
pub mod header;
pub mod packet;
pub mod rtcp;
pub mod session;

pub use error::{Result, RtpError};
pub use header::RtpHeader;
pub use packet::RtpPacket;
pub use session::{RtpReceiver, RtpSender, RttEstimate};
