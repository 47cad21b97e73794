//! Error taxonomy for RTP packetization and session bookkeeping.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RtpError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RtpError {
    #[error("unsupported RTP version {0}, only version 2 is handled")]
    UnsupportedVersion(u8),

    #[error("buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall { needed: usize, available: usize },

    #[error("malformed RTP header: {0}")]
    MalformedHeader(String),

    #[error("malformed RTCP packet: {0}")]
    MalformedRtcp(String),

    #[error("unknown RTCP packet type {0}")]
    UnknownRtcpType(u8),
}

impl From<RtpError> for vp_core::Error {
    fn from(e: RtpError) -> Self {
        match e {
            RtpError::BufferTooSmall { needed, available } => {
                vp_core::Error::BufferTooSmall { needed, available }
            }
            other => vp_core::Error::InvalidParameter(other.to_string()),
        }
    }
}
