//! Error taxonomy for SRTP/SRTCP protect/unprotect.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SrtpError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SrtpError {
    #[error("buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall { needed: usize, available: usize },

    /// Authentication tag mismatch. No plaintext is ever returned alongside
    /// this error — the caller gets nothing to leak.
    #[error("SRTP authentication failed")]
    AuthFailed,

    #[error("replay attack detected for packet index {index}")]
    ReplayAttack { index: u64 },

    #[error("invalid master key/salt length for this profile")]
    InvalidKeyMaterial,

    #[error("packet too short to contain a valid RTP/RTCP header")]
    PacketTooShort,

    #[error(transparent)]
    Rtp(#[from] vp_rtp::RtpError),
}

impl From<SrtpError> for vp_core::Error {
    fn from(e: SrtpError) -> Self {
        match e {
            SrtpError::BufferTooSmall { needed, available } => {
                vp_core::Error::BufferTooSmall { needed, available }
            }
            SrtpError::AuthFailed => vp_core::Error::AuthFailed,
            SrtpError::ReplayAttack { index } => vp_core::Error::ReplayAttack { seq: index },
            other => vp_core::Error::InvalidParameter(other.to_string()),
        }
    }
}
