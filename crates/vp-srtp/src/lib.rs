//! # vp-srtp: SRTP/SRTCP protect and unprotect (C5)
//!
//! Four crypto profiles — AES-128-CM with HMAC-SHA1-80 or -32, and
//! AEAD-AES-128/256-GCM — over a single-SSRC session. Authenticate before
//! replay-checking, replay-check before decrypting: a forged or replayed
//! packet never reaches the decrypt step, and a failed packet never hands
//! back partial plaintext.

pub mod crypto;
pub mod error;
pub mod kdf;
pub mod profile;
pub mod replay;
pub mod session;
pub mod srtcp;

pub use error::{Result, SrtpError};
pub use profile::SrtpProfile;
pub use session::SrtpSession;
pub use srtcp::SrtcpSession;
