//! SRTP key derivation function, RFC 3711 §4.3.
//!
//! All four profiles share this construction: encrypt a block of zeros
//! under the master key with AES-CTR, using an IV built from the master
//! salt XORed with a one-byte label. With `key_derivation_rate = 0` (the
//! only rate this pipeline supports — rekeying is driven by explicit
//! [`crate::session::SrtpSession::rekey`] calls, not a packet-count-based
//! schedule) the "index / kdr" term is always zero.

use aes::{Aes128, Aes256};
use ctr::cipher::{KeyIvInit, StreamCipher};

type Aes128Ctr = ctr::Ctr128BE<Aes128>;
type Aes256Ctr = ctr::Ctr128BE<Aes256>;

/// RFC 3711 §4.3.2 label bytes.
pub mod label {
    pub const SRTP_ENCRYPTION: u8 = 0x00;
    pub const SRTP_AUTH: u8 = 0x01;
    pub const SRTP_SALT: u8 = 0x02;
    pub const SRTCP_ENCRYPTION: u8 = 0x03;
    pub const SRTCP_AUTH: u8 = 0x04;
    pub const SRTCP_SALT: u8 = 0x05;
}

pub fn derive(master_key: &[u8], master_salt: &[u8], label: u8, out_len: usize) -> Vec<u8> {
    let salt_len = master_salt.len();
    let mut iv = [0u8; 16];
    iv[..salt_len].copy_from_slice(master_salt);
    iv[0] ^= label;

    let mut out = vec![0u8; out_len];
    match master_key.len() {
        16 => {
            let mut cipher = Aes128Ctr::new(master_key.into(), &iv.into());
            cipher.apply_keystream(&mut out);
        }
        32 => {
            let mut cipher = Aes256Ctr::new(master_key.into(), &iv.into());
            cipher.apply_keystream(&mut out);
        }
        other => unreachable!("unsupported master key length {other}, validated at session construction"),
    }
    out
}
