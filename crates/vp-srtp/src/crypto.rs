//! Per-packet cipher and MAC primitives shared by SRTP and SRTCP.

use aes::{Aes128, Aes256};
use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes128Gcm, Aes256Gcm, Nonce};
use ctr::cipher::{KeyIvInit, StreamCipher};
use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::error::{Result, SrtpError};

type Aes128Ctr = ctr::Ctr128BE<Aes128>;
type Aes256Ctr = ctr::Ctr128BE<Aes256>;
type HmacSha1 = Hmac<Sha1>;

/// Build the 16-byte CTR IV from the session salt, SSRC, and 48-bit packet
/// index (RFC 3711 §4.1.1): `IV = (salt || 0) XOR (SSRC at bit 64) XOR
/// (index at bit 16)`.
pub fn ctr_iv(salt: &[u8], ssrc: u32, packet_index: u64) -> [u8; 16] {
    let mut iv = [0u8; 16];
    iv[..salt.len()].copy_from_slice(salt);
    let ssrc_bytes = ssrc.to_be_bytes();
    for i in 0..4 {
        iv[4 + i] ^= ssrc_bytes[i];
    }
    let index_bytes = packet_index.to_be_bytes(); // 8 bytes, top 2 are always zero (48-bit index)
    for i in 0..6 {
        iv[8 + i] ^= index_bytes[2 + i];
    }
    iv
}

pub fn ctr_xor(key: &[u8], iv: [u8; 16], data: &mut [u8]) {
    match key.len() {
        16 => Aes128Ctr::new(key.into(), &iv.into()).apply_keystream(data),
        32 => Aes256Ctr::new(key.into(), &iv.into()).apply_keystream(data),
        other => unreachable!("unsupported key length {other}"),
    }
}

pub fn hmac_sha1_tag(auth_key: &[u8], data: &[u8], tag_len: usize) -> Vec<u8> {
    let mut mac = HmacSha1::new_from_slice(auth_key).expect("HMAC accepts any key length");
    mac.update(data);
    mac.finalize().into_bytes()[..tag_len].to_vec()
}

/// 96-bit AEAD nonce (RFC 7714 §8.1): the 12-byte salt XORed with the SSRC
/// and 48-bit packet index, same placement logic as the CTR IV but over a
/// 12-byte field.
pub fn aead_nonce(salt: &[u8], ssrc: u32, packet_index: u64) -> [u8; 12] {
    let mut nonce = [0u8; 12];
    nonce[..salt.len().min(12)].copy_from_slice(&salt[..salt.len().min(12)]);
    let ssrc_bytes = ssrc.to_be_bytes();
    for i in 0..4 {
        nonce[2 + i] ^= ssrc_bytes[i];
    }
    let index_bytes = packet_index.to_be_bytes();
    for i in 0..6 {
        nonce[6 + i] ^= index_bytes[2 + i];
    }
    nonce
}

pub fn aead_seal(key: &[u8], nonce: [u8; 12], aad: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    let payload = Payload { msg: plaintext, aad };
    let nonce = Nonce::from_slice(&nonce);
    let sealed = match key.len() {
        16 => Aes128Gcm::new_from_slice(key).unwrap().encrypt(nonce, payload),
        32 => Aes256Gcm::new_from_slice(key).unwrap().encrypt(nonce, payload),
        other => unreachable!("unsupported key length {other}"),
    };
    sealed.map_err(|_| SrtpError::AuthFailed)
}

pub fn aead_open(key: &[u8], nonce: [u8; 12], aad: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
    let payload = Payload { msg: ciphertext, aad };
    let nonce = Nonce::from_slice(&nonce);
    let opened = match key.len() {
        16 => Aes128Gcm::new_from_slice(key).unwrap().decrypt(nonce, payload),
        32 => Aes256Gcm::new_from_slice(key).unwrap().decrypt(nonce, payload),
        other => unreachable!("unsupported key length {other}"),
    };
    opened.map_err(|_| SrtpError::AuthFailed)
}
