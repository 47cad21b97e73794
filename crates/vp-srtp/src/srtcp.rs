//! SRTCP protect/unprotect (RFC 3711 §3.4): same ciphers as SRTP, plus an
//! explicit 4-byte SRTCP index (E-bit + 31-bit counter) before the tag.

use crate::crypto;
use crate::error::{Result, SrtpError};
use crate::kdf::{self, label};
use crate::profile::SrtpProfile;
use crate::replay::{ReplayCheck, ReplayWindow};

const ENCRYPTED_FLAG: u32 = 0x8000_0000;

struct SrtcpKeys {
    enc_key: Vec<u8>,
    auth_key: Vec<u8>,
    salt: Vec<u8>,
}

impl SrtcpKeys {
    fn derive(profile: SrtpProfile, master_key: &[u8], master_salt: &[u8]) -> Self {
        let enc_key_len = master_key.len();
        Self {
            enc_key: kdf::derive(master_key, master_salt, label::SRTCP_ENCRYPTION, enc_key_len),
            auth_key: kdf::derive(master_key, master_salt, label::SRTCP_AUTH, profile.auth_key_len()),
            salt: kdf::derive(master_key, master_salt, label::SRTCP_SALT, master_salt.len()),
        }
    }
}

pub struct SrtcpSession {
    profile: SrtpProfile,
    keys: SrtcpKeys,
    ssrc: u32,
    send_index: u32,
    replay: ReplayWindow,
}

impl SrtcpSession {
    pub fn new(profile: SrtpProfile, master_key: &[u8], master_salt: &[u8], ssrc: u32, replay_window_size: u32) -> Result<Self> {
        if master_key.len() != profile.master_key_len() || master_salt.len() != profile.master_salt_len() {
            return Err(SrtpError::InvalidKeyMaterial);
        }
        Ok(Self {
            profile,
            keys: SrtcpKeys::derive(profile, master_key, master_salt),
            ssrc,
            send_index: 0,
            replay: ReplayWindow::new(replay_window_size),
        })
    }

    /// Encrypt one compound RTCP packet (the first 8 bytes, SSRC of
    /// sender plus the fixed SR/RR header, stay in the clear as AAD per
    /// RFC 3711 §3.4; this crate always encrypts, so the E-bit is fixed).
    pub fn protect(&mut self, rtcp_compound: &[u8]) -> Result<Vec<u8>> {
        if rtcp_compound.len() < 8 {
            return Err(SrtpError::PacketTooShort);
        }
        let index = self.send_index;
        self.send_index = self.send_index.wrapping_add(1) & 0x7FFF_FFFF;

        let (aad, plaintext) = rtcp_compound.split_at(8);
        let index_trailer = (ENCRYPTED_FLAG | index).to_be_bytes();

        let mut out = aad.to_vec();
        if self.profile.is_aead() {
            let nonce = crypto::aead_nonce(&self.keys.salt, self.ssrc, index as u64);
            let mut aad_with_index = aad.to_vec();
            aad_with_index.extend_from_slice(&index_trailer);
            let sealed = crypto::aead_seal(&self.keys.enc_key, nonce, &aad_with_index, plaintext)?;
            out.extend_from_slice(&sealed);
            out.extend_from_slice(&index_trailer);
        } else {
            let iv = crypto::ctr_iv(&self.keys.salt, self.ssrc, index as u64);
            let mut ciphertext = plaintext.to_vec();
            crypto::ctr_xor(&self.keys.enc_key, iv, &mut ciphertext);
            out.extend_from_slice(&ciphertext);
            out.extend_from_slice(&index_trailer);
            let tag = crypto::hmac_sha1_tag(&self.keys.auth_key, &out, self.profile.auth_tag_len());
            out.extend_from_slice(&tag);
            return Ok(out);
        }
        Ok(out)
    }

    pub fn unprotect(&mut self, data: &[u8]) -> Result<Vec<u8>> {
        let tag_len = self.profile.auth_tag_len();
        if data.len() < 8 + 4 + tag_len {
            return Err(SrtpError::PacketTooShort);
        }
        let (aad, rest) = data.split_at(8);
        let (body, tag) = rest.split_at(rest.len() - tag_len);
        let (ciphertext, index_trailer) = body.split_at(body.len() - 4);
        let index_word = u32::from_be_bytes([index_trailer[0], index_trailer[1], index_trailer[2], index_trailer[3]]);
        let index = (index_word & 0x7FFF_FFFF) as u64;
        let encrypted = index_word & ENCRYPTED_FLAG != 0;

        if !self.profile.is_aead() {
            let mut to_auth = aad.to_vec();
            to_auth.extend_from_slice(ciphertext);
            to_auth.extend_from_slice(index_trailer);
            let expected = crypto::hmac_sha1_tag(&self.keys.auth_key, &to_auth, tag_len);
            if expected != tag {
                return Err(SrtpError::AuthFailed);
            }
        }

        match self.replay.check(index) {
            ReplayCheck::Replayed | ReplayCheck::TooOld => return Err(SrtpError::ReplayAttack { index }),
            ReplayCheck::NewWithinWindow => {}
        }

        let plaintext = if !encrypted {
            ciphertext.to_vec()
        } else if self.profile.is_aead() {
            let nonce = crypto::aead_nonce(&self.keys.salt, self.ssrc, index);
            let mut aad_with_index = aad.to_vec();
            aad_with_index.extend_from_slice(index_trailer);
            let mut sealed = ciphertext.to_vec();
            sealed.extend_from_slice(tag);
            crypto::aead_open(&self.keys.enc_key, nonce, &aad_with_index, &sealed)?
        } else {
            let iv = crypto::ctr_iv(&self.keys.salt, self.ssrc, index);
            let mut plaintext = ciphertext.to_vec();
            crypto::ctr_xor(&self.keys.enc_key, iv, &mut plaintext);
            plaintext
        };

        self.replay.mark_seen(index);

        let mut out = aad.to_vec();
        out.extend_from_slice(&plaintext);
        Ok(out)
    }
}
