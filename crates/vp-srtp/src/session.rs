//! SRTP protect/unprotect over a single SSRC (spec §4.5).

use bytes::Bytes;

use crate::crypto;
use crate::error::{Result, SrtpError};
use crate::kdf::{self, label};
use crate::profile::SrtpProfile;
use crate::replay::{ReplayCheck, ReplayWindow};
use vp_rtp::header::FIXED_HEADER_SIZE;
use vp_rtp::{RtpHeader, RtpPacket};

/// Derived per-packet key material for one direction.
struct SessionKeys {
    enc_key: Vec<u8>,
    auth_key: Vec<u8>,
    salt: Vec<u8>,
}

impl SessionKeys {
    fn derive(profile: SrtpProfile, master_key: &[u8], master_salt: &[u8]) -> Self {
        let enc_key_len = master_key.len();
        Self {
            enc_key: kdf::derive(master_key, master_salt, label::SRTP_ENCRYPTION, enc_key_len),
            auth_key: kdf::derive(master_key, master_salt, label::SRTP_AUTH, profile.auth_key_len()),
            salt: kdf::derive(master_key, master_salt, label::SRTP_SALT, master_salt.len()),
        }
    }

    fn zero(&mut self) {
        for b in self.enc_key.iter_mut().chain(self.auth_key.iter_mut()).chain(self.salt.iter_mut()) {
            *b = 0;
        }
    }
}

/// Tracks the rollover counter against the last sequence number seen, so a
/// 16-bit wrap turns into the right 48-bit packet index (RFC 3711 §3.3.1).
#[derive(Default)]
struct RolloverTracker {
    roc: u32,
    last_seq: Option<u16>,
}

impl RolloverTracker {
    fn packet_index(&mut self, seq: u16) -> u64 {
        if let Some(last) = self.last_seq {
            if last > 0xC000 && seq < 0x4000 {
                self.roc = self.roc.wrapping_add(1);
            }
        }
        self.last_seq = Some(seq);
        (self.roc as u64) << 16 | seq as u64
    }
}

/// One direction's worth of SRTP state, bound to a single SSRC.
pub struct SrtpSession {
    profile: SrtpProfile,
    master_key: Vec<u8>,
    master_salt: Vec<u8>,
    keys: SessionKeys,
    ssrc: u32,
    replay: ReplayWindow,
    rollover: RolloverTracker,
}

impl SrtpSession {
    pub fn new(profile: SrtpProfile, master_key: Vec<u8>, master_salt: Vec<u8>, ssrc: u32, replay_window_size: u32) -> Result<Self> {
        if master_key.len() != profile.master_key_len() || master_salt.len() != profile.master_salt_len() {
            return Err(SrtpError::InvalidKeyMaterial);
        }
        let keys = SessionKeys::derive(profile, &master_key, &master_salt);
        Ok(Self {
            profile,
            master_key,
            master_salt,
            keys,
            ssrc,
            replay: ReplayWindow::new(replay_window_size),
            rollover: RolloverTracker::default(),
        })
    }

    pub fn profile(&self) -> SrtpProfile {
        self.profile
    }

    /// Replace the master key/salt atomically, re-deriving session keys and
    /// zeroing the old ones in place. The rollover tracker and replay
    /// window carry over so a rekey mid-stream doesn't reopen a replay
    /// window against already-seen indices.
    pub fn rekey(&mut self, master_key: Vec<u8>, master_salt: Vec<u8>) -> Result<()> {
        if master_key.len() != self.profile.master_key_len() || master_salt.len() != self.profile.master_salt_len() {
            return Err(SrtpError::InvalidKeyMaterial);
        }
        let new_keys = SessionKeys::derive(self.profile, &master_key, &master_salt);
        let mut old_keys = std::mem::replace(&mut self.keys, new_keys);
        old_keys.zero();
        let mut old_master_key = std::mem::replace(&mut self.master_key, master_key);
        let mut old_master_salt = std::mem::replace(&mut self.master_salt, master_salt);
        old_master_key.iter_mut().for_each(|b| *b = 0);
        old_master_salt.iter_mut().for_each(|b| *b = 0);
        Ok(())
    }

    /// Encrypt and authenticate one outbound RTP packet, returning the
    /// wire-ready SRTP packet (header in clear, encrypted payload, auth
    /// tag appended).
    pub fn protect(&mut self, packet: &RtpPacket) -> Result<Vec<u8>> {
        let index = self.rollover.packet_index(packet.header.sequence_number);
        let header_bytes = packet.header.serialize_to_vec();

        let body = if self.profile.is_aead() {
            let nonce = crypto::aead_nonce(&self.keys.salt, self.ssrc, index);
            crypto::aead_seal(&self.keys.enc_key, nonce, &header_bytes, &packet.payload)?
        } else {
            let iv = crypto::ctr_iv(&self.keys.salt, self.ssrc, index);
            let mut ciphertext = packet.payload.to_vec();
            crypto::ctr_xor(&self.keys.enc_key, iv, &mut ciphertext);
            let mut to_auth = header_bytes.clone();
            to_auth.extend_from_slice(&ciphertext);
            to_auth.extend_from_slice(&(self.rollover.roc).to_be_bytes());
            let tag = crypto::hmac_sha1_tag(&self.keys.auth_key, &to_auth, self.profile.auth_tag_len());
            ciphertext.extend_from_slice(&tag);
            ciphertext
        };

        let mut out = header_bytes;
        out.extend_from_slice(&body);
        Ok(out)
    }

    /// Authenticate, replay-check, then decrypt one inbound SRTP packet.
    /// Order matters (§4.5): a forged packet never reaches the replay
    /// window or the decrypt step, and a replayed packet never reaches
    /// decrypt even if its tag would have verified.
    pub fn unprotect(&mut self, data: &[u8]) -> Result<RtpPacket> {
        if data.len() < FIXED_HEADER_SIZE + self.profile.auth_tag_len() {
            return Err(SrtpError::PacketTooShort);
        }
        let header = RtpHeader::parse(&mut Bytes::copy_from_slice(data))?;
        let header_len = header.size();
        let tag_len = self.profile.auth_tag_len();
        let body = &data[header_len..];
        if body.len() < tag_len {
            return Err(SrtpError::PacketTooShort);
        }
        let (ciphertext, tag) = body.split_at(body.len() - tag_len);
        let header_bytes = &data[..header_len];

        let index = {
            let mut probe = RolloverTracker { roc: self.rollover.roc, last_seq: self.rollover.last_seq };
            probe.packet_index(header.sequence_number)
        };

        if !self.profile.is_aead() {
            let mut to_auth = header_bytes.to_vec();
            to_auth.extend_from_slice(ciphertext);
            to_auth.extend_from_slice(&(index >> 16).to_be_bytes()[4..]);
            let expected = crypto::hmac_sha1_tag(&self.keys.auth_key, &to_auth, tag_len);
            if !constant_time_eq(&expected, tag) {
                return Err(SrtpError::AuthFailed);
            }
        }

        match self.replay.check(index) {
            ReplayCheck::Replayed | ReplayCheck::TooOld => {
                return Err(SrtpError::ReplayAttack { index });
            }
            ReplayCheck::NewWithinWindow => {}
        }

        let plaintext = if self.profile.is_aead() {
            let nonce = crypto::aead_nonce(&self.keys.salt, self.ssrc, index);
            let mut full_ciphertext = ciphertext.to_vec();
            full_ciphertext.extend_from_slice(tag);
            crypto::aead_open(&self.keys.enc_key, nonce, header_bytes, &full_ciphertext)?
        } else {
            let iv = crypto::ctr_iv(&self.keys.salt, self.ssrc, index);
            let mut plaintext = ciphertext.to_vec();
            crypto::ctr_xor(&self.keys.enc_key, iv, &mut plaintext);
            plaintext
        };

        self.rollover.packet_index(header.sequence_number);
        self.replay.mark_seen(index);

        Ok(RtpPacket::new(header, Bytes::from(plaintext)))
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
