//! RTCP: sender/receiver reports, BYE, APP (RFC 3550 §6).

use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::{Result, RtpError};

const RTP_VERSION: u8 = 2;

/// RTCP packet type values (RFC 3550 §12.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RtcpPacketType {
    SenderReport,
    ReceiverReport,
    SourceDescription,
    Bye,
    App,
}

impl RtcpPacketType {
    fn from_u8(v: u8) -> Option<Self> {
        match v {
            200 => Some(Self::SenderReport),
            201 => Some(Self::ReceiverReport),
            202 => Some(Self::SourceDescription),
            203 => Some(Self::Bye),
            204 => Some(Self::App),
            _ => None,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            Self::SenderReport => 200,
            Self::ReceiverReport => 201,
            Self::SourceDescription => 202,
            Self::Bye => 203,
            Self::App => 204,
        }
    }
}

/// 64-bit NTP timestamp (RFC 3550 §4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NtpTimestamp {
    pub seconds: u32,
    pub fraction: u32,
}

const NTP_UNIX_OFFSET: u64 = 2_208_988_800;

impl NtpTimestamp {
    pub fn now() -> Self {
        let since_epoch = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or(Duration::ZERO);
        Self::from_duration_since_unix_epoch(since_epoch)
    }

    pub fn from_duration_since_unix_epoch(d: Duration) -> Self {
        let seconds = d.as_secs() + NTP_UNIX_OFFSET;
        let fraction = ((d.subsec_nanos() as u64) << 32) / 1_000_000_000;
        Self { seconds: seconds as u32, fraction: fraction as u32 }
    }

    /// Middle 32 bits used as the "last SR" (LSR) field in report blocks.
    pub fn to_compact(self) -> u32 {
        ((self.seconds & 0xFFFF) << 16) | (self.fraction >> 16)
    }
}

/// One SR/RR report block (RFC 3550 §6.4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportBlock {
    pub ssrc: u32,
    pub fraction_lost: u8,
    pub cumulative_lost: u32,
    pub highest_seq: u32,
    pub jitter: u32,
    pub last_sr: u32,
    pub delay_since_last_sr: u32,
}

impl ReportBlock {
    pub const SIZE: usize = 24;

    fn serialize(&self, buf: &mut BytesMut) {
        buf.put_u32(self.ssrc);
        buf.put_u8(self.fraction_lost);
        buf.put_u8(((self.cumulative_lost >> 16) & 0xFF) as u8);
        buf.put_u8(((self.cumulative_lost >> 8) & 0xFF) as u8);
        buf.put_u8((self.cumulative_lost & 0xFF) as u8);
        buf.put_u32(self.highest_seq);
        buf.put_u32(self.jitter);
        buf.put_u32(self.last_sr);
        buf.put_u32(self.delay_since_last_sr);
    }

    fn parse(buf: &mut impl Buf) -> Result<Self> {
        if buf.remaining() < Self::SIZE {
            return Err(RtpError::BufferTooSmall { needed: Self::SIZE, available: buf.remaining() });
        }
        let ssrc = buf.get_u32();
        let fraction_lost = buf.get_u8();
        let cumulative_lost =
            ((buf.get_u8() as u32) << 16) | ((buf.get_u8() as u32) << 8) | buf.get_u8() as u32;
        let highest_seq = buf.get_u32();
        let jitter = buf.get_u32();
        let last_sr = buf.get_u32();
        let delay_since_last_sr = buf.get_u32();
        Ok(Self { ssrc, fraction_lost, cumulative_lost, highest_seq, jitter, last_sr, delay_since_last_sr })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderReport {
    pub ssrc: u32,
    pub ntp_timestamp: NtpTimestamp,
    pub rtp_timestamp: u32,
    pub packet_count: u32,
    pub octet_count: u32,
    pub report_blocks: Vec<ReportBlock>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiverReport {
    pub ssrc: u32,
    pub report_blocks: Vec<ReportBlock>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bye {
    pub sources: Vec<u32>,
    pub reason: Option<String>,
}

/// One compound-packet element. `vp-rtp` only produces/consumes SR, RR and
/// BYE; SDES/APP are parsed-and-skipped so a compound packet from a peer
/// that includes them doesn't fail outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RtcpPacket {
    SenderReport(SenderReport),
    ReceiverReport(ReceiverReport),
    Bye(Bye),
}

fn header_byte(count: u8, pt: RtcpPacketType) -> (u8, u8) {
    let b0 = (RTP_VERSION << 6) | (count & 0x1F);
    (b0, pt.as_u8())
}

impl RtcpPacket {
    pub fn serialize(&self) -> BytesMut {
        let mut buf = BytesMut::new();
        match self {
            Self::SenderReport(sr) => {
                let (b0, pt) = header_byte(sr.report_blocks.len() as u8, RtcpPacketType::SenderReport);
                let length_words = (6 + sr.report_blocks.len() * ReportBlock::SIZE / 4) as u16;
                buf.put_u8(b0);
                buf.put_u8(pt);
                buf.put_u16(length_words);
                buf.put_u32(sr.ssrc);
                buf.put_u32(sr.ntp_timestamp.seconds);
                buf.put_u32(sr.ntp_timestamp.fraction);
                buf.put_u32(sr.rtp_timestamp);
                buf.put_u32(sr.packet_count);
                buf.put_u32(sr.octet_count);
                for block in &sr.report_blocks {
                    block.serialize(&mut buf);
                }
            }
            Self::ReceiverReport(rr) => {
                let (b0, pt) = header_byte(rr.report_blocks.len() as u8, RtcpPacketType::ReceiverReport);
                let length_words = (1 + rr.report_blocks.len() * ReportBlock::SIZE / 4) as u16;
                buf.put_u8(b0);
                buf.put_u8(pt);
                buf.put_u16(length_words);
                buf.put_u32(rr.ssrc);
                for block in &rr.report_blocks {
                    block.serialize(&mut buf);
                }
            }
            Self::Bye(bye) => {
                let (b0, pt) = header_byte(bye.sources.len() as u8, RtcpPacketType::Bye);
                let reason_bytes = bye.reason.as_deref().unwrap_or("").as_bytes();
                let reason_words = if reason_bytes.is_empty() { 0 } else { 1 + reason_bytes.len().div_ceil(4) };
                let length_words = (bye.sources.len() + reason_words) as u16;
                buf.put_u8(b0);
                buf.put_u8(pt);
                buf.put_u16(length_words);
                for src in &bye.sources {
                    buf.put_u32(*src);
                }
                if !reason_bytes.is_empty() {
                    buf.put_u8(reason_bytes.len() as u8);
                    buf.put_slice(reason_bytes);
                    let padded = 1 + reason_words * 4 - 1 - reason_bytes.len();
                    for _ in 0..padded {
                        buf.put_u8(0);
                    }
                }
            }
        }
        buf
    }

    pub fn parse(data: &[u8]) -> Result<Vec<Self>> {
        let mut buf = Bytes::copy_from_slice(data);
        let mut packets = Vec::new();
        while buf.remaining() >= 4 {
            let b0 = buf.chunk()[0];
            let version = b0 >> 6;
            if version != RTP_VERSION {
                return Err(RtpError::MalformedRtcp(format!("unsupported RTCP version {version}")));
            }
            let count = b0 & 0x1F;
            let pt_byte = buf.chunk()[1];
            let length_words = u16::from_be_bytes([buf.chunk()[2], buf.chunk()[3]]) as usize;
            let total_len = 4 + length_words * 4;
            if buf.remaining() < total_len {
                return Err(RtpError::MalformedRtcp(format!(
                    "truncated RTCP packet: need {total_len} bytes, have {}",
                    buf.remaining()
                )));
            }
            let mut body = buf.copy_to_bytes(total_len);
            body.advance(4); // consume the already-parsed 4-byte header

            match RtcpPacketType::from_u8(pt_byte) {
                Some(RtcpPacketType::SenderReport) => {
                    if body.remaining() < 20 {
                        return Err(RtpError::MalformedRtcp("truncated SR sender info".into()));
                    }
                    let ssrc = body.get_u32();
                    let ntp = NtpTimestamp { seconds: body.get_u32(), fraction: body.get_u32() };
                    let rtp_timestamp = body.get_u32();
                    let packet_count = body.get_u32();
                    let octet_count = body.get_u32();
                    let mut report_blocks = Vec::with_capacity(count as usize);
                    for _ in 0..count {
                        report_blocks.push(ReportBlock::parse(&mut body)?);
                    }
                    packets.push(Self::SenderReport(SenderReport {
                        ssrc,
                        ntp_timestamp: ntp,
                        rtp_timestamp,
                        packet_count,
                        octet_count,
                        report_blocks,
                    }));
                }
                Some(RtcpPacketType::ReceiverReport) => {
                    if body.remaining() < 4 {
                        return Err(RtpError::MalformedRtcp("truncated RR".into()));
                    }
                    let ssrc = body.get_u32();
                    let mut report_blocks = Vec::with_capacity(count as usize);
                    for _ in 0..count {
                        report_blocks.push(ReportBlock::parse(&mut body)?);
                    }
                    packets.push(Self::ReceiverReport(ReceiverReport { ssrc, report_blocks }));
                }
                Some(RtcpPacketType::Bye) => {
                    let mut sources = Vec::with_capacity(count as usize);
                    for _ in 0..count {
                        if body.remaining() < 4 {
                            return Err(RtpError::MalformedRtcp("truncated BYE source list".into()));
                        }
                        sources.push(body.get_u32());
                    }
                    let reason = if body.has_remaining() {
                        let len = body.get_u8() as usize;
                        if body.remaining() < len {
                            return Err(RtpError::MalformedRtcp("truncated BYE reason".into()));
                        }
                        let mut bytes = vec![0u8; len];
                        body.copy_to_slice(&mut bytes);
                        Some(String::from_utf8_lossy(&bytes).into_owned())
                    } else {
                        None
                    };
                    packets.push(Self::Bye(Bye { sources, reason }));
                }
                // SDES/APP/unknown: skip, the length field already let us
                // advance past the whole packet above.
                _ => {}
            }
        }
        Ok(packets)
    }
}
