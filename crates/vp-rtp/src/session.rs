//! RTP session: sequencing, extended-sequence reconstruction, RFC 3550
//! jitter estimation, and RTCP SR/RR bookkeeping.

use std::time::{Duration, Instant};

use bytes::Bytes;
use rand::Rng;

use crate::error::{Result, RtpError};
use crate::header::RtpHeader;
use crate::packet::RtpPacket;
use crate::rtcp::{NtpTimestamp, ReceiverReport, ReportBlock, RtcpPacket, SenderReport};

/// Nominal interval between RTCP sender reports; actual interval is
/// randomized ±20% to avoid synchronized report storms across a session
/// (RFC 3550 §6.2's reconsideration algorithm, simplified to a fixed base).
pub const RTCP_SR_INTERVAL: Duration = Duration::from_secs(5);

/// Send-side state: SSRC, sequence/timestamp progression, byte/packet
/// counters, and SR scheduling.
pub struct RtpSender {
    ssrc: u32,
    payload_type: u8,
    sequence_number: u16,
    timestamp: u32,
    samples_per_frame: u32,
    packets_sent: u64,
    bytes_sent: u64,
    last_sr_sent: Option<Instant>,
    next_sr_interval: Duration,
}

fn jittered_interval(base: Duration) -> Duration {
    let jitter_frac = rand::thread_rng().gen_range(-0.2..=0.2);
    Duration::from_secs_f64(base.as_secs_f64() * (1.0 + jitter_frac))
}

impl RtpSender {
    pub fn new(payload_type: u8, samples_per_frame: u32) -> Self {
        let mut rng = rand::thread_rng();
        Self {
            ssrc: rng.gen(),
            payload_type,
            sequence_number: rng.gen(),
            timestamp: rng.gen(),
            samples_per_frame,
            packets_sent: 0,
            bytes_sent: 0,
            last_sr_sent: None,
            next_sr_interval: jittered_interval(RTCP_SR_INTERVAL),
        }
    }

    pub fn ssrc(&self) -> u32 {
        self.ssrc
    }

    /// Build the next outbound RTP packet, advancing sequence number
    /// (wrapping at 2^16) and timestamp (by `samples_per_frame`).
    pub fn send(&mut self, payload: Bytes, marker: bool) -> RtpPacket {
        let mut header = RtpHeader::new(self.payload_type, self.sequence_number, self.timestamp, self.ssrc);
        header.marker = marker;
        self.sequence_number = self.sequence_number.wrapping_add(1);
        self.timestamp = self.timestamp.wrapping_add(self.samples_per_frame);
        self.packets_sent += 1;
        self.bytes_sent += payload.len() as u64;
        RtpPacket::new(header, payload)
    }

    /// Whether an RTCP SR is due, given the jittered interval since the
    /// last one (or since construction, if none has been sent yet).
    pub fn sr_due(&self, now: Instant, session_start: Instant) -> bool {
        let since = now.duration_since(self.last_sr_sent.unwrap_or(session_start));
        since >= self.next_sr_interval
    }

    pub fn build_sender_report(&mut self, now: Instant) -> SenderReport {
        self.last_sr_sent = Some(now);
        self.next_sr_interval = jittered_interval(RTCP_SR_INTERVAL);
        SenderReport {
            ssrc: self.ssrc,
            ntp_timestamp: NtpTimestamp::now(),
            rtp_timestamp: self.timestamp,
            packet_count: self.packets_sent as u32,
            octet_count: self.bytes_sent as u32,
            report_blocks: Vec::new(),
        }
    }
}

/// RTT estimate extracted from an RR's LSR/DLSR fields (RFC 3550 §6.4.1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RttEstimate {
    pub rtt: Duration,
}

/// Receive-side state for one remote SSRC: extended sequence reconstruction,
/// packet/byte/loss counters, and RFC 3550 interarrival jitter.
pub struct RtpReceiver {
    ssrc: Option<u32>,
    base_seq: u32,
    max_seq: u16,
    cycles: u32,
    received: u64,
    expected_prior: u64,
    received_prior: u64,
    bytes_received: u64,
    jitter: f64,
    last_transit: Option<i64>,
    last_arrival_clock: Option<(u32, Instant)>,
    clock_rate: u32,
}

impl RtpReceiver {
    pub fn new(clock_rate: u32) -> Self {
        Self {
            ssrc: None,
            base_seq: 0,
            max_seq: 0,
            cycles: 0,
            received: 0,
            expected_prior: 0,
            received_prior: 0,
            bytes_received: 0,
            jitter: 0.0,
            last_transit: None,
            last_arrival_clock: None,
            clock_rate,
        }
    }

    /// Parse and absorb one inbound RTP packet, returning it with its
    /// extended (unwrapped) sequence number.
    pub fn receive(&mut self, data: Bytes, arrival: Instant) -> Result<(RtpPacket, u64)> {
        let packet = RtpPacket::parse(data)?;
        let seq = packet.header.sequence_number;

        if self.ssrc.is_none() {
            self.ssrc = Some(packet.header.ssrc);
            self.base_seq = seq as u32;
            self.max_seq = seq;
        } else if self.ssrc != Some(packet.header.ssrc) {
            return Err(RtpError::MalformedHeader(format!(
                "unexpected SSRC {:#x}, session bound to {:#x}",
                packet.header.ssrc,
                self.ssrc.unwrap()
            )));
        } else {
            self.update_cycles(seq);
        }

        self.received += 1;
        self.bytes_received += packet.payload.len() as u64;
        self.update_jitter(packet.header.timestamp, arrival);

        let extended = (self.cycles as u64) << 16 | seq as u64;
        Ok((packet, extended))
    }

    fn update_cycles(&mut self, seq: u16) {
        // Half the sequence space: a jump this large in one step is a wrap,
        // not 32k packets of reordering.
        const WRAP_THRESHOLD: u16 = 1 << 15;
        if seq < self.max_seq && self.max_seq - seq > WRAP_THRESHOLD {
            self.cycles += 1;
        } else if seq > self.max_seq && seq - self.max_seq > WRAP_THRESHOLD {
            // A very late packet from before the last wrap; extended-seq
            // math still resolves it correctly against `self.cycles - 1`
            // territory, so nothing to adjust here beyond not advancing
            // `max_seq`.
            return;
        }
        if seq > self.max_seq || self.max_seq.wrapping_sub(seq) > WRAP_THRESHOLD {
            self.max_seq = seq;
        }
    }

    fn update_jitter(&mut self, rtp_timestamp: u32, arrival: Instant) {
        let arrival_units = match self.last_arrival_clock {
            None => {
                self.last_arrival_clock = Some((rtp_timestamp, arrival));
                return;
            }
            Some((_, last_instant)) => {
                let elapsed = arrival.duration_since(last_instant).as_secs_f64();
                (elapsed * self.clock_rate as f64) as i64
            }
        };
        let (last_rtp_ts, _) = self.last_arrival_clock.unwrap();
        let rtp_delta = rtp_timestamp.wrapping_sub(last_rtp_ts) as i32 as i64;
        let transit = arrival_units - rtp_delta;
        if let Some(last_transit) = self.last_transit {
            let d = (transit - last_transit).unsigned_abs() as f64;
            self.jitter += (d - self.jitter) / 16.0;
        }
        self.last_transit = Some(transit);
        self.last_arrival_clock = Some((rtp_timestamp, arrival));
    }

    /// Current RFC 3550 §A.8 jitter estimate, in timestamp units.
    pub fn jitter(&self) -> u32 {
        self.jitter.round() as u32
    }

    pub fn bytes_received(&self) -> u64 {
        self.bytes_received
    }

    /// Extended highest sequence number received.
    pub fn extended_max_seq(&self) -> u64 {
        (self.cycles as u64) << 16 | self.max_seq as u64
    }

    /// Packets lost vs. expected, per RFC 3550 §A.3.
    pub fn cumulative_lost(&self) -> i64 {
        let expected = self.extended_max_seq() as i64 - self.base_seq as i64 + 1;
        expected - self.received as i64
    }

    /// Build an RTCP report block for this source, given the remote SSRC
    /// this receiver is tracking on behalf of.
    pub fn build_report_block(&mut self, remote_ssrc: u32, last_sr: u32, last_sr_arrival: Option<Instant>, now: Instant) -> ReportBlock {
        let expected_interval = (self.extended_max_seq() as i64 + 1 - self.base_seq as i64)
            .saturating_sub(self.expected_prior as i64)
            .max(0) as u64;
        let received_interval = self.received.saturating_sub(self.received_prior);
        let lost_interval = expected_interval.saturating_sub(received_interval);
        let fraction_lost = if expected_interval == 0 {
            0
        } else {
            ((lost_interval * 256) / expected_interval).min(255) as u8
        };
        self.expected_prior = self.extended_max_seq() + 1 - self.base_seq as u64;
        self.received_prior = self.received;

        let delay_since_last_sr = last_sr_arrival
            .map(|t| (now.duration_since(t).as_secs_f64() * 65536.0) as u32)
            .unwrap_or(0);

        ReportBlock {
            ssrc: remote_ssrc,
            fraction_lost,
            cumulative_lost: self.cumulative_lost().max(0) as u32,
            highest_seq: self.extended_max_seq() as u32,
            jitter: self.jitter(),
            last_sr,
            delay_since_last_sr: if last_sr == 0 { 0 } else { delay_since_last_sr },
        }
    }
}

/// Compute RTT from an RR's `last_sr`/`delay_since_last_sr` against the NTP
/// time this side sent the corresponding SR (RFC 3550 §6.4.1).
pub fn rtt_from_report_block(block: &ReportBlock, sr_sent_compact_ntp: u32, now_compact_ntp: u32) -> Option<RttEstimate> {
    if block.last_sr == 0 || block.last_sr != sr_sent_compact_ntp {
        return None;
    }
    let round_trip_compact = now_compact_ntp.wrapping_sub(block.last_sr).wrapping_sub(block.delay_since_last_sr);
    Some(RttEstimate { rtt: Duration::from_secs_f64(round_trip_compact as f64 / 65536.0) })
}

/// Extract loss/jitter/RTT-relevant fields from an inbound RR addressed to
/// our own SSRC.
pub fn ingest_receiver_report(rr: &ReceiverReport, our_ssrc: u32) -> Option<&ReportBlock> {
    rr.report_blocks.iter().find(|b| b.ssrc == our_ssrc)
}

pub fn parse_rtcp(data: &[u8]) -> Result<Vec<RtcpPacket>> {
    RtcpPacket::parse(data)
}
