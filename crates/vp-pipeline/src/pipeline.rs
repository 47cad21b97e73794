//! The orchestrator itself: wires capture/playback rings, the send and
//! playout threads, SRTP, RTCP, and bandwidth estimation into one
//! full-duplex session (spec §4.9 "Pipeline orchestrator").
//!
//! Three `std::thread`s carry the hard-real-time audio path (processing,
//! playout, network receive); a fourth thread runs a single-threaded tokio
//! runtime for the RTCP timer, since it only ever needs to sleep and
//! occasionally send a few hundred bytes.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use bytes::Bytes;
use tracing::{debug, trace, warn};

use vp_buffer::{frame_ring, FrameRingReader, FrameRingWriter, OverflowPolicy};
use vp_bwe::{BandwidthEstimator, BweConfig, BweInputs};
use vp_codec::codecs::CodecFactory;
use vp_codec::types::{AudioCodec, CodecConfig, CodecType};
use vp_core::format::{AudioFormat, SampleRate as CoreSampleRate};
use vp_core::{PcmFrame, PipelineState};
use vp_dsp::{ReceiveChain, SendChain};
use vp_jitter::{JitterBuffer, JitterConfig, PopOutcome};
use vp_rtp::rtcp::{NtpTimestamp, RtcpPacket};
use vp_rtp::session::{ingest_receiver_report, parse_rtcp, rtt_from_report_block, RtpReceiver, RtpSender};
use vp_srtp::{SrtcpSession, SrtpProfile, SrtpSession};
use vp_stats::{CodecQualityParams, FrameStats, StatsCollector};
use vp_transport::UdpTransport;

use crate::callbacks::Callbacks;
use crate::config::{CodecTypeConfig, DenoiseEngine, PipelineConfig};
use crate::error::{PipelineError, Result};
use crate::far_end::FarEndDelayLine;

/// RFC 3550 default replay window; matches the size `vp-srtp`'s own tests
/// exercise.
const REPLAY_WINDOW_SIZE: u32 = 64;

/// RTP clock rate to declare in the session, independent of the codec's
/// internal sample rate (G.722's RFC 3551 §4.5.2 quirk: 16kHz codec, 8kHz
/// clock).
fn rtp_clock_rate(codec_type: CodecType, pipeline_sample_rate_hz: u32) -> u32 {
    match codec_type {
        CodecType::G711Pcmu | CodecType::G711Pcma => 8_000,
        CodecType::G722 => 8_000,
        CodecType::Opus => pipeline_sample_rate_hz,
    }
}

fn build_codec(codec_type: CodecType, config: &PipelineConfig) -> vp_codec::Result<Box<dyn AudioCodec>> {
    let codec_config = CodecConfig::new(codec_type)
        .with_sample_rate(vp_codec::types::SampleRate::from_hz(config.sample_rate_hz))
        .with_channels(config.channels)
        .with_bitrate(config.bitrate);
    CodecFactory::create(codec_config)
}

fn frame_dbfs_and_peak(samples: &[i16], sample_rate_hz: u32) -> (f32, f32) {
    let format = AudioFormat::mono_16bit(CoreSampleRate::from_hz(sample_rate_hz).unwrap_or_default());
    let frame = PcmFrame::new(samples.to_vec(), format, 0);
    (frame.rms_dbfs(), frame.peak())
}

/// Crude duplication-based time stretch used only for `PopOutcome::Stretch`:
/// re-reads `carry` at `1/factor` speed to fill `frame_size` samples. Not a
/// pitch-preserving stretch, just enough to avoid an audible gap.
fn stretch(carry: &[i16], factor: f32, frame_size: usize) -> Vec<i16> {
    if carry.is_empty() || factor <= 0.0 {
        return vec![0i16; frame_size];
    }
    (0..frame_size)
        .map(|i| {
            let src = ((i as f32 / factor) as usize).min(carry.len() - 1);
            carry[src]
        })
        .collect()
}

struct ReceiveState {
    receiver: RtpReceiver,
    srtp_rx: Option<SrtpSession>,
    srtcp_rx: Option<SrtcpSession>,
    jitter: JitterBuffer,
    remote_ssrc: Option<u32>,
    last_sr_ntp_compact: u32,
    last_sr_arrival: Option<Instant>,
}

/// Everything the four worker threads touch, independently locked so a
/// slow RTCP tick never blocks the audio path.
struct Shared {
    config: PipelineConfig,
    sender: Mutex<RtpSender>,
    srtp_tx: Mutex<Option<SrtpSession>>,
    srtcp_tx: Mutex<Option<SrtcpSession>>,
    receive: Mutex<ReceiveState>,
    stats: Mutex<StatsCollector>,
    bwe: Mutex<BandwidthEstimator>,
    far_end: Mutex<FarEndDelayLine>,
    transport: Option<UdpTransport>,
    callbacks: Callbacks,
    session_start: Instant,
    /// RTP clock rate in Hz (may differ from `config.sample_rate_hz`, e.g.
    /// G.722's 8kHz clock over a 16kHz codec), used to convert the RFC 3550
    /// jitter estimate to milliseconds.
    clock_rate: u32,
    last_sr_sent_compact: Mutex<u32>,
    pending_bitrate: Mutex<Option<u32>>,
    pending_codec_send: Mutex<Option<CodecType>>,
    pending_codec_recv: Mutex<Option<CodecType>>,
    denoise_engine: Mutex<DenoiseEngine>,
}

impl Shared {
    fn send_network(&self, data: &[u8]) {
        let Some(transport) = self.transport.as_ref() else { return };
        let Some(remote) = self.config.remote_addr else { return };
        if let Err(e) = transport.sendto(data, remote) {
            warn!(error = %e, "UDP send failed");
        }
    }

    /// Dispatch one inbound datagram: RTCP payload types occupy 200..=204,
    /// everything else is RTP (header bytes are plaintext under both SRTP
    /// and SRTCP, so the payload-type peek works before any unprotect).
    fn ingest_packet(&self, data: &[u8], arrival: Instant) {
        if data.len() < 2 {
            return;
        }
        let payload_type = data[1] & 0x7f;
        if (200..=204).contains(&payload_type) {
            self.ingest_rtcp(data);
        } else {
            self.ingest_rtp(data, arrival);
        }
    }

    fn ingest_rtp(&self, data: &[u8], arrival: Instant) {
        let mut recv = self.receive.lock().unwrap();

        let plain: Bytes = if self.config.enable_srtp {
            match recv.srtp_rx.as_mut() {
                Some(srtp) => match srtp.unprotect(data) {
                    Ok(packet) => packet.serialize().freeze(),
                    Err(e) => {
                        warn!(error = %e, "dropping unauthenticated SRTP packet");
                        self.stats.lock().unwrap().record_packet_lost();
                        return;
                    }
                },
                // SRTP mandatory: no plaintext fallback (Open Question
                // resolution, see DESIGN.md).
                None => {
                    warn!("SRTP enabled but no session configured; dropping inbound RTP");
                    return;
                }
            }
        } else {
            Bytes::copy_from_slice(data)
        };

        match recv.receiver.receive(plain, arrival) {
            Ok((packet, extended_seq)) => {
                recv.remote_ssrc = Some(packet.header.ssrc);
                recv.jitter.insert(extended_seq, arrival, packet.payload.to_vec());
                drop(recv);
                self.stats.lock().unwrap().record_packet_received(data.len());
            }
            Err(e) => warn!(error = %e, "dropping malformed RTP packet"),
        }
    }

    fn ingest_rtcp(&self, data: &[u8]) {
        let plain: Vec<u8> = if self.config.enable_srtp {
            let mut recv = self.receive.lock().unwrap();
            match recv.srtcp_rx.as_mut() {
                Some(srtcp) => match srtcp.unprotect(data) {
                    Ok(p) => p,
                    Err(e) => {
                        warn!(error = %e, "dropping unauthenticated SRTCP packet");
                        return;
                    }
                },
                None => {
                    warn!("SRTP enabled but no SRTCP session configured; dropping inbound RTCP");
                    return;
                }
            }
        } else {
            data.to_vec()
        };

        let packets = match parse_rtcp(&plain) {
            Ok(p) => p,
            Err(e) => {
                warn!(error = %e, "malformed RTCP compound packet");
                return;
            }
        };

        for packet in packets {
            match packet {
                RtcpPacket::SenderReport(sr) => {
                    let mut recv = self.receive.lock().unwrap();
                    recv.last_sr_ntp_compact = sr.ntp_timestamp.to_compact();
                    recv.last_sr_arrival = Some(Instant::now());
                }
                RtcpPacket::ReceiverReport(rr) => {
                    let our_ssrc = self.sender.lock().unwrap().ssrc();
                    if let Some(block) = ingest_receiver_report(&rr, our_ssrc) {
                        let sent_compact = *self.last_sr_sent_compact.lock().unwrap();
                        let now_compact = NtpTimestamp::now().to_compact();
                        if let Some(rtt) = rtt_from_report_block(block, sent_compact, now_compact) {
                            let jitter_ms = {
                                let recv = self.receive.lock().unwrap();
                                recv.receiver.jitter() as f32 * 1000.0 / self.clock_rate as f32
                            };
                            self.stats.lock().unwrap().update_network(jitter_ms, rtt.rtt.as_secs_f32() * 1000.0);
                        }
                    }
                }
                RtcpPacket::Bye(_) => debug!("received RTCP BYE"),
            }
        }
    }

    /// Build and send an RTCP SR (with an RR block for whatever we've
    /// received from the peer) if one is due, and feed accumulated
    /// send/receive counters into the bandwidth estimator.
    fn rtcp_tick(&self) {
        let now = Instant::now();
        let due = self.sender.lock().unwrap().sr_due(now, self.session_start);
        if !due {
            return;
        }

        let mut sender = self.sender.lock().unwrap();
        let mut sr = sender.build_sender_report(now);
        let packets_sent = sr.packet_count as u64;
        drop(sender);

        let (packets_lost, rtt_ms, jitter_ms) = {
            let mut recv = self.receive.lock().unwrap();
            if let Some(remote_ssrc) = recv.remote_ssrc {
                let last_sr = recv.last_sr_ntp_compact;
                let last_sr_arrival = recv.last_sr_arrival;
                let block = recv.receiver.build_report_block(remote_ssrc, last_sr, last_sr_arrival, now);
                let lost = block.cumulative_lost as u64;
                let jitter_ms = block.jitter as f32 * 1000.0 / self.clock_rate as f32;
                sr.report_blocks.push(block);
                (lost, self.stats.lock().unwrap().snapshot().rtt_ms, jitter_ms)
            } else {
                (0, 0.0, 0.0)
            }
        };

        *self.last_sr_sent_compact.lock().unwrap() = sr.ntp_timestamp.to_compact();

        let compound = RtcpPacket::SenderReport(sr).serialize();
        self.send_network(&compound);

        let inputs = BweInputs { packets_sent, packets_lost, rtt_ms, jitter_ms };
        let decision = self.bwe.lock().unwrap().update(inputs, now, vp_rtp::session::RTCP_SR_INTERVAL);
        trace!(?decision, "bwe tick");
        let new_bitrate = self.bwe.lock().unwrap().current_bitrate();
        *self.pending_bitrate.lock().unwrap() = Some(new_bitrate);
    }
}

/// The full-duplex voice pipeline (C1-C11 wired together).
pub struct Pipeline {
    config: PipelineConfig,
    state: Arc<Mutex<PipelineState>>,
    shared: Arc<Shared>,
    capture_writer: Arc<Mutex<FrameRingWriter>>,
    capture_reader: Arc<Mutex<FrameRingReader>>,
    playback_writer: Arc<Mutex<FrameRingWriter>>,
    playback_reader: Arc<Mutex<FrameRingReader>>,
    threads: Mutex<Vec<JoinHandle<()>>>,
    shutdown: Arc<AtomicBool>,
}

impl Pipeline {
    /// Build a pipeline from a validated config. Binds the transport socket
    /// eagerly (so `local_addr()` is available before `start()`); no
    /// threads are spawned until `start()`.
    pub fn create(config: PipelineConfig) -> Result<Self> {
        config.validate()?;

        let (capture_writer, capture_reader) = frame_ring(config.ring_capacity_samples, OverflowPolicy::Truncate)
            .map_err(vp_core::Error::from)?;
        let (playback_writer, playback_reader) = frame_ring(config.ring_capacity_samples, OverflowPolicy::Truncate)
            .map_err(vp_core::Error::from)?;

        let codec_type: CodecType = config.codec.into();
        let clock_rate = rtp_clock_rate(codec_type, config.sample_rate_hz);
        // RTP timestamps advance at `clock_rate`, not at the codec's own
        // sample rate (RFC 3551 §4.5.2: G.722 runs at 16kHz but declares an
        // 8kHz clock, so its per-frame timestamp step is half its sample count).
        let rtp_samples_per_frame = (clock_rate as u64 * config.frame_duration_ms as u64 / 1000) as u32;

        let sender = RtpSender::new(config.payload_type, rtp_samples_per_frame);
        let ssrc = config.ssrc.unwrap_or_else(|| sender.ssrc());
        let receiver = RtpReceiver::new(clock_rate);

        let (srtp_tx, srtp_rx, srtcp_tx, srtcp_rx) = if config.enable_srtp {
            let profile: SrtpProfile = config.srtp_profile.into();
            // vp-srtp is a single-SSRC session by design; a symmetric SSRC
            // across both directions keeps this within that scope (see
            // DESIGN.md).
            let tx = SrtpSession::new(profile, config.srtp_master_key.clone(), config.srtp_master_salt.clone(), ssrc, REPLAY_WINDOW_SIZE)
                .map_err(vp_core::Error::from)?;
            let rx = SrtpSession::new(profile, config.srtp_master_key.clone(), config.srtp_master_salt.clone(), ssrc, REPLAY_WINDOW_SIZE)
                .map_err(vp_core::Error::from)?;
            let srtcp_tx = SrtcpSession::new(profile, &config.srtp_master_key, &config.srtp_master_salt, ssrc, REPLAY_WINDOW_SIZE)
                .map_err(vp_core::Error::from)?;
            let srtcp_rx = SrtcpSession::new(profile, &config.srtp_master_key, &config.srtp_master_salt, ssrc, REPLAY_WINDOW_SIZE)
                .map_err(vp_core::Error::from)?;
            (Some(tx), Some(rx), Some(srtcp_tx), Some(srtcp_rx))
        } else {
            (None, None, None, None)
        };

        let quality_params = match codec_type {
            CodecType::G711Pcmu | CodecType::G711Pcma => CodecQualityParams::G711,
            CodecType::G722 => CodecQualityParams::G722,
            CodecType::Opus => CodecQualityParams::OPUS,
        };

        let bwe = BandwidthEstimator::new(BweConfig { initial_bitrate: config.bitrate, ..BweConfig::default() });
        let jitter = JitterBuffer::new(JitterConfig { frame_duration_ms: config.frame_duration_ms, ..JitterConfig::default() });

        let transport = match UdpTransport::bind(config.bind_addr) {
            Ok(t) => Some(t),
            Err(e) => {
                warn!(error = %e, "failed to bind transport; pipeline will run capture/playback only");
                None
            }
        };

        let shared = Arc::new(Shared {
            config: config.clone(),
            sender: Mutex::new(sender),
            srtp_tx: Mutex::new(srtp_tx),
            srtcp_tx: Mutex::new(srtcp_tx),
            receive: Mutex::new(ReceiveState {
                receiver,
                srtp_rx,
                srtcp_rx,
                jitter,
                remote_ssrc: None,
                last_sr_ntp_compact: 0,
                last_sr_arrival: None,
            }),
            stats: Mutex::new(StatsCollector::new(quality_params)),
            bwe: Mutex::new(bwe),
            far_end: Mutex::new(FarEndDelayLine::new(0, config.sample_rate_hz)),
            transport,
            callbacks: Callbacks::default(),
            session_start: Instant::now(),
            clock_rate,
            last_sr_sent_compact: Mutex::new(0),
            pending_bitrate: Mutex::new(None),
            pending_codec_send: Mutex::new(None),
            pending_codec_recv: Mutex::new(None),
            denoise_engine: Mutex::new(config.denoise_engine),
        });

        Ok(Self {
            config,
            state: Arc::new(Mutex::new(PipelineState::Stopped)),
            shared,
            capture_writer: Arc::new(Mutex::new(capture_writer)),
            capture_reader: Arc::new(Mutex::new(capture_reader)),
            playback_writer: Arc::new(Mutex::new(playback_writer)),
            playback_reader: Arc::new(Mutex::new(playback_reader)),
            threads: Mutex::new(Vec::new()),
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn state(&self) -> PipelineState {
        *self.state.lock().unwrap()
    }

    pub fn on_encoded_data<F>(&self, f: F)
    where
        F: FnMut(&[u8], u32) + Send + 'static,
    {
        self.shared.callbacks.set_encoded_data(f);
    }

    pub fn on_state_change<F>(&self, f: F)
    where
        F: FnMut(PipelineState, PipelineState) + Send + 'static,
    {
        self.shared.callbacks.set_state_change(f);
    }

    pub fn on_error<F>(&self, f: F)
    where
        F: FnMut(&vp_core::Error) + Send + 'static,
    {
        self.shared.callbacks.set_error(f);
    }

    fn transition(&self, to: PipelineState) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if !state.can_transition_to(to) {
            return Err(PipelineError::IllegalTransition { from: *state, to });
        }
        let from = *state;
        *state = to;
        drop(state);
        self.shared.callbacks.fire_state_change(from, to);
        Ok(())
    }

    /// Start capture/playout/network/RTCP threads. `reported_output_latency_ms`
    /// is the host's measured output-device latency, used to calibrate the
    /// AEC far-end delay line (Open Question resolution; see DESIGN.md and
    /// `far_end.rs`).
    pub fn start(&self, reported_output_latency_ms: u32) -> Result<()> {
        self.transition(PipelineState::Starting)?;
        self.shutdown.store(false, Ordering::Relaxed);
        *self.shared.far_end.lock().unwrap() = FarEndDelayLine::new(reported_output_latency_ms, self.config.sample_rate_hz);

        let codec_type: CodecType = self.config.codec.into();
        let encoder = build_codec(codec_type, &self.config).map_err(vp_core::Error::from)?;
        let decoder = build_codec(codec_type, &self.config).map_err(vp_core::Error::from)?;

        let mut threads = self.threads.lock().unwrap();

        threads.push(self.spawn_processing_thread(encoder));
        threads.push(self.spawn_playout_thread(decoder));

        if self.shared.transport.is_some() {
            threads.push(self.spawn_network_rx_thread());
        }
        threads.push(self.spawn_rtcp_thread());

        Ok(())
    }

    /// Stop and join all worker threads, bounded by a short drain window
    /// before the state machine forces `Stopped` regardless (spec §4.9).
    pub fn stop(&self) -> Result<()> {
        self.transition(PipelineState::Stopping)?;
        self.shutdown.store(true, Ordering::Relaxed);

        let handles: Vec<JoinHandle<()>> = self.threads.lock().unwrap().drain(..).collect();
        let deadline = Instant::now() + Duration::from_millis(100);
        for handle in handles {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                // Thread still running past the drain window: detach it,
                // it will exit on its own next time it checks `shutdown`.
                drop(handle);
                continue;
            }
            let _ = handle.join();
        }

        self.transition(PipelineState::Stopped)
    }

    /// Host pushes a captured audio frame (device rate assumed equal to
    /// the pipeline's configured `sample_rate_hz`; resampling at the edge
    /// is the host's responsibility if not).
    pub fn push_capture_frame(&self, samples: &[i16]) -> usize {
        self.capture_writer.lock().unwrap().write(samples)
    }

    /// Host pulls a rendered playback frame; returns the number of samples
    /// actually written (may be less than `out.len()` on underflow, which
    /// the host should treat as silence for the remainder).
    pub fn pull_playback_frame(&self, out: &mut [i16]) -> usize {
        self.playback_reader.lock().unwrap().read(out)
    }

    /// Feed one inbound network datagram (RTP or RTCP, SRTP-protected or
    /// not per config) when the host owns the socket instead of letting
    /// the pipeline's own network-RX thread do it (e.g. on `wasm32`).
    pub fn send_receive_packet(&self, data: &[u8]) {
        self.shared.ingest_packet(data, Instant::now());
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.shared.transport.as_ref().and_then(|t| t.local_addr().ok())
    }

    pub fn get_stats(&self) -> vp_stats::AggregateStats {
        self.shared.stats.lock().unwrap().snapshot()
    }

    /// Apply a new target bitrate at the next frame boundary.
    pub fn set_bitrate(&self, bps: u32) {
        *self.shared.pending_bitrate.lock().unwrap() = Some(bps);
    }

    /// Swap codecs at the next frame boundary on both the send and
    /// receive threads.
    pub fn set_codec(&self, codec: CodecTypeConfig) {
        let codec_type: CodecType = codec.into();
        *self.shared.pending_codec_send.lock().unwrap() = Some(codec_type);
        *self.shared.pending_codec_recv.lock().unwrap() = Some(codec_type);
    }

    /// `vp-dsp`'s denoiser has one noise-gate implementation regardless of
    /// this setting (see `config.rs`'s doc comment); recorded for host
    /// round-tripping, with no behavioral effect.
    pub fn set_denoise_engine(&self, engine: DenoiseEngine) {
        *self.shared.denoise_engine.lock().unwrap() = engine;
    }

    pub fn denoise_engine(&self) -> DenoiseEngine {
        *self.shared.denoise_engine.lock().unwrap()
    }

    fn spawn_processing_thread(&self, mut encoder: Box<dyn AudioCodec>) -> JoinHandle<()> {
        let shared = self.shared.clone();
        let state = self.state.clone();
        let shutdown = self.shutdown.clone();
        let capture_reader = self.capture_reader.clone();
        let config = self.config.clone();
        let mut send_chain = SendChain::new(config.dsp_chain_config());
        let frame_size = config.frame_size();
        let frame_duration = Duration::from_millis(config.frame_duration_ms as u64);

        thread::Builder::new()
            .name("vp-pipeline-send".into())
            .spawn(move || {
                let mut became_running = false;
                let mut raw = vec![0i16; frame_size];

                while !shutdown.load(Ordering::Relaxed) {
                    let tick_start = Instant::now();

                    if let Some(bps) = shared.pending_bitrate.lock().unwrap().take() {
                        if let Err(e) = encoder.set_bitrate(bps) {
                            debug!(error = %e, "codec does not support runtime bitrate change");
                        }
                    }
                    if let Some(codec_type) = shared.pending_codec_send.lock().unwrap().take() {
                        match build_codec(codec_type, &config) {
                            Ok(new_encoder) => encoder = new_encoder,
                            Err(e) => warn!(error = %e, "failed to switch encoder codec"),
                        }
                    }

                    let n = capture_reader.lock().unwrap().read(&mut raw);
                    if n < raw.len() {
                        raw[n..].fill(0);
                    }
                    let mut frame = raw.clone();

                    if let Some(far) = shared.far_end.lock().unwrap().pop_aligned(frame_size) {
                        send_chain.push_far_end(&far);
                    }

                    match send_chain.process(&mut frame) {
                        Ok(report) => {
                            match encoder.encode(&frame) {
                                Ok(encoded) => {
                                    let packet = shared.sender.lock().unwrap().send(Bytes::from(encoded.clone()), false);
                                    shared.callbacks.fire_encoded_data(&packet.payload, packet.header.timestamp);

                                    let wire: Option<Vec<u8>> = if config.enable_srtp {
                                        match shared.srtp_tx.lock().unwrap().as_mut() {
                                            Some(srtp) => match srtp.protect(&packet) {
                                                Ok(bytes) => Some(bytes),
                                                Err(e) => {
                                                    warn!(error = %e, "SRTP protect failed; dropping frame");
                                                    None
                                                }
                                            },
                                            None => {
                                                warn!("SRTP enabled but no session configured; dropping frame");
                                                None
                                            }
                                        }
                                    } else {
                                        Some(packet.serialize().to_vec())
                                    };

                                    if let Some(wire) = wire {
                                        shared.send_network(&wire);
                                        let mut stats = shared.stats.lock().unwrap();
                                        stats.record_packet_sent(wire.len());
                                        let (input_rms, input_peak) = frame_dbfs_and_peak(&raw, config.sample_rate_hz);
                                        let (output_rms, output_peak) = frame_dbfs_and_peak(&frame, config.sample_rate_hz);
                                        stats.record_frame(&FrameStats {
                                            input_rms_dbfs: input_rms,
                                            input_peak,
                                            output_rms_dbfs: output_rms,
                                            output_peak,
                                            vad: report.vad,
                                            aec_status: report.aec,
                                            codec_size_bytes: encoded.len(),
                                            rtp_seq: packet.header.sequence_number,
                                            rtp_timestamp: packet.header.timestamp,
                                            srtp_auth_ok: true,
                                        });
                                    }
                                }
                                Err(e) => {
                                    warn!(error = %e, "encode failed; dropping frame");
                                    shared.stats.lock().unwrap().record_packet_lost();
                                }
                            }
                        }
                        Err(_fatal) => {
                            shutdown.store(true, Ordering::Relaxed);
                            let mut s = state.lock().unwrap();
                            let from = *s;
                            *s = PipelineState::Faulted;
                            drop(s);
                            shared.callbacks.fire_state_change(from, PipelineState::Faulted);
                            shared.callbacks.fire_error(&vp_core::Error::DeviceStartFailed("DSP send chain failed fatally".into()));
                            break;
                        }
                    }

                    if !became_running {
                        became_running = true;
                        let mut s = state.lock().unwrap();
                        if s.can_transition_to(PipelineState::Running) {
                            let from = *s;
                            *s = PipelineState::Running;
                            drop(s);
                            shared.callbacks.fire_state_change(from, PipelineState::Running);
                        }
                    }

                    let elapsed = tick_start.elapsed();
                    if elapsed < frame_duration {
                        thread::sleep(frame_duration - elapsed);
                    }
                }
            })
            .expect("spawn vp-pipeline-send thread")
    }

    fn spawn_playout_thread(&self, mut decoder: Box<dyn AudioCodec>) -> JoinHandle<()> {
        let shared = self.shared.clone();
        let shutdown = self.shutdown.clone();
        let playback_writer = self.playback_writer.clone();
        let config = self.config.clone();
        let mut receive_chain = ReceiveChain::new(config.receive_chain_config());
        let frame_size = config.frame_size();
        let frame_duration = Duration::from_millis(config.frame_duration_ms as u64);

        thread::Builder::new()
            .name("vp-pipeline-playout".into())
            .spawn(move || {
                let mut carry: Vec<i16> = vec![0i16; frame_size];

                while !shutdown.load(Ordering::Relaxed) {
                    let tick_start = Instant::now();

                    if let Some(codec_type) = shared.pending_codec_recv.lock().unwrap().take() {
                        match build_codec(codec_type, &config) {
                            Ok(new_decoder) => decoder = new_decoder,
                            Err(e) => warn!(error = %e, "failed to switch decoder codec"),
                        }
                    }

                    let now = Instant::now();
                    let mut outcome = shared.receive.lock().unwrap().jitter.pop(now);
                    // A small bounded catch-up: skip outcomes just mean
                    // "nothing to render this tick", try the next real one.
                    let mut skips = 0;
                    while matches!(outcome, PopOutcome::Skip) && skips < 4 {
                        outcome = shared.receive.lock().unwrap().jitter.pop(now);
                        skips += 1;
                    }

                    let rendered = match outcome {
                        PopOutcome::Frame(bytes) => match decoder.decode(&bytes) {
                            Ok(samples) => samples,
                            Err(e) => {
                                warn!(error = %e, "decode failed; concealing");
                                decoder.plc(frame_size).unwrap_or_else(|_| vec![0i16; frame_size])
                            }
                        },
                        PopOutcome::Conceal => decoder.plc(frame_size).unwrap_or_else(|_| vec![0i16; frame_size]),
                        PopOutcome::Silence => {
                            let mut s = vec![0i16; frame_size];
                            receive_chain.comfort_noise(&mut s);
                            s
                        }
                        PopOutcome::Skip => Vec::new(),
                        PopOutcome::Stretch(factor) => stretch(&carry, factor, frame_size),
                    };

                    if !rendered.is_empty() {
                        let mut samples = rendered;
                        receive_chain.process(&mut samples);
                        carry = samples.clone();
                        shared.far_end.lock().unwrap().push_rendered(&samples);
                        playback_writer.lock().unwrap().write(&samples);
                    }

                    let elapsed = tick_start.elapsed();
                    if elapsed < frame_duration {
                        thread::sleep(frame_duration - elapsed);
                    }
                }
            })
            .expect("spawn vp-pipeline-playout thread")
    }

    fn spawn_network_rx_thread(&self) -> JoinHandle<()> {
        let shared = self.shared.clone();
        let shutdown = self.shutdown.clone();

        thread::Builder::new()
            .name("vp-pipeline-netrx".into())
            .spawn(move || {
                let Some(transport) = shared.transport.as_ref() else { return };
                let mut buf = vec![0u8; 2048];
                while !shutdown.load(Ordering::Relaxed) {
                    match transport.poll(Duration::from_millis(50)) {
                        Ok(true) => match transport.recvfrom(&mut buf) {
                            Ok((n, _from)) => shared.ingest_packet(&buf[..n], Instant::now()),
                            Err(e) => warn!(error = %e, "recvfrom failed"),
                        },
                        Ok(false) => {}
                        Err(e) => warn!(error = %e, "transport poll failed"),
                    }
                }
            })
            .expect("spawn vp-pipeline-netrx thread")
    }

    fn spawn_rtcp_thread(&self) -> JoinHandle<()> {
        let shared = self.shared.clone();
        let shutdown = self.shutdown.clone();

        thread::Builder::new()
            .name("vp-pipeline-rtcp".into())
            .spawn(move || {
                let rt = tokio::runtime::Builder::new_current_thread()
                    .enable_time()
                    .build()
                    .expect("build tokio runtime for RTCP timer");
                rt.block_on(async move {
                    let mut interval = tokio::time::interval(Duration::from_millis(200));
                    loop {
                        interval.tick().await;
                        if shutdown.load(Ordering::Relaxed) {
                            break;
                        }
                        shared.rtcp_tick();
                    }
                });
            })
            .expect("spawn vp-pipeline-rtcp thread")
    }
}
