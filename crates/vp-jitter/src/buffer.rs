//! Adaptive jitter buffer + PLC scheduling (spec §4.7).

use std::collections::{BTreeMap, VecDeque};
use std::time::Instant;

use crate::config::JitterConfig;
use crate::state::BufferState;

/// What the playout clock should do for one frame period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopOutcome {
    /// A real frame, present by its deadline.
    Frame(Vec<u8>),
    /// Missing frame, within the concealment budget: ask the decoder's PLC.
    Conceal,
    /// Concealment budget exhausted: emit faded-out silence instead.
    Silence,
    /// Delay has grown past target + 40ms with frames to spare: drop one
    /// frame's worth of playout to catch up.
    Skip,
    /// Buffer has shrunk below target - 40ms: stretch the previous frame
    /// by the given expansion factor instead of underrunning.
    Stretch(f32),
}

struct ArrivalSample {
    at: Instant,
    deviation_ms: f32,
}

pub struct JitterBuffer {
    config: JitterConfig,
    state: BufferState,
    frames: BTreeMap<u64, Vec<u8>>,
    next_seq: Option<u64>,
    target_delay_ms: f32,
    last_arrival: Option<(u64, Instant)>,
    deviation_window: VecDeque<ArrivalSample>,
    consecutive_concealed: u32,
    late_packets: u64,
    recent_outcomes: VecDeque<(Instant, bool)>, // (at, was_loss)
}

impl JitterBuffer {
    pub fn new(config: JitterConfig) -> Self {
        let target_delay_ms = config.initial_delay_ms as f32;
        Self {
            config,
            state: BufferState::Empty,
            frames: BTreeMap::new(),
            next_seq: None,
            target_delay_ms,
            last_arrival: None,
            deviation_window: VecDeque::new(),
            consecutive_concealed: 0,
            late_packets: 0,
            recent_outcomes: VecDeque::new(),
        }
    }

    pub fn state(&self) -> BufferState {
        self.state
    }

    pub fn target_delay_ms(&self) -> f32 {
        self.target_delay_ms
    }

    pub fn late_packets(&self) -> u64 {
        self.late_packets
    }

    /// Insert one arriving frame, keyed by its extended sequence number.
    /// Returns `false` for a duplicate or a packet older than the current
    /// playout cursor — those are dropped and counted, never buffered.
    pub fn insert(&mut self, seq: u64, arrival: Instant, payload: Vec<u8>) -> bool {
        if let Some(next) = self.next_seq {
            if seq < next {
                self.late_packets += 1;
                return false;
            }
        }
        if self.frames.contains_key(&seq) {
            self.late_packets += 1;
            return false;
        }

        self.track_arrival_deviation(seq, arrival);
        self.frames.insert(seq, payload);

        if self.state == BufferState::Empty {
            self.next_seq = Some(seq);
            self.state = BufferState::Prebuffering;
        }
        true
    }

    fn track_arrival_deviation(&mut self, seq: u64, arrival: Instant) {
        if let Some((last_seq, last_at)) = self.last_arrival {
            let expected_ms = (seq.saturating_sub(last_seq)) as f32 * self.config.frame_duration_ms as f32;
            let actual_ms = arrival.duration_since(last_at).as_secs_f32() * 1000.0;
            let deviation_ms = (actual_ms - expected_ms).abs();
            self.deviation_window.push_back(ArrivalSample { at: arrival, deviation_ms });
            while let Some(front) = self.deviation_window.front() {
                if arrival.duration_since(front.at).as_millis() as u32 > self.config.adaptation_window_ms {
                    self.deviation_window.pop_front();
                } else {
                    break;
                }
            }
            let running_max = self.deviation_window.iter().map(|s| s.deviation_ms).fold(0.0f32, f32::max);
            self.target_delay_ms = running_max.clamp(self.config.min_delay_ms as f32, self.config.max_delay_ms as f32);
        }
        self.last_arrival = Some((seq, arrival));
    }

    fn buffered_ms(&self) -> f32 {
        self.frames.len() as f32 * self.config.frame_duration_ms as f32
    }

    fn record_outcome(&mut self, now: Instant, was_loss: bool) {
        self.recent_outcomes.push_back((now, was_loss));
        while let Some((at, _)) = self.recent_outcomes.front() {
            if now.duration_since(*at).as_millis() as u32 > self.config.drain_window_ms {
                self.recent_outcomes.pop_front();
            } else {
                break;
            }
        }
    }

    fn recent_loss_rate(&self) -> f32 {
        if self.recent_outcomes.is_empty() {
            return 0.0;
        }
        let lost = self.recent_outcomes.iter().filter(|(_, l)| *l).count();
        lost as f32 / self.recent_outcomes.len() as f32
    }

    /// Advance the playout clock by one frame period.
    pub fn pop(&mut self, now: Instant) -> PopOutcome {
        match self.state {
            BufferState::Empty => PopOutcome::Silence,
            BufferState::Draining => {
                self.frames.clear();
                self.next_seq = None;
                self.state = BufferState::Prebuffering;
                PopOutcome::Silence
            }
            BufferState::Prebuffering => {
                if self.buffered_ms() >= self.target_delay_ms {
                    self.state = BufferState::Playing;
                    self.pop(now)
                } else {
                    PopOutcome::Silence
                }
            }
            BufferState::Playing | BufferState::Concealing => self.pop_playing(now),
        }
    }

    fn pop_playing(&mut self, now: Instant) -> PopOutcome {
        let cursor = self.next_seq.unwrap_or(0);

        if self.buffered_ms() > self.target_delay_ms + 40.0 && self.frames.len() >= 2 {
            // Skip: drop the next frame outright to shed accumulated delay.
            self.frames.remove(&cursor);
            self.next_seq = Some(cursor + 1);
            self.record_outcome(now, false);
            return PopOutcome::Skip;
        }

        if let Some(payload) = self.frames.remove(&cursor) {
            self.next_seq = Some(cursor + 1);
            self.consecutive_concealed = 0;
            self.state = BufferState::Playing;
            self.record_outcome(now, false);
            return PopOutcome::Frame(payload);
        }

        if self.buffered_ms() < (self.target_delay_ms - 40.0).max(0.0) && !self.frames.is_empty() {
            let factor = (self.target_delay_ms / self.buffered_ms().max(1.0)).clamp(0.8, 1.25);
            self.record_outcome(now, false);
            return PopOutcome::Stretch(factor);
        }

        self.next_seq = Some(cursor + 1);
        self.record_outcome(now, true);

        if self.recent_loss_rate() > self.config.drain_loss_threshold {
            self.state = BufferState::Draining;
            return PopOutcome::Silence;
        }

        if self.consecutive_concealed < self.config.plc_max_consecutive {
            self.consecutive_concealed += 1;
            self.state = BufferState::Concealing;
            PopOutcome::Conceal
        } else {
            self.state = BufferState::Concealing;
            PopOutcome::Silence
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn buf() -> JitterBuffer {
        JitterBuffer::new(JitterConfig { initial_delay_ms: 40, ..Default::default() })
    }

    #[test]
    fn frames_play_out_in_sequence_order_despite_arrival_reordering() {
        let mut jb = buf();
        let now = Instant::now();
        jb.insert(0, now, vec![0]);
        jb.insert(2, now, vec![2]);
        jb.insert(1, now, vec![1]);

        // Force past prebuffering.
        for _ in 0..3 {
            jb.pop(now + Duration::from_millis(100));
        }
        let mut seen = Vec::new();
        for _ in 0..3 {
            if let PopOutcome::Frame(f) = jb.pop(now + Duration::from_millis(100)) {
                seen.push(f[0]);
            }
        }
        assert_eq!(seen, vec![0, 1, 2]);
    }

    #[test]
    fn duplicate_and_late_packets_are_dropped_and_counted() {
        let mut jb = buf();
        let now = Instant::now();
        jb.insert(5, now, vec![5]);
        assert!(!jb.insert(5, now, vec![5]));
        assert_eq!(jb.late_packets(), 1);
    }

    #[test]
    fn missing_frame_within_budget_produces_conceal_then_silence() {
        let config = JitterConfig { initial_delay_ms: 20, plc_max_consecutive: 2, ..Default::default() };
        let mut jb = JitterBuffer::new(config);
        let now = Instant::now();
        jb.insert(0, now, vec![0]);
        jb.pop(now + Duration::from_millis(20)); // clears prebuffering, emits frame 0

        let mut outcomes = Vec::new();
        for i in 0..4 {
            outcomes.push(jb.pop(now + Duration::from_millis(20 * (i + 2))));
        }
        assert_eq!(outcomes[0], PopOutcome::Conceal);
        assert_eq!(outcomes[1], PopOutcome::Conceal);
        assert_eq!(outcomes[2], PopOutcome::Silence);
    }
}
