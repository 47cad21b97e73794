//! # vp-resample: sample-rate conversion (spec §4.2, C2)
//!
//! A pure frame-in/frame-out operator, grounded on `rvoip-audio-core`'s
//! `FormatConverter` (manual linear interpolation with a carried fractional
//! position — that crate never actually reaches for `rubato`/`samplerate`
//! in its conversion path despite depending on them, so neither do we).
//!
//! Quality 0..10 controls the order of a symmetric FIR low-pass applied
//! before decimation (anti-aliasing) — 0 disables it (plain linear
//! interpolation, cheapest), 10 uses the widest kernel this crate ships.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResampleError {
    #[error("invalid parameter: {0}")]
    InvalidParam(String),
}

pub type Result<T> = std::result::Result<T, ResampleError>;

impl From<ResampleError> for vp_core::Error {
    fn from(e: ResampleError) -> Self {
        match e {
            ResampleError::InvalidParam(msg) => vp_core::Error::InvalidParameter(msg),
        }
    }
}

/// Output frame count for a given input frame count and rate ratio,
/// rounding up (spec §4.2, tested against boundary #14: 8kHz -> 48kHz is
/// exactly 6x within ±1 sample).
pub fn output_frame_count(input_frames: usize, in_rate: u32, out_rate: u32) -> usize {
    ((input_frames as u64 * out_rate as u64) + in_rate as u64 - 1) as usize / in_rate as usize
}

/// Stateful, frame-in/frame-out sample rate converter.
pub struct Resampler {
    in_rate: u32,
    out_rate: u32,
    channels: u8,
    quality: u8,
    /// Per-channel history: last two input samples, for interpolation
    /// continuity across `process()` calls.
    history: Vec<[f32; 2]>,
    /// Fractional read position into the (virtual) concatenation of
    /// history + current input, per channel.
    frac_pos: Vec<f64>,
    /// Anti-aliasing FIR taps, derived from `quality`. Empty when
    /// quality == 0.
    fir_taps: Vec<f32>,
}

impl Resampler {
    /// Create a resampler. Fails with `InvalidParam` for zero rates,
    /// zero channels, or a quality outside 0..=10 (spec §4.2).
    pub fn create(in_rate: u32, out_rate: u32, channels: u8, quality: u8) -> Result<Self> {
        if in_rate == 0 || out_rate == 0 {
            return Err(ResampleError::InvalidParam("sample rates must be > 0".into()));
        }
        if channels == 0 {
            return Err(ResampleError::InvalidParam("channels must be > 0".into()));
        }
        if quality > 10 {
            return Err(ResampleError::InvalidParam("quality must be 0..=10".into()));
        }

        Ok(Self {
            in_rate,
            out_rate,
            channels,
            quality,
            history: vec![[0.0; 2]; channels as usize],
            frac_pos: vec![0.0; channels as usize],
            fir_taps: Self::build_fir_taps(quality),
        })
    }

    /// Windowed-sinc-ish FIR: wider kernel at higher quality. Kept small
    /// and simple — this is an anti-alias smoother, not a reference-grade
    /// filter design.
    fn build_fir_taps(quality: u8) -> Vec<f32> {
        if quality == 0 {
            return Vec::new();
        }
        let half_width = quality as i32; // 1..=10
        let mut taps = Vec::with_capacity((2 * half_width + 1) as usize);
        let mut sum = 0.0f32;
        for i in -half_width..=half_width {
            let x = i as f32 / (half_width as f32 + 1.0);
            // Hann-windowed sinc.
            let sinc = if i == 0 { 1.0 } else { (std::f32::consts::PI * x).sin() / (std::f32::consts::PI * x) };
            let window = 0.5 + 0.5 * (std::f32::consts::PI * x).cos();
            let tap = sinc * window;
            taps.push(tap);
            sum += tap;
        }
        if sum.abs() > 1e-6 {
            for t in &mut taps {
                *t /= sum;
            }
        }
        taps
    }

    pub fn in_rate(&self) -> u32 {
        self.in_rate
    }

    pub fn out_rate(&self) -> u32 {
        self.out_rate
    }

    /// Process one block of interleaved input samples, writing converted
    /// samples into `out`. Returns the number of output samples (per
    /// channel frames * channels) written. `out` must have capacity for
    /// at least `output_frame_count(in.len()/channels, in_rate, out_rate)
    /// * channels` samples.
    pub fn process(&mut self, input: &[i16], out: &mut Vec<i16>) -> Result<usize> {
        if input.len() % self.channels as usize != 0 {
            return Err(ResampleError::InvalidParam("input length not a multiple of channel count".into()));
        }
        out.clear();
        let in_frames = input.len() / self.channels as usize;
        if in_frames == 0 {
            return Ok(0);
        }
        let out_frames = output_frame_count(in_frames, self.in_rate, self.out_rate);
        let ratio = self.in_rate as f64 / self.out_rate as f64;

        for ch in 0..self.channels as usize {
            let mut pos = self.frac_pos[ch];
            let prev = self.history[ch];
            for _ in 0..out_frames {
                let idx = pos.floor() as i64;
                let frac = (pos - pos.floor()) as f32;

                let s0 = Self::sample_at(idx - 1, &prev, input, ch, self.channels as usize);
                let s1 = Self::sample_at(idx, &prev, input, ch, self.channels as usize);
                let interpolated = s0 + (s1 - s0) * frac;

                let filtered = if self.fir_taps.is_empty() {
                    interpolated
                } else {
                    self.apply_fir(idx, frac, &prev, input, ch)
                };

                out.push(filtered.round().clamp(i16::MIN as f32, i16::MAX as f32) as i16);
                pos += ratio;
            }
            // Carry the last two real input samples forward as history.
            if in_frames >= 2 {
                self.history[ch] = [
                    input[(in_frames - 2) * self.channels as usize + ch] as f32,
                    input[(in_frames - 1) * self.channels as usize + ch] as f32,
                ];
            } else if in_frames == 1 {
                self.history[ch] = [prev[1], input[ch] as f32];
            }
            self.frac_pos[ch] = (pos - in_frames as f64).max(0.0);
        }

        // Interleave per-channel results back together: the loop above
        // pushed one channel fully before the next, so re-interleave.
        if self.channels > 1 {
            let mut interleaved = vec![0i16; out.len()];
            let per_channel = out_frames;
            for ch in 0..self.channels as usize {
                for f in 0..per_channel {
                    interleaved[f * self.channels as usize + ch] = out[ch * per_channel + f];
                }
            }
            *out = interleaved;
        }

        Ok(out.len())
    }

    fn sample_at(idx: i64, history: &[f32; 2], input: &[i16], ch: usize, channels: usize) -> f32 {
        if idx < 0 {
            let h = idx + 2; // -2 -> history[0], -1 -> history[1]
            if h >= 0 && (h as usize) < 2 {
                history[h as usize]
            } else {
                history[0]
            }
        } else {
            let frame = idx as usize;
            let sample_idx = frame * channels + ch;
            input.get(sample_idx).copied().unwrap_or(0) as f32
        }
    }

    fn apply_fir(&self, idx: i64, frac: f32, history: &[f32; 2], input: &[i16], ch: usize) -> f32 {
        let half = (self.fir_taps.len() / 2) as i64;
        let mut acc = 0.0f32;
        for (k, &tap) in self.fir_taps.iter().enumerate() {
            let offset = k as i64 - half;
            let s = Self::sample_at(idx + offset, history, input, ch, self.channels as usize);
            acc += s * tap;
        }
        // Blend the filtered center sample with its linear-interpolated
        // neighbor so `frac` still contributes sub-sample precision.
        let next = {
            let mut acc2 = 0.0f32;
            for (k, &tap) in self.fir_taps.iter().enumerate() {
                let offset = k as i64 - half + 1;
                let s = Self::sample_at(idx + offset, history, input, ch, self.channels as usize);
                acc2 += s * tap;
            }
            acc2
        };
        acc + (next - acc) * frac
    }

    /// Clear interpolation history (spec §4.2 "Reset clears history").
    pub fn reset(&mut self) {
        for h in &mut self.history {
            *h = [0.0; 2];
        }
        for p in &mut self.frac_pos {
            *p = 0.0;
        }
    }
}
