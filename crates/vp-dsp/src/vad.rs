//! Energy-based voice activity detection. Informational only: VAD decisions
//! feed statistics (`speech_ratio`) and never gate or mutate the pipeline.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VadConfig {
    /// Frame RMS (linear, 0.0-1.0) above which a frame is speech.
    pub energy_threshold: f32,
    /// Consecutive above-threshold frames required before declaring speech,
    /// so a single energy spike doesn't flip the decision.
    pub onset_frames: u32,
    /// Consecutive below-threshold frames required before declaring silence.
    pub hangover_frames: u32,
}

impl Default for VadConfig {
    fn default() -> Self {
        Self { energy_threshold: 0.01, onset_frames: 2, hangover_frames: 5 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VadDecision {
    Speech,
    Silence,
}

pub struct VoiceActivityDetector {
    config: VadConfig,
    decision: VadDecision,
    above_run: u32,
    below_run: u32,
}

impl VoiceActivityDetector {
    pub fn new(config: VadConfig) -> Self {
        Self { config, decision: VadDecision::Silence, above_run: 0, below_run: 0 }
    }

    pub fn process(&mut self, samples: &[i16]) -> VadDecision {
        if samples.is_empty() {
            return self.decision;
        }

        let rms = Self::rms(samples);

        if rms >= self.config.energy_threshold {
            self.above_run += 1;
            self.below_run = 0;
        } else {
            self.below_run += 1;
            self.above_run = 0;
        }

        match self.decision {
            VadDecision::Silence if self.above_run >= self.config.onset_frames => {
                self.decision = VadDecision::Speech;
            }
            VadDecision::Speech if self.below_run >= self.config.hangover_frames => {
                self.decision = VadDecision::Silence;
            }
            _ => {}
        }

        self.decision
    }

    fn rms(samples: &[i16]) -> f32 {
        let sum_sq: f64 = samples.iter().map(|&s| (s as f64 / 32768.0).powi(2)).sum();
        ((sum_sq / samples.len() as f64).sqrt()) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silence_stays_silence() {
        let mut vad = VoiceActivityDetector::new(VadConfig::default());
        for _ in 0..10 {
            assert_eq!(vad.process(&vec![0i16; 160]), VadDecision::Silence);
        }
    }

    #[test]
    fn sustained_loud_signal_becomes_speech() {
        let mut vad = VoiceActivityDetector::new(VadConfig::default());
        let loud = vec![5000i16; 160];
        let mut last = VadDecision::Silence;
        for _ in 0..5 {
            last = vad.process(&loud);
        }
        assert_eq!(last, VadDecision::Speech);
    }

    #[test]
    fn single_spike_does_not_flip_to_speech() {
        let mut vad = VoiceActivityDetector::new(VadConfig::default());
        assert_eq!(vad.process(&vec![5000i16; 160]), VadDecision::Silence);
    }

    #[test]
    fn hangover_delays_return_to_silence() {
        let mut vad = VoiceActivityDetector::new(VadConfig::default());
        let loud = vec![5000i16; 160];
        let quiet = vec![0i16; 160];
        for _ in 0..5 {
            vad.process(&loud);
        }
        assert_eq!(vad.process(&quiet), VadDecision::Speech);
    }
}
