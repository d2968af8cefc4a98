//! Energy-based voice activity detection
//!
//! A model-free detector over frame RMS energy: speech starts when energy
//! rises above the threshold, and the utterance ends after a configurable
//! number of quiet frames (hangover). Suitable as a default or fallback
//! when no model-backed detector is bound.

use parking_lot::Mutex;

use parlance_core::{AudioFrame, Result, VadEvent, VoiceActivity};

/// Energy-threshold voice activity detector
pub struct EnergyVad {
    threshold_db: f32,
    hangover_frames: u32,
    state: Mutex<DetectorState>,
}

#[derive(Debug, Default)]
struct DetectorState {
    speaking: bool,
    quiet_frames: u32,
}

impl EnergyVad {
    /// Create a detector with an energy threshold (dB) and hangover length
    /// (quiet frames tolerated before the utterance is considered finished)
    pub fn new(threshold_db: f32, hangover_frames: u32) -> Self {
        Self {
            threshold_db,
            hangover_frames: hangover_frames.max(1),
            state: Mutex::new(DetectorState::default()),
        }
    }
}

impl Default for EnergyVad {
    fn default() -> Self {
        // -40 dB threshold, 8 quiet frames (~160ms at 20ms frames)
        Self::new(-40.0, 8)
    }
}

impl VoiceActivity for EnergyVad {
    fn classify(&self, frame: &AudioFrame) -> Result<VadEvent> {
        let mut state = self.state.lock();

        if frame.energy_db > self.threshold_db {
            state.quiet_frames = 0;
            if state.speaking {
                Ok(VadEvent::Speech)
            } else {
                state.speaking = true;
                Ok(VadEvent::SpeechStart)
            }
        } else if state.speaking {
            state.quiet_frames += 1;
            if state.quiet_frames >= self.hangover_frames {
                state.speaking = false;
                state.quiet_frames = 0;
                Ok(VadEvent::UtteranceEnd)
            } else {
                Ok(VadEvent::Speech)
            }
        } else {
            Ok(VadEvent::Silence)
        }
    }

    fn reset(&self) {
        *self.state.lock() = DetectorState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parlance_core::{Channels, SampleRate};

    fn frame(level: f32) -> AudioFrame {
        AudioFrame::new(vec![level; 320], SampleRate::Hz16000, Channels::Mono, 0)
    }

    #[test]
    fn test_detects_utterance_boundary() {
        let vad = EnergyVad::new(-40.0, 2);

        assert_eq!(vad.classify(&frame(0.0)).unwrap(), VadEvent::Silence);
        assert_eq!(vad.classify(&frame(0.5)).unwrap(), VadEvent::SpeechStart);
        assert_eq!(vad.classify(&frame(0.5)).unwrap(), VadEvent::Speech);
        // One quiet frame is within the hangover
        assert_eq!(vad.classify(&frame(0.0)).unwrap(), VadEvent::Speech);
        assert_eq!(vad.classify(&frame(0.0)).unwrap(), VadEvent::UtteranceEnd);
        assert_eq!(vad.classify(&frame(0.0)).unwrap(), VadEvent::Silence);
    }

    #[test]
    fn test_hangover_survives_short_pause() {
        let vad = EnergyVad::new(-40.0, 3);

        vad.classify(&frame(0.5)).unwrap();
        vad.classify(&frame(0.0)).unwrap();
        vad.classify(&frame(0.0)).unwrap();
        // Speech resumes before the hangover expires
        assert_eq!(vad.classify(&frame(0.5)).unwrap(), VadEvent::Speech);
    }

    #[test]
    fn test_reset_clears_state() {
        let vad = EnergyVad::new(-40.0, 2);
        vad.classify(&frame(0.5)).unwrap();
        vad.reset();
        assert_eq!(vad.classify(&frame(0.5)).unwrap(), VadEvent::SpeechStart);
    }
}
