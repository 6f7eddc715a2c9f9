//! Recording session management for voice capture.
//!
//! Orchestrates audio capture with voice activity detection to record one
//! utterance: everything from the start of the session until the silence
//! window elapses, bounded by a maximum duration.

use crate::audio::recorder::AudioSource;
use crate::audio::vad::{Vad, VadConfig, VadEvent};
use crate::defaults;
use crate::error::Result;
use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// One finished capture.
#[derive(Debug, Clone, PartialEq)]
pub struct Capture {
    /// Accumulated 16-bit PCM samples, leading silence included.
    pub samples: Vec<i16>,
    /// Whether any chunk crossed the speech threshold.
    pub speech_detected: bool,
    /// Loudest RMS level observed during the capture.
    pub peak_level: f32,
}

/// Manages a single recording session with voice activity detection.
///
/// Records audio from an AudioSource until the VAD reports that the capture
/// is over: either speech ended, or the silence window elapsed with nothing
/// said at all.
pub struct RecordingSession<A: AudioSource> {
    audio_source: A,
    vad: Vad,
    max_duration: Duration,
    show_levels: bool,
    cancel: Arc<AtomicBool>,
}

impl<A: AudioSource> RecordingSession<A> {
    /// Create a new recording session.
    pub fn new(audio_source: A, vad_config: VadConfig) -> Self {
        Self {
            audio_source,
            vad: Vad::new(vad_config),
            max_duration: Duration::from_secs(defaults::MAX_UTTERANCE_SECS),
            show_levels: false,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Share a flag that ends the capture early when set (e.g. on Ctrl+C).
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    /// Cap the total capture duration.
    pub fn with_max_duration(mut self, max_duration: Duration) -> Self {
        self.max_duration = max_duration;
        self
    }

    /// Enable or disable level display during recording.
    pub fn with_level_display(mut self, show: bool) -> Self {
        self.show_levels = show;
        self
    }

    /// Record one capture.
    ///
    /// Starts audio capture, feeds chunks to the VAD, and accumulates every
    /// chunk (the original stretch of leading silence included) until the
    /// VAD stops the capture or the duration cap is hit.
    ///
    /// # Errors
    /// Returns errors if audio capture fails.
    pub fn record(&mut self) -> Result<Capture> {
        let mut accumulated = Vec::new();
        let mut speech_detected = false;
        let mut peak_level: f32 = 0.0;

        self.audio_source.start()?;
        let started = Instant::now();

        loop {
            if self.cancel.load(Ordering::Relaxed) || started.elapsed() >= self.max_duration {
                self.clear_level_line();
                break;
            }

            let samples = self.audio_source.read_samples()?;

            if samples.is_empty() {
                // No samples yet, sleep briefly and continue
                thread::sleep(Duration::from_millis(10));
                continue;
            }

            let result = self.vad.process_with_info(&samples);

            if result.level > peak_level {
                peak_level = result.level;
            }

            if self.show_levels {
                self.display_level(&result, speech_detected);
            }

            match result.event {
                VadEvent::SpeechStart => {
                    speech_detected = true;
                    accumulated.extend_from_slice(&samples);
                }
                VadEvent::Speech | VadEvent::Silence => {
                    // Silence is kept too: pauses mid-utterance belong to the
                    // recording, and so does the lead-in before speech.
                    accumulated.extend_from_slice(&samples);
                }
                VadEvent::SpeechEnd | VadEvent::IdleTimeout => {
                    self.clear_level_line();
                    break;
                }
            }
        }

        self.audio_source.stop()?;
        self.vad.reset();

        Ok(Capture {
            samples: accumulated,
            speech_detected,
            peak_level,
        })
    }

    fn clear_level_line(&self) {
        if self.show_levels {
            eprint!("\r{:60}\r", "");
            let _ = io::stderr().flush();
        }
    }

    /// Display audio level as a visual meter.
    fn display_level(&self, result: &crate::audio::vad::VadResult, speech_started: bool) {
        // Create a visual level bar (0-20 chars based on level)
        let bar_width = 20;
        let level_pct = (result.level / 0.1).min(1.0); // Scale: 0.1 RMS = full bar
        let filled = (level_pct * bar_width as f32) as usize;
        let threshold_pos = ((result.threshold / 0.1).min(1.0) * bar_width as f32) as usize;

        let mut bar = String::with_capacity(bar_width);
        for i in 0..bar_width {
            if i < filled {
                if i >= threshold_pos {
                    bar.push('█'); // Above threshold
                } else {
                    bar.push('▒'); // Below threshold
                }
            } else if i == threshold_pos {
                bar.push('│'); // Threshold marker
            } else {
                bar.push('░'); // Empty
            }
        }

        let status = if speech_started {
            if result.silence_ms > 0 {
                format!("silence {:.1}s", result.silence_ms as f32 / 1000.0)
            } else {
                "recording".to_string()
            }
        } else {
            "waiting".to_string()
        };

        eprint!("\r[{}] {:12} ", bar, status);
        let _ = io::stderr().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::recorder::MockAudioSource;

    fn make_silence(count: usize) -> Vec<i16> {
        vec![0i16; count]
    }

    fn make_speech(count: usize, amplitude: i16) -> Vec<i16> {
        vec![amplitude; count]
    }

    fn short_vad_config() -> VadConfig {
        VadConfig {
            speech_threshold: 0.045,
            silence_duration_ms: 50,
        }
    }

    #[test]
    fn test_recording_session_creation() {
        let audio_source = MockAudioSource::new();
        let _session = RecordingSession::new(audio_source, VadConfig::default());
    }

    #[test]
    fn test_record_captures_speech_then_silence() {
        // Two speech chunks, then endless silence; the 50ms silence window
        // elapses in real time while the mock repeats its last chunk.
        let audio_source = MockAudioSource::new().with_chunks(vec![
            make_speech(1600, 5000),
            make_speech(1600, 5000),
            make_silence(1600),
        ]);

        let mut session = RecordingSession::new(audio_source, short_vad_config());
        let capture = session.record().unwrap();

        assert!(capture.speech_detected);
        assert!(capture.samples.len() >= 3200, "speech chunks must be kept");
        assert!(capture.peak_level > 0.1);
    }

    #[test]
    fn test_record_times_out_on_pure_silence() {
        let audio_source = MockAudioSource::new().with_samples(make_silence(1600));

        let mut session = RecordingSession::new(audio_source, short_vad_config());
        let capture = session.record().unwrap();

        assert!(!capture.speech_detected);
        assert_eq!(capture.peak_level, 0.0);
    }

    #[test]
    fn test_record_keeps_leading_silence() {
        let audio_source = MockAudioSource::new().with_chunks(vec![
            make_silence(1600),
            make_speech(1600, 5000),
            make_silence(1600),
        ]);

        let mut session = RecordingSession::new(audio_source, short_vad_config());
        let capture = session.record().unwrap();

        assert!(capture.speech_detected);
        // Lead-in chunk + speech chunk at minimum
        assert!(capture.samples.len() >= 3200);
        assert_eq!(&capture.samples[..1600], &make_silence(1600)[..]);
    }

    #[test]
    fn test_record_respects_max_duration() {
        // Constant loud signal never triggers the silence window
        let audio_source = MockAudioSource::new().with_samples(make_speech(1600, 5000));

        let mut session = RecordingSession::new(audio_source, short_vad_config())
            .with_max_duration(Duration::from_millis(50));
        let capture = session.record().unwrap();

        assert!(capture.speech_detected);
        assert!(!capture.samples.is_empty());
    }

    #[test]
    fn test_record_stops_when_cancel_flag_is_set() {
        let cancel = Arc::new(AtomicBool::new(true));
        // Constant loud signal would otherwise record for the full hour
        let audio_source = MockAudioSource::new().with_samples(make_speech(1600, 5000));

        let mut session = RecordingSession::new(audio_source, short_vad_config())
            .with_cancel_flag(Arc::clone(&cancel));
        let capture = session.record().unwrap();

        assert!(capture.samples.is_empty());
        assert!(!capture.speech_detected);
    }

    #[test]
    fn test_record_handles_start_failure() {
        let audio_source = MockAudioSource::new().with_start_failure();

        let mut session = RecordingSession::new(audio_source, VadConfig::default());
        let result = session.record();

        assert!(result.is_err());
    }

    #[test]
    fn test_record_handles_read_failure() {
        let audio_source = MockAudioSource::new().with_read_failure();

        let mut session = RecordingSession::new(audio_source, VadConfig::default());
        let result = session.record();

        assert!(result.is_err());
    }
}
