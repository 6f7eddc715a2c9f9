//! Voice Activity Detection (VAD) module.
//!
//! Detects speech activity in audio streams using RMS-based thresholding
//! and state machine logic to handle silence intervals. The same silence
//! window that ends an utterance also ends an idle capture where nothing
//! was said at all.

use crate::defaults;
use std::time::Instant;

/// Trait for time operations, allowing mock time in tests.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> Instant;
}

/// Real system clock using `std::time::Instant::now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Configuration for Voice Activity Detection.
#[derive(Debug, Clone, Copy)]
pub struct VadConfig {
    /// RMS threshold for detecting speech (0.0 to 1.0).
    pub speech_threshold: f32,
    /// Duration of silence before the capture is considered over (milliseconds).
    pub silence_duration_ms: u32,
}

impl Default for VadConfig {
    fn default() -> Self {
        Self {
            speech_threshold: defaults::VAD_THRESHOLD,
            silence_duration_ms: defaults::SILENCE_DURATION_MS,
        }
    }
}

/// Current state of voice activity detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VadState {
    /// No speech detected yet.
    Idle,
    /// Speech is being detected.
    Speaking,
    /// Silence detected, waiting to confirm speech end.
    MaybeSilence,
    /// The capture is over (speech ended, or nothing was ever said).
    Stopped,
}

/// Events emitted by the VAD processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VadEvent {
    /// Speech has started.
    SpeechStart,
    /// Ongoing speech detected.
    Speech,
    /// Silence detected.
    Silence,
    /// Speech has ended.
    SpeechEnd,
    /// The silence window elapsed without any speech at all.
    IdleTimeout,
}

/// Detailed VAD processing result with level information.
#[derive(Debug, Clone, Copy)]
pub struct VadResult {
    /// The VAD event
    pub event: VadEvent,
    /// Current RMS level (0.0 to 1.0)
    pub level: f32,
    /// Speech detection threshold
    pub threshold: f32,
    /// Milliseconds of continuous silence observed so far
    pub silence_ms: u32,
    /// Silence duration needed to end the capture
    pub silence_duration_ms: u32,
}

/// Voice Activity Detector state machine.
pub struct Vad<C: Clock = SystemClock> {
    config: VadConfig,
    state: VadState,
    silence_start: Option<Instant>,
    clock: C,
}

impl<C: Clock> Vad<C> {
    /// Creates a new VAD instance with the given configuration and clock.
    pub fn with_clock(config: VadConfig, clock: C) -> Self {
        Self {
            config,
            state: VadState::Idle,
            silence_start: None,
            clock,
        }
    }

    /// Processes audio samples and returns the corresponding VAD event.
    pub fn process(&mut self, samples: &[i16]) -> VadEvent {
        self.process_with_info(samples).event
    }

    /// Processes audio samples and returns detailed VAD result with level info.
    pub fn process_with_info(&mut self, samples: &[i16]) -> VadResult {
        let rms = calculate_rms(samples);
        let is_speech = rms > self.config.speech_threshold;
        let now = self.clock.now();

        let (event, silence_ms) = match self.state {
            VadState::Idle => {
                if is_speech {
                    self.state = VadState::Speaking;
                    self.silence_start = None;
                    (VadEvent::SpeechStart, 0)
                } else {
                    let silence_elapsed = self.silence_elapsed_ms(now);
                    if silence_elapsed >= self.config.silence_duration_ms {
                        self.state = VadState::Stopped;
                        self.silence_start = None;
                        (VadEvent::IdleTimeout, silence_elapsed)
                    } else {
                        (VadEvent::Silence, silence_elapsed)
                    }
                }
            }
            VadState::Speaking => {
                if is_speech {
                    self.silence_start = None;
                    (VadEvent::Speech, 0)
                } else {
                    self.state = VadState::MaybeSilence;
                    self.silence_start = Some(now);
                    (VadEvent::Silence, 0)
                }
            }
            VadState::MaybeSilence => {
                if is_speech {
                    self.state = VadState::Speaking;
                    self.silence_start = None;
                    (VadEvent::Speech, 0)
                } else {
                    let silence_elapsed = self.silence_elapsed_ms(now);
                    if silence_elapsed >= self.config.silence_duration_ms {
                        self.state = VadState::Stopped;
                        self.silence_start = None;
                        (VadEvent::SpeechEnd, silence_elapsed)
                    } else {
                        (VadEvent::Silence, silence_elapsed)
                    }
                }
            }
            VadState::Stopped => (VadEvent::Silence, 0),
        };

        VadResult {
            event,
            level: rms,
            threshold: self.config.speech_threshold,
            silence_ms,
            silence_duration_ms: self.config.silence_duration_ms,
        }
    }

    /// Milliseconds since the current stretch of silence began, starting the
    /// timer on first use.
    fn silence_elapsed_ms(&mut self, now: Instant) -> u32 {
        match self.silence_start {
            Some(start) => now.duration_since(start).as_millis() as u32,
            None => {
                self.silence_start = Some(now);
                0
            }
        }
    }

    /// Returns the current VAD state.
    pub fn state(&self) -> VadState {
        self.state
    }

    /// Resets the VAD to idle state.
    pub fn reset(&mut self) {
        self.state = VadState::Idle;
        self.silence_start = None;
    }

    /// Updates the speech threshold without resetting state.
    pub fn set_threshold(&mut self, threshold: f32) {
        self.config.speech_threshold = threshold;
    }
}

impl Vad<SystemClock> {
    /// Creates a new VAD instance with the given configuration using the system clock.
    pub fn new(config: VadConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

/// Calculates the Root Mean Square (RMS) of audio samples.
///
/// # Returns
/// Normalized RMS value (0.0 to 1.0), where:
/// - 0.0 represents silence
/// - ~0.707 represents a full-scale sine wave
/// - 1.0 represents maximum amplitude
pub fn calculate_rms(samples: &[i16]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum_squares: f64 = samples
        .iter()
        .map(|&sample| {
            let normalized = sample as f64 / i16::MAX as f64;
            normalized * normalized
        })
        .sum();

    let mean_square = sum_squares / samples.len() as f64;
    mean_square.sqrt() as f32
}
