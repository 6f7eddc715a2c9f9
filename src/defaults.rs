//! Default configuration constants for voxlate.
//!
//! This module provides shared constants used across different configuration types
//! to ensure consistency and eliminate duplication.

/// Default audio sample rate in Hz.
///
/// 16kHz is the standard for speech recognition and is what the cloud
/// transcription endpoints expect for voice uploads.
pub const SAMPLE_RATE: u32 = 16000;

/// Default Voice Activity Detection (VAD) threshold.
///
/// This RMS-based threshold (0.0 to 1.0) determines when audio is considered
/// speech. A value of 0.045 is tuned for typical microphone input levels with
/// some ambient room noise.
pub const VAD_THRESHOLD: f32 = 0.045;

/// Default silence duration in milliseconds before a capture is considered done.
///
/// 2000ms (2 seconds) allows for natural pauses in speech without prematurely
/// cutting off the utterance. The same window applies before any speech is
/// detected: two silent seconds with nothing said end the capture empty-handed.
pub const SILENCE_DURATION_MS: u32 = 2000;

/// Upper bound on a single capture, in seconds.
///
/// The recording loop gives up after this long even if the silence window
/// never elapses (e.g. constant background noise above the threshold).
pub const MAX_UTTERANCE_SECS: u64 = 3600;

/// Default language expected on the microphone.
pub const SOURCE_LANGUAGE: &str = "ru";

/// Default language spoken back.
pub const TARGET_LANGUAGE: &str = "en";

/// Language value that lets a service detect the language itself.
pub const AUTO_LANGUAGE: &str = "auto";

/// Default base URL for the speech recognition service (OpenAI-compatible).
pub const RECOGNITION_BASE_URL: &str = "https://api.openai.com/v1";

/// Default transcription model name.
pub const RECOGNITION_MODEL: &str = "whisper-1";

/// Default base URL for the translation service (LibreTranslate-compatible).
pub const TRANSLATION_BASE_URL: &str = "https://libretranslate.com";

/// Default base URL for the text-to-speech service (OpenAI-compatible).
pub const TTS_BASE_URL: &str = "https://api.openai.com/v1";

/// Default text-to-speech model name.
pub const TTS_MODEL: &str = "tts-1";

/// Default text-to-speech voice.
pub const TTS_VOICE: &str = "alloy";

/// Default container format requested from the text-to-speech service.
pub const TTS_FORMAT: &str = "mp3";
