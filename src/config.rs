use crate::defaults;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub audio: AudioConfig,
    pub recognition: RecognitionConfig,
    pub translation: TranslationConfig,
    pub tts: TtsConfig,
    pub playback: PlaybackConfig,
}

/// Audio capture configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AudioConfig {
    pub device: Option<String>,
    pub sample_rate: u32,
    pub vad_threshold: f32,
    pub silence_duration_ms: u32,
    pub max_utterance_secs: u64,
}

/// Speech recognition service configuration (OpenAI-compatible endpoint)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RecognitionConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    /// Language spoken on the microphone ("auto" lets the service detect it)
    pub language: String,
}

/// Translation service configuration (LibreTranslate-compatible endpoint)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TranslationConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    /// Source language ("auto" lets the service detect it)
    pub source: String,
    /// Target language to translate into
    pub target: String,
}

/// Text-to-speech service configuration (OpenAI-compatible endpoint)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TtsConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub voice: String,
    /// Container format requested from the service (decoded before playback)
    pub format: String,
}

/// Speaker playback configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct PlaybackConfig {
    pub device: Option<String>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            device: None,
            sample_rate: defaults::SAMPLE_RATE,
            vad_threshold: defaults::VAD_THRESHOLD,
            silence_duration_ms: defaults::SILENCE_DURATION_MS,
            max_utterance_secs: defaults::MAX_UTTERANCE_SECS,
        }
    }
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::RECOGNITION_BASE_URL.to_string(),
            api_key: None,
            model: defaults::RECOGNITION_MODEL.to_string(),
            language: defaults::SOURCE_LANGUAGE.to_string(),
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::TRANSLATION_BASE_URL.to_string(),
            api_key: None,
            source: defaults::AUTO_LANGUAGE.to_string(),
            target: defaults::TARGET_LANGUAGE.to_string(),
        }
    }
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::TTS_BASE_URL.to_string(),
            api_key: None,
            model: defaults::TTS_MODEL.to_string(),
            voice: defaults::TTS_VOICE.to_string(),
            format: defaults::TTS_FORMAT.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Only returns defaults if the file is missing.
    /// Invalid TOML is a hard error, not something to silently paper over.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                if e.downcast_ref::<std::io::Error>()
                    .map(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
                    .unwrap_or(false)
                {
                    Self::default()
                } else {
                    panic!("Failed to load config from {}: {}", path.display(), e);
                }
            }
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - VOXLATE_AUDIO_DEVICE → audio.device
    /// - VOXLATE_SOURCE_LANG → recognition.language
    /// - VOXLATE_TARGET_LANG → translation.target
    /// - VOXLATE_RECOGNITION_API_KEY → recognition.api_key
    /// - VOXLATE_TRANSLATION_API_KEY → translation.api_key
    /// - VOXLATE_TTS_API_KEY → tts.api_key
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(device) = std::env::var("VOXLATE_AUDIO_DEVICE")
            && !device.is_empty()
        {
            self.audio.device = Some(device);
        }

        if let Ok(lang) = std::env::var("VOXLATE_SOURCE_LANG")
            && !lang.is_empty()
        {
            self.recognition.language = lang;
        }

        if let Ok(lang) = std::env::var("VOXLATE_TARGET_LANG")
            && !lang.is_empty()
        {
            self.translation.target = lang;
        }

        if let Ok(key) = std::env::var("VOXLATE_RECOGNITION_API_KEY")
            && !key.is_empty()
        {
            self.recognition.api_key = Some(key);
        }

        if let Ok(key) = std::env::var("VOXLATE_TRANSLATION_API_KEY")
            && !key.is_empty()
        {
            self.translation.api_key = Some(key);
        }

        if let Ok(key) = std::env::var("VOXLATE_TTS_API_KEY")
            && !key.is_empty()
        {
            self.tts.api_key = Some(key);
        }

        self
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/voxlate/config.toml on Linux
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .expect("Could not determine config directory")
            .join("voxlate")
            .join("config.toml")
    }

    /// Render the effective configuration as TOML.
    pub fn to_display_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// A commented configuration template for `config dump`.
    pub fn dump_template() -> &'static str {
        r#"# voxlate configuration (~/.config/voxlate/config.toml)
# Every key is optional; omitted keys use built-in defaults.

[audio]
# Input device name from `voxlate devices`; omit for the system default.
# device = "pipewire"
sample_rate = 16000
# RMS level (0.0-1.0) above which a chunk counts as speech.
vad_threshold = 0.045
# Silence needed to end a capture, in milliseconds.
silence_duration_ms = 2000
# Give up on a single capture after this many seconds.
max_utterance_secs = 3600

[recognition]
# OpenAI-compatible transcription endpoint.
base_url = "https://api.openai.com/v1"
# api_key = "sk-..."        # or VOXLATE_RECOGNITION_API_KEY
model = "whisper-1"
# Language spoken on the microphone; "auto" lets the service detect it.
language = "ru"

[translation]
# LibreTranslate-compatible endpoint.
base_url = "https://libretranslate.com"
# api_key = "..."           # or VOXLATE_TRANSLATION_API_KEY
source = "auto"
target = "en"

[tts]
# OpenAI-compatible speech endpoint.
base_url = "https://api.openai.com/v1"
# api_key = "sk-..."        # or VOXLATE_TTS_API_KEY
model = "tts-1"
voice = "alloy"
format = "mp3"

[playback]
# Output device name from `voxlate devices`; omit for the system default.
# device = "pipewire"
"#
    }
}
