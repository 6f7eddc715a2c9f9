//! Cloud speech recognition client.
//!
//! Uploads a WAV-encoded utterance to an OpenAI-compatible
//! `/audio/transcriptions` endpoint and returns the recognized text.

use crate::audio::wav::encode_wav;
use crate::config::RecognitionConfig;
use crate::defaults;
use crate::error::{Result, VoxlateError};
use async_trait::async_trait;

/// Trait for speech-to-text services.
///
/// This trait allows swapping implementations (real HTTP service vs mock).
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Recognize 16-bit PCM mono audio at 16kHz.
    ///
    /// # Returns
    /// The recognized text, trimmed. An empty string means the service heard
    /// nothing it could transcribe.
    async fn recognize(&self, audio: &[i16]) -> Result<String>;
}

/// Speech recognition over HTTP.
pub struct HttpRecognizer {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    language: String,
}

impl HttpRecognizer {
    pub fn new(config: &RecognitionConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            language: config.language.clone(),
        }
    }
}

#[async_trait]
impl SpeechRecognizer for HttpRecognizer {
    async fn recognize(&self, audio: &[i16]) -> Result<String> {
        let wav_data = encode_wav(audio, defaults::SAMPLE_RATE)?;

        let part = reqwest::multipart::Part::bytes(wav_data)
            .file_name("utterance.wav")
            .mime_str("audio/wav")
            .map_err(|e| VoxlateError::Recognition {
                message: format!("Failed to build upload: {}", e),
            })?;

        let mut form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("model", self.model.clone());

        // "auto" means let the service detect the language itself
        if self.language != defaults::AUTO_LANGUAGE {
            form = form.text("language", self.language.clone());
        }

        let url = format!("{}/audio/transcriptions", self.base_url);

        let mut request = self.client.post(&url);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.multipart(form).send().await.map_err(|e| {
            VoxlateError::Recognition {
                message: format!("Request failed: {}", e),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VoxlateError::Recognition {
                message: format!("Service returned {}: {}", status, body),
            });
        }

        let json: serde_json::Value =
            response
                .json()
                .await
                .map_err(|e| VoxlateError::Recognition {
                    message: format!("Failed to parse response: {}", e),
                })?;

        let text = json
            .get("text")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .trim()
            .to_string();

        Ok(text)
    }
}

/// Mock recognizer for testing
#[derive(Debug, Clone)]
pub struct MockRecognizer {
    response: String,
    should_fail: bool,
}

impl MockRecognizer {
    /// Create a new mock recognizer with default settings
    pub fn new() -> Self {
        Self {
            response: "mock recognition".to_string(),
            should_fail: false,
        }
    }

    /// Configure the mock to return a specific response
    pub fn with_response(mut self, response: &str) -> Self {
        self.response = response.to_string();
        self
    }

    /// Configure the mock to fail on recognize
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }
}

impl Default for MockRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechRecognizer for MockRecognizer {
    async fn recognize(&self, _audio: &[i16]) -> Result<String> {
        if self.should_fail {
            Err(VoxlateError::Recognition {
                message: "mock recognition failure".to_string(),
            })
        } else {
            Ok(self.response.clone())
        }
    }
}
