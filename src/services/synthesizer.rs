//! Cloud text-to-speech client.
//!
//! Sends translated text to an OpenAI-compatible `/audio/speech` endpoint
//! and returns the synthesized audio bytes (mp3 by default).

use crate::config::TtsConfig;
use crate::error::{Result, VoxlateError};
use async_trait::async_trait;
use serde::Serialize;

/// Trait for text-to-speech services.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize speech for the given text.
    ///
    /// # Returns
    /// Compressed audio bytes in the configured container format.
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>>;
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    voice: &'a str,
    input: &'a str,
    response_format: &'a str,
}

/// Speech synthesis over HTTP.
pub struct HttpSynthesizer {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    voice: String,
    format: String,
}

impl HttpSynthesizer {
    pub fn new(config: &TtsConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            voice: config.voice.clone(),
            format: config.format.clone(),
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for HttpSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let url = format!("{}/audio/speech", self.base_url);

        let request = SpeechRequest {
            model: &self.model,
            voice: &self.voice,
            input: text,
            response_format: &self.format,
        };

        let mut builder = self.client.post(&url).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| VoxlateError::Synthesis {
            message: format!("Request failed: {}", e),
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VoxlateError::Synthesis {
                message: format!("Service returned {}: {}", status, body),
            });
        }

        let bytes = response.bytes().await.map_err(|e| VoxlateError::Synthesis {
            message: format!("Failed to read response body: {}", e),
        })?;

        if bytes.is_empty() {
            return Err(VoxlateError::Synthesis {
                message: "Service returned an empty audio body".to_string(),
            });
        }

        Ok(bytes.to_vec())
    }
}

/// Mock synthesizer for testing
#[derive(Debug, Clone)]
pub struct MockSynthesizer {
    response: Vec<u8>,
    should_fail: bool,
}

impl MockSynthesizer {
    /// Create a new mock synthesizer with default settings
    pub fn new() -> Self {
        Self {
            response: vec![0u8; 64],
            should_fail: false,
        }
    }

    /// Configure the mock to return specific audio bytes
    pub fn with_audio(mut self, audio: Vec<u8>) -> Self {
        self.response = audio;
        self
    }

    /// Configure the mock to fail on synthesize
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }
}

impl Default for MockSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSynthesizer {
    async fn synthesize(&self, _text: &str) -> Result<Vec<u8>> {
        if self.should_fail {
            Err(VoxlateError::Synthesis {
                message: "mock synthesis failure".to_string(),
            })
        } else {
            Ok(self.response.clone())
        }
    }
}
