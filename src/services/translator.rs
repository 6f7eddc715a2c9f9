//! Cloud translation client.
//!
//! Sends recognized text to a LibreTranslate-compatible `/translate`
//! endpoint and returns the translated text.

use crate::config::TranslationConfig;
use crate::error::{Result, VoxlateError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Trait for text translation services.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate text into the configured target language.
    async fn translate(&self, text: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

/// Translation over HTTP.
pub struct HttpTranslator {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    source: String,
    target: String,
}

impl HttpTranslator {
    pub fn new(config: &TranslationConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            source: config.source.clone(),
            target: config.target.clone(),
        }
    }
}

#[async_trait]
impl Translator for HttpTranslator {
    async fn translate(&self, text: &str) -> Result<String> {
        let url = format!("{}/translate", self.base_url);

        let request = TranslateRequest {
            q: text,
            source: &self.source,
            target: &self.target,
            format: "text",
            api_key: self.api_key.as_deref(),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| VoxlateError::Translation {
                message: format!("Request failed: {}", e),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VoxlateError::Translation {
                message: format!("Service returned {}: {}", status, body),
            });
        }

        let parsed: TranslateResponse =
            response
                .json()
                .await
                .map_err(|e| VoxlateError::Translation {
                    message: format!("Failed to parse response: {}", e),
                })?;

        Ok(parsed.translated_text)
    }
}

/// Mock translator for testing
#[derive(Debug, Clone)]
pub struct MockTranslator {
    response: String,
    should_fail: bool,
}

impl MockTranslator {
    /// Create a new mock translator with default settings
    pub fn new() -> Self {
        Self {
            response: "mock translation".to_string(),
            should_fail: false,
        }
    }

    /// Configure the mock to return a specific response
    pub fn with_response(mut self, response: &str) -> Self {
        self.response = response.to_string();
        self
    }

    /// Configure the mock to fail on translate
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }
}

impl Default for MockTranslator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, _text: &str) -> Result<String> {
        if self.should_fail {
            Err(VoxlateError::Translation {
                message: "mock translation failure".to_string(),
            })
        } else {
            Ok(self.response.clone())
        }
    }
}
