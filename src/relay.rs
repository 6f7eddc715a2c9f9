//! The utterance relay: recognize → translate → synthesize → play.
//!
//! One `process` call carries a single captured utterance through the three
//! cloud services and out of the speakers. The app runs it inline or on a
//! background task; the relay itself doesn't care.

use crate::audio::decode::decode_audio;
use crate::audio::playback::Player;
use crate::error::{Result, VoxlateError};
use crate::services::{SpeechRecognizer, SpeechSynthesizer, Translator};
use std::path::PathBuf;
use std::sync::Arc;

/// What came out of one trip through the services.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayOutcome {
    /// Text recognized from the microphone audio.
    pub recognized: String,
    /// Its translation into the target language.
    pub translated: String,
}

/// Glues the cloud services and the speaker together for one utterance.
pub struct Relay {
    recognizer: Arc<dyn SpeechRecognizer>,
    translator: Arc<dyn Translator>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    player: Arc<dyn Player>,
    audio_format: String,
    save_audio: Option<PathBuf>,
    play_audio: bool,
}

impl Relay {
    pub fn new(
        recognizer: Arc<dyn SpeechRecognizer>,
        translator: Arc<dyn Translator>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        player: Arc<dyn Player>,
    ) -> Self {
        Self {
            recognizer,
            translator,
            synthesizer,
            player,
            audio_format: crate::defaults::TTS_FORMAT.to_string(),
            save_audio: None,
            play_audio: true,
        }
    }

    /// Container format the synthesizer replies with (decode hint).
    pub fn with_audio_format(mut self, format: &str) -> Self {
        self.audio_format = format.to_string();
        self
    }

    /// Also write the synthesized audio to this path.
    pub fn with_save_audio(mut self, path: Option<PathBuf>) -> Self {
        self.save_audio = path;
        self
    }

    /// Skip playback (useful with `with_save_audio`).
    pub fn without_playback(mut self) -> Self {
        self.play_audio = false;
        self
    }

    /// Run one utterance through recognize → translate → synthesize → play.
    ///
    /// # Returns
    /// `Ok(None)` when the recognition service heard nothing it could
    /// transcribe — that capture is simply dropped, the way the original
    /// pipeline swallows a silent utterance.
    pub async fn process(&self, samples: Vec<i16>) -> Result<Option<RelayOutcome>> {
        let recognized = self.recognizer.recognize(&samples).await?;
        if recognized.is_empty() {
            return Ok(None);
        }

        let translated = self.translator.translate(&recognized).await?;
        let audio = self.synthesizer.synthesize(&translated).await?;

        if let Some(path) = &self.save_audio {
            tokio::fs::write(path, &audio).await?;
        }

        if self.play_audio {
            let decoded = decode_audio(&audio, &self.audio_format)?;
            let player = Arc::clone(&self.player);
            // Playback blocks until the speaker drains; keep it off the runtime
            tokio::task::spawn_blocking(move || player.play(&decoded))
                .await
                .map_err(|e| VoxlateError::Other(format!("Playback task failed: {}", e)))??;
        }

        Ok(Some(RelayOutcome {
            recognized,
            translated,
        }))
    }
}
