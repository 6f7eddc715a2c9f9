//! voxlate - Hands-free speech translator for the command line
//!
//! Captures an utterance from the microphone, stops on silence, then relays
//! it through cloud recognition, translation, and text-to-speech before
//! playing the result.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod audio;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod defaults;
pub mod diagnostics;
pub mod error;
pub mod recording;
pub mod relay;
pub mod services;

// Composition root - needs everything
#[cfg(all(feature = "cpal-audio", feature = "cli"))]
pub mod app;

// Core traits (source → relay → speaker)
pub use audio::playback::Player;
pub use audio::recorder::AudioSource;
pub use services::{SpeechRecognizer, SpeechSynthesizer, Translator};

// The utterance relay
pub use relay::{Relay, RelayOutcome};

// Error handling
pub use error::{Result, VoxlateError};

// Config
pub use config::Config;

/// Build version string with optional git commit hash.
///
/// Returns `"0.3.2+abc1234"` when git hash is available, `"0.3.2"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}
