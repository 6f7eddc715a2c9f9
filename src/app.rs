//! Application entry points.
//!
//! Listen mode drives the full loop: capture an utterance from the
//! microphone, then hand it to the relay (recognize → translate →
//! synthesize → play) on a background task so the next capture starts
//! immediately. Pipe mode runs the relay once over WAV data from stdin.

use crate::audio::capture::{CpalAudioSource, suppress_audio_warnings};
use crate::audio::playback::{CpalPlayer, Player};
use crate::audio::vad::VadConfig;
use crate::audio::wav::WavAudioSource;
use crate::config::Config;
use crate::error::{Result, VoxlateError};
use crate::recording::RecordingSession;
use crate::relay::{Relay, RelayOutcome};
use crate::services::{HttpRecognizer, HttpSynthesizer, HttpTranslator};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::task::JoinSet;

/// Options gathered from the command line.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub device: Option<String>,
    pub playback_device: Option<String>,
    pub source_lang: Option<String>,
    pub target_lang: Option<String>,
    pub pause_ms: Option<u32>,
    pub threshold: Option<f32>,
    pub once: bool,
    pub sequential: bool,
    pub save_audio: Option<PathBuf>,
    pub no_play: bool,
    pub quiet: bool,
    pub verbosity: u8,
}

/// Apply CLI overrides on top of the loaded configuration.
fn apply_overrides(config: &mut Config, opts: &RunOptions) {
    if let Some(d) = &opts.device {
        config.audio.device = Some(d.clone());
    }
    if let Some(d) = &opts.playback_device {
        config.playback.device = Some(d.clone());
    }
    if let Some(lang) = &opts.source_lang {
        config.recognition.language = lang.clone();
    }
    if let Some(lang) = &opts.target_lang {
        config.translation.target = lang.clone();
    }
    if let Some(pause) = opts.pause_ms {
        config.audio.silence_duration_ms = pause;
    }
    if let Some(threshold) = opts.threshold {
        config.audio.vad_threshold = threshold;
    }
}

/// Build the relay over the configured HTTP services and speaker.
fn build_relay(config: &Config, opts: &RunOptions) -> Relay {
    let player: Arc<dyn Player> = Arc::new(CpalPlayer::new(config.playback.device.as_deref()));

    let mut relay = Relay::new(
        Arc::new(HttpRecognizer::new(&config.recognition)),
        Arc::new(HttpTranslator::new(&config.translation)),
        Arc::new(HttpSynthesizer::new(&config.tts)),
        player,
    )
    .with_audio_format(&config.tts.format)
    .with_save_audio(opts.save_audio.clone());

    if opts.no_play {
        relay = relay.without_playback();
    }
    relay
}

/// Print one relay result. Errors are reported, never fatal: a failed
/// service call drops that utterance and the loop keeps listening.
fn report_outcome(
    joined: std::result::Result<Result<Option<RelayOutcome>>, tokio::task::JoinError>,
    opts: &RunOptions,
) {
    match joined {
        Ok(Ok(Some(outcome))) => {
            if !opts.quiet {
                if opts.verbosity >= 1 {
                    eprintln!("» {}", outcome.recognized);
                }
                eprintln!("\"{}\"", outcome.translated);
            }
        }
        Ok(Ok(None)) => {
            if opts.verbosity >= 1 && !opts.quiet {
                eprintln!("(nothing recognized)");
            }
        }
        Ok(Err(e)) => eprintln!("voxlate: {}", e),
        Err(e) => eprintln!("voxlate: relay task failed: {}", e),
    }
}

/// Run the listen loop: capture → relay, until Ctrl+C (or `--once`).
pub async fn run_listen_command(mut config: Config, opts: RunOptions) -> Result<()> {
    // Suppress noisy JACK/ALSA warnings before audio init
    suppress_audio_warnings();

    apply_overrides(&mut config, &opts);

    let relay = Arc::new(build_relay(&config, &opts));

    let vad_config = VadConfig {
        speech_threshold: config.audio.vad_threshold,
        silence_duration_ms: config.audio.silence_duration_ms,
    };

    let cancel = Arc::new(AtomicBool::new(false));
    let mut session = RecordingSession::new(
        CpalAudioSource::new(config.audio.device.as_deref())?,
        vad_config,
    )
    .with_max_duration(Duration::from_secs(config.audio.max_utterance_secs))
    .with_level_display(opts.verbosity >= 1 && !opts.quiet)
    .with_cancel_flag(Arc::clone(&cancel));

    if !opts.quiet {
        eprintln!(
            "Listening ({} → {}). Ctrl+C to stop.",
            config.recognition.language, config.translation.target
        );
    }

    let mut relays: JoinSet<Result<Option<RelayOutcome>>> = JoinSet::new();
    let mut interrupted = false;

    loop {
        // Report any background relays that finished while we were recording
        while let Some(joined) = relays.try_join_next() {
            report_outcome(joined, &opts);
        }

        let mut recording = tokio::task::spawn_blocking(move || {
            let capture = session.record();
            (session, capture)
        });

        let capture = tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                cancel.store(true, Ordering::Relaxed);
                let _ = (&mut recording).await;
                interrupted = true;
                break;
            }
            joined = &mut recording => {
                let (returned, capture) = joined.map_err(|e| {
                    VoxlateError::Other(format!("Recording task failed: {}", e))
                })?;
                session = returned;
                capture?
            }
        };

        if !capture.speech_detected {
            if opts.verbosity >= 1 && !opts.quiet {
                eprintln!("(silence)");
            }
            continue;
        }

        if opts.verbosity >= 2 && !opts.quiet {
            eprintln!(
                "Captured {:.1}s of audio (peak level {:.3})",
                capture.samples.len() as f32 / config.audio.sample_rate as f32,
                capture.peak_level
            );
        }

        if opts.sequential {
            let outcome = relay.process(capture.samples).await;
            report_outcome(Ok(outcome), &opts);
        } else {
            // Background relay so the next capture starts immediately
            let relay = Arc::clone(&relay);
            relays.spawn(async move { relay.process(capture.samples).await });
        }

        if opts.once {
            break;
        }
    }

    if interrupted && !opts.quiet {
        eprintln!("\nShutting down...");
    }

    // Let in-flight utterances finish translating and playing
    while let Some(joined) = relays.join_next().await {
        report_outcome(joined, &opts);
    }

    Ok(())
}

/// Pipe mode: read one WAV utterance from stdin, relay it, print the
/// translation on stdout.
pub async fn run_pipe_command(mut config: Config, opts: RunOptions) -> Result<()> {
    apply_overrides(&mut config, &opts);

    let relay = build_relay(&config, &opts);

    let samples = WavAudioSource::from_stdin()?.into_samples();
    if samples.is_empty() {
        return Err(VoxlateError::AudioCapture {
            message: "stdin WAV contained no samples".to_string(),
        });
    }

    match relay.process(samples).await? {
        Some(outcome) => {
            if opts.verbosity >= 1 && !opts.quiet {
                eprintln!("» {}", outcome.recognized);
            }
            println!("{}", outcome.translated);
        }
        None => {
            if !opts.quiet {
                eprintln!("Nothing recognized.");
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_opts() -> RunOptions {
        RunOptions {
            device: Some("mic".to_string()),
            playback_device: Some("speakers".to_string()),
            source_lang: Some("de".to_string()),
            target_lang: Some("fr".to_string()),
            pause_ms: Some(1000),
            threshold: Some(0.08),
            ..Default::default()
        }
    }

    #[test]
    fn test_apply_overrides_sets_every_field() {
        let mut config = Config::default();
        apply_overrides(&mut config, &full_opts());

        assert_eq!(config.audio.device, Some("mic".to_string()));
        assert_eq!(config.playback.device, Some("speakers".to_string()));
        assert_eq!(config.recognition.language, "de");
        assert_eq!(config.translation.target, "fr");
        assert_eq!(config.audio.silence_duration_ms, 1000);
        assert_eq!(config.audio.vad_threshold, 0.08);
    }

    #[test]
    fn test_apply_overrides_defaults_leave_config_alone() {
        let mut config = Config::default();
        apply_overrides(&mut config, &RunOptions::default());

        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_build_relay_constructs() {
        let config = Config::default();
        let opts = RunOptions {
            no_play: true,
            save_audio: Some(PathBuf::from("/tmp/out.mp3")),
            ..Default::default()
        };
        // Just verify the composition wires up
        let _relay = build_relay(&config, &opts);
    }
}
