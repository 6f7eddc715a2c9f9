//! Speaker playback for synthesized speech.
//!
//! The `Player` trait abstracts the output device so the relay can be tested
//! without audio hardware; `CpalPlayer` is the real implementation.

use crate::audio::decode::DecodedAudio;
use crate::error::{Result, VoxlateError};
use std::sync::Mutex;

/// Trait for audio playback devices.
pub trait Player: Send + Sync {
    /// Play decoded audio to completion, blocking until it finishes.
    fn play(&self, audio: &DecodedAudio) -> Result<()>;
}

/// Mock player for testing. Records everything it is asked to play.
#[derive(Debug, Default)]
pub struct MockPlayer {
    played: Mutex<Vec<DecodedAudio>>,
    should_fail: bool,
}

impl MockPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the mock to fail on play
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Everything played so far, in order.
    pub fn played(&self) -> Vec<DecodedAudio> {
        self.played.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl Player for MockPlayer {
    fn play(&self, audio: &DecodedAudio) -> Result<()> {
        if self.should_fail {
            return Err(VoxlateError::AudioPlayback {
                message: "mock playback failure".to_string(),
            });
        }
        if let Ok(mut played) = self.played.lock() {
            played.push(audio.clone());
        }
        Ok(())
    }
}

#[cfg(feature = "cpal-audio")]
pub use cpal_player::{CpalPlayer, list_output_devices};

#[cfg(feature = "cpal-audio")]
mod cpal_player {
    use super::{DecodedAudio, Player, Result, VoxlateError};
    use crate::audio::capture::with_suppressed_stderr;
    use crate::audio::wav::resample;
    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// List available audio output devices.
    ///
    /// # Errors
    /// Returns `VoxlateError::AudioPlayback` if device enumeration fails.
    pub fn list_output_devices() -> Result<Vec<String>> {
        let (host, devices) = with_suppressed_stderr(|| {
            let host = cpal::default_host();
            let devices = host.output_devices();
            (host, devices)
        });
        let _ = host; // keep host alive while iterating devices
        let devices = devices.map_err(|e| VoxlateError::AudioPlayback {
            message: format!("Failed to enumerate output devices: {}", e),
        })?;

        Ok(devices.filter_map(|d| d.name().ok()).collect())
    }

    /// Speaker playback via CPAL.
    ///
    /// Each `play` call opens the device at its native config, resamples the
    /// mono PCM to the device rate, duplicates it across the device's
    /// channels, and blocks until the queue drains.
    pub struct CpalPlayer {
        device_name: Option<String>,
    }

    impl CpalPlayer {
        /// Create a player for the named output device, or the system default.
        pub fn new(device_name: Option<&str>) -> Self {
            Self {
                device_name: device_name.map(String::from),
            }
        }

        fn open_device(&self) -> Result<cpal::Device> {
            with_suppressed_stderr(|| {
                let host = cpal::default_host();

                match &self.device_name {
                    Some(name) => {
                        let devices =
                            host.output_devices()
                                .map_err(|e| VoxlateError::AudioPlayback {
                                    message: format!("Failed to enumerate output devices: {}", e),
                                })?;
                        for dev in devices {
                            if let Ok(dev_name) = dev.name()
                                && &dev_name == name
                            {
                                return Ok(dev);
                            }
                        }
                        Err(VoxlateError::AudioDeviceNotFound {
                            device: name.clone(),
                        })
                    }
                    None => host.default_output_device().ok_or_else(|| {
                        VoxlateError::AudioDeviceNotFound {
                            device: "default".to_string(),
                        }
                    }),
                }
            })
        }
    }

    impl Player for CpalPlayer {
        fn play(&self, audio: &DecodedAudio) -> Result<()> {
            if audio.samples.is_empty() {
                return Ok(());
            }

            let device = self.open_device()?;
            let config =
                device
                    .default_output_config()
                    .map_err(|e| VoxlateError::AudioPlayback {
                        message: format!("Failed to query output config: {}", e),
                    })?;

            let device_rate = config.sample_rate();
            let channels = config.channels() as usize;
            let stream_config: cpal::StreamConfig = config.clone().into();

            let samples: Arc<Vec<i16>> =
                Arc::new(resample(&audio.samples, audio.sample_rate, device_rate));
            let position = Arc::new(AtomicUsize::new(0));
            let (done_tx, done_rx) = crossbeam_channel::bounded::<()>(1);

            let err_callback = |err| {
                eprintln!("Audio stream error: {}", err);
            };

            let stream = match config.sample_format() {
                cpal::SampleFormat::F32 => {
                    let samples = Arc::clone(&samples);
                    let position = Arc::clone(&position);
                    device.build_output_stream(
                        &stream_config,
                        move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                            for frame in data.chunks_mut(channels) {
                                let value = next_sample(&samples, &position, &done_tx)
                                    .map(|s| s as f32 / i16::MAX as f32)
                                    .unwrap_or(0.0);
                                for out in frame.iter_mut() {
                                    *out = value;
                                }
                            }
                        },
                        err_callback,
                        None,
                    )
                }
                cpal::SampleFormat::I16 => {
                    let samples = Arc::clone(&samples);
                    let position = Arc::clone(&position);
                    device.build_output_stream(
                        &stream_config,
                        move |data: &mut [i16], _: &cpal::OutputCallbackInfo| {
                            for frame in data.chunks_mut(channels) {
                                let value =
                                    next_sample(&samples, &position, &done_tx).unwrap_or(0);
                                for out in frame.iter_mut() {
                                    *out = value;
                                }
                            }
                        },
                        err_callback,
                        None,
                    )
                }
                fmt => {
                    return Err(VoxlateError::AudioPlayback {
                        message: format!("Unsupported output sample format: {:?}", fmt),
                    });
                }
            }
            .map_err(|e| VoxlateError::AudioPlayback {
                message: format!("Failed to build output stream: {}", e),
            })?;

            stream.play().map_err(|e| VoxlateError::AudioPlayback {
                message: format!("Failed to start output stream: {}", e),
            })?;

            // Block until the callback has consumed the whole buffer. A stalled
            // stream must not hang the relay forever, hence the timeout.
            let expected = Duration::from_secs_f64(samples.len() as f64 / device_rate as f64);
            done_rx
                .recv_timeout(expected + Duration::from_secs(5))
                .map_err(|_| VoxlateError::AudioPlayback {
                    message: "playback did not complete".to_string(),
                })?;

            // Let the device drain its internal buffer before tearing down.
            std::thread::sleep(Duration::from_millis(100));
            drop(stream);
            Ok(())
        }
    }

    /// Pop the next sample for the callback; signals completion exactly once
    /// when the buffer runs out.
    fn next_sample(
        samples: &[i16],
        position: &AtomicUsize,
        done: &crossbeam_channel::Sender<()>,
    ) -> Option<i16> {
        let idx = position.fetch_add(1, Ordering::Relaxed);
        if idx < samples.len() {
            Some(samples[idx])
        } else {
            if idx == samples.len() {
                let _ = done.try_send(());
            }
            None
        }
    }
}
