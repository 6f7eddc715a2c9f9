use crate::defaults;
use crate::error::{Result, VoxlateError};
use std::collections::VecDeque;

/// Trait for audio source devices.
///
/// This trait allows swapping implementations (real audio device vs mock).
pub trait AudioSource: Send + Sync {
    /// Start capturing audio from the source.
    fn start(&mut self) -> Result<()>;

    /// Stop capturing audio from the source.
    fn stop(&mut self) -> Result<()>;

    /// Read audio samples captured since the last call.
    ///
    /// # Returns
    /// Vector of 16-bit PCM audio samples, or an error
    fn read_samples(&mut self) -> Result<Vec<i16>>;
}

/// Configuration for audio source initialization
#[derive(Debug, Clone)]
pub struct AudioSourceConfig {
    pub sample_rate: u32,
}

impl Default for AudioSourceConfig {
    fn default() -> Self {
        Self {
            sample_rate: defaults::SAMPLE_RATE,
        }
    }
}

/// Mock audio source for testing.
///
/// Serves a scripted sequence of chunks; once the script runs out the final
/// chunk repeats, so a recording loop driven by this source keeps observing
/// a stable signal instead of starving.
#[derive(Debug, Clone)]
pub struct MockAudioSource {
    is_started: bool,
    chunks: VecDeque<Vec<i16>>,
    last_chunk: Vec<i16>,
    should_fail_start: bool,
    should_fail_stop: bool,
    should_fail_read: bool,
    error_message: String,
}

impl MockAudioSource {
    /// Create a new mock audio source with default settings
    pub fn new() -> Self {
        Self {
            is_started: false,
            chunks: VecDeque::new(),
            last_chunk: vec![0i16; 160],
            should_fail_start: false,
            should_fail_stop: false,
            should_fail_read: false,
            error_message: "mock audio error".to_string(),
        }
    }

    /// Configure the mock to return the same samples on every read
    pub fn with_samples(mut self, samples: Vec<i16>) -> Self {
        self.chunks.clear();
        self.last_chunk = samples;
        self
    }

    /// Configure the mock to serve a sequence of chunks, repeating the last
    pub fn with_chunks(mut self, chunks: Vec<Vec<i16>>) -> Self {
        if let Some(last) = chunks.last() {
            self.last_chunk = last.clone();
        }
        self.chunks = chunks.into();
        self
    }

    /// Configure the mock to fail on start
    pub fn with_start_failure(mut self) -> Self {
        self.should_fail_start = true;
        self
    }

    /// Configure the mock to fail on stop
    pub fn with_stop_failure(mut self) -> Self {
        self.should_fail_stop = true;
        self
    }

    /// Configure the mock to fail on read
    pub fn with_read_failure(mut self) -> Self {
        self.should_fail_read = true;
        self
    }

    /// Configure the error message for failures
    pub fn with_error_message(mut self, message: &str) -> Self {
        self.error_message = message.to_string();
        self
    }

    /// Check if the audio source is started
    pub fn is_started(&self) -> bool {
        self.is_started
    }
}

impl Default for MockAudioSource {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioSource for MockAudioSource {
    fn start(&mut self) -> Result<()> {
        if self.should_fail_start {
            Err(VoxlateError::AudioCapture {
                message: self.error_message.clone(),
            })
        } else {
            self.is_started = true;
            Ok(())
        }
    }

    fn stop(&mut self) -> Result<()> {
        if self.should_fail_stop {
            Err(VoxlateError::AudioCapture {
                message: self.error_message.clone(),
            })
        } else {
            self.is_started = false;
            Ok(())
        }
    }

    fn read_samples(&mut self) -> Result<Vec<i16>> {
        if self.should_fail_read {
            Err(VoxlateError::AudioCapture {
                message: self.error_message.clone(),
            })
        } else {
            Ok(self
                .chunks
                .pop_front()
                .unwrap_or_else(|| self.last_chunk.clone()))
        }
    }
}
