//! Audio capture, playback, and signal plumbing.

#[cfg(feature = "cpal-audio")]
pub mod capture;
pub mod decode;
pub mod playback;
pub mod recorder;
pub mod vad;
pub mod wav;
