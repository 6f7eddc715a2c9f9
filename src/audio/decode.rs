//! Decoding of compressed audio replies (mp3 and friends) into PCM samples.

use crate::error::{Result, VoxlateError};
use std::io::Cursor;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Mono PCM audio ready for playback.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
}

impl DecodedAudio {
    /// Playback duration of the decoded audio.
    pub fn duration(&self) -> std::time::Duration {
        if self.sample_rate == 0 {
            return std::time::Duration::ZERO;
        }
        std::time::Duration::from_secs_f64(self.samples.len() as f64 / self.sample_rate as f64)
    }
}

/// Decode audio bytes into mono i16 samples at the container's native rate.
///
/// `extension` is a probe hint (e.g. "mp3", "wav"); the container is still
/// detected from the data itself. Multi-channel audio is mixed down to mono.
pub fn decode_audio(data: &[u8], extension: &str) -> Result<DecodedAudio> {
    let cursor = Cursor::new(data.to_vec());
    let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

    let mut hint = Hint::new();
    if !extension.is_empty() {
        let _ = hint.with_extension(extension);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| VoxlateError::AudioDecode {
            message: format!("probe failed: {}", e),
        })?;

    let mut format = probed.format;

    // Find the first audio track
    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != symphonia::core::codecs::CODEC_TYPE_NULL)
        .ok_or_else(|| VoxlateError::AudioDecode {
            message: "no audio track found".to_string(),
        })?;

    let codec_params = track.codec_params.clone();
    let track_id = track.id;
    let channels = codec_params.channels.map_or(1, |c| c.count());

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| VoxlateError::AudioDecode {
            message: format!("codec init failed: {}", e),
        })?;

    let mut all_samples: Vec<i16> = Vec::new();
    let mut sample_rate = codec_params.sample_rate.unwrap_or(0);

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(symphonia::core::errors::Error::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => {
                return Err(VoxlateError::AudioDecode {
                    message: format!("packet read: {}", e),
                });
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = decoder
            .decode(&packet)
            .map_err(|e| VoxlateError::AudioDecode {
                message: format!("decode: {}", e),
            })?;

        let spec = *decoded.spec();
        sample_rate = spec.rate;
        let n_frames = decoded.capacity();
        let mut sample_buf = SampleBuffer::<i16>::new(n_frames as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);
        let samples = sample_buf.samples();

        // Mix to mono
        if channels > 1 {
            for chunk in samples.chunks(channels) {
                let sum: i32 = chunk.iter().map(|&s| s as i32).sum();
                all_samples.push((sum / channels as i32) as i16);
            }
        } else {
            all_samples.extend_from_slice(samples);
        }
    }

    if all_samples.is_empty() {
        return Err(VoxlateError::AudioDecode {
            message: "no audio samples decoded".to_string(),
        });
    }

    if sample_rate == 0 {
        return Err(VoxlateError::AudioDecode {
            message: "unknown sample rate".to_string(),
        });
    }

    Ok(DecodedAudio {
        samples: all_samples,
        sample_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::wav::encode_wav;

    #[test]
    fn decode_invalid_audio_returns_error() {
        let result = decode_audio(b"not audio data", "mp3");
        assert!(result.is_err());
    }

    #[test]
    fn decode_empty_returns_error() {
        let result = decode_audio(b"", "mp3");
        assert!(result.is_err());
    }

    #[test]
    fn decode_wav_roundtrip() {
        let samples: Vec<i16> = (0..1600).map(|i| ((i % 100) * 300 - 15000) as i16).collect();
        let wav = encode_wav(&samples, 16000).unwrap();

        let decoded = decode_audio(&wav, "wav").unwrap();
        assert_eq!(decoded.sample_rate, 16000);
        assert_eq!(decoded.samples, samples);
    }

    #[test]
    fn decode_wav_with_wrong_hint_still_probes() {
        let samples = vec![1000i16; 1600];
        let wav = encode_wav(&samples, 16000).unwrap();

        // Hint says mp3 but the data is WAV; probing should still find it
        let decoded = decode_audio(&wav, "mp3").unwrap();
        assert_eq!(decoded.sample_rate, 16000);
        assert_eq!(decoded.samples.len(), 1600);
    }

    #[test]
    fn decoded_audio_duration() {
        let audio = DecodedAudio {
            samples: vec![0i16; 24000],
            sample_rate: 24000,
        };
        assert_eq!(audio.duration(), std::time::Duration::from_secs(1));

        let empty = DecodedAudio {
            samples: Vec::new(),
            sample_rate: 0,
        };
        assert_eq!(empty.duration(), std::time::Duration::ZERO);
    }
}
