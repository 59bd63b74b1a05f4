//! Decoded audio data
//!
//! An `AudioBuffer` is the read-only result of decoding an audio file.
//! Decoding itself lives outside this crate; sounds receive buffers through
//! the cache and never mutate them.

use crate::error::AudioError;

/// Decoded audio samples, interleaved by channel
#[derive(Debug, Clone)]
pub struct AudioBuffer {
    /// Interleaved sample data
    samples: Vec<f32>,
    /// Number of channels (1=mono, 2=stereo)
    channels: u16,
    /// Sample rate in Hz
    sample_rate: u32,
}

impl AudioBuffer {
    /// Create a buffer from interleaved samples
    ///
    /// # Errors
    /// - `InvalidBuffer` if `channels` or `sample_rate` is zero, or the
    ///   sample count is not a multiple of the channel count
    pub fn new(samples: Vec<f32>, channels: u16, sample_rate: u32) -> Result<Self, AudioError> {
        if channels == 0 {
            return Err(AudioError::InvalidBuffer("zero channels".to_string()));
        }
        if sample_rate == 0 {
            return Err(AudioError::InvalidBuffer("zero sample rate".to_string()));
        }
        if samples.len() % channels as usize != 0 {
            return Err(AudioError::InvalidBuffer(format!(
                "{} samples do not divide into {} channels",
                samples.len(),
                channels
            )));
        }

        Ok(Self {
            samples,
            channels,
            sample_rate,
        })
    }

    /// Create a silent buffer of the given length in seconds
    pub fn silent(duration_secs: f64, channels: u16, sample_rate: u32) -> Self {
        let channels = channels.max(1);
        let sample_rate = sample_rate.max(1);
        let frames = (duration_secs.max(0.0) * f64::from(sample_rate)).round() as usize;

        Self {
            samples: vec![0.0; frames * channels as usize],
            channels,
            sample_rate,
        }
    }

    /// Get the interleaved sample data
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Get the channel count
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Get the sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Get the number of frames (samples per channel)
    pub fn frame_count(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    /// Get the duration in seconds
    pub fn duration(&self) -> f64 {
        self.frame_count() as f64 / f64::from(self.sample_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_duration() {
        let buffer = AudioBuffer::new(vec![0.0; 48000 * 2], 2, 48000).unwrap();
        assert_eq!(buffer.frame_count(), 48000);
        assert_relative_eq!(buffer.duration(), 1.0);
    }

    #[test]
    fn test_silent_buffer() {
        let buffer = AudioBuffer::silent(0.5, 1, 1000);
        assert_eq!(buffer.frame_count(), 500);
        assert_relative_eq!(buffer.duration(), 0.5);
        assert!(buffer.samples().iter().all(|s| *s == 0.0));
    }

    #[test]
    fn test_invalid_buffers_rejected() {
        assert!(AudioBuffer::new(vec![0.0; 4], 0, 48000).is_err());
        assert!(AudioBuffer::new(vec![0.0; 4], 2, 0).is_err());
        assert!(AudioBuffer::new(vec![0.0; 3], 2, 48000).is_err());
    }
}
