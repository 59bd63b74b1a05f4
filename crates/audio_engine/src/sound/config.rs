//! Sound configuration and marker data
//!
//! Plain data types; both derive serde so sound banks and marker tables can
//! be described in data files.

use serde::{Deserialize, Serialize};

/// Playback configuration for a sound
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundConfig {
    /// Start muted
    pub mute: bool,
    /// Volume multiplier (0.0 to 1.0)
    pub volume: f32,
    /// Playback rate multiplier (1.0 = normal speed)
    pub rate: f32,
    /// Detune in cents
    pub detune: f32,
    /// Position to begin playback from, in seconds
    ///
    /// Currently ignored by `BufferSound::play`; see the TODO there.
    pub seek: f32,
    /// Delay before playback begins, in seconds
    pub delay: f32,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            mute: false,
            volume: 1.0,
            rate: 1.0,
            detune: 0.0,
            seek: 0.0,
            delay: 0.0,
        }
    }
}

/// A named offset/duration region within a sound's decoded data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    /// Unique name within the owning sound
    pub name: String,
    /// Start offset in seconds
    pub start: f64,
    /// Region duration in seconds; `None` plays to the end of the data
    pub duration: Option<f64>,
    /// Configuration applied when this marker is played
    pub config: Option<SoundConfig>,
}

impl Marker {
    /// Create a marker starting at the given offset
    pub fn new<S: Into<String>>(name: S, start: f64) -> Self {
        Self {
            name: name.into(),
            start,
            duration: None,
            config: None,
        }
    }

    /// Set the region duration
    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Set the marker-specific configuration
    pub fn with_config(mut self, config: SoundConfig) -> Self {
        self.config = Some(config);
        self
    }
}
