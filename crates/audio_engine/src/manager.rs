//! Sound manager
//!
//! The collaborator sounds depend on: it owns the audio context and its
//! clock, the shared output destination, the decoded-audio cache and the
//! manager-wide rate/detune multipliers. Scheduling, event fan-out and
//! global pause live above this layer and are out of scope here.

use crate::cache::AudioCache;
use crate::graph::{AudioContext, GainNode};
use crate::sound::{BufferSound, SoundConfig};

/// Owner of the audio context, output destination and decoded-audio cache
pub struct SoundManager {
    context: AudioContext,
    cache: AudioCache,
    rate: f32,
    detune: f32,
}

impl SoundManager {
    /// Create a manager with a default audio context
    pub fn new() -> Self {
        Self::with_context(AudioContext::new())
    }

    /// Create a manager around an existing audio context
    pub fn with_context(context: AudioContext) -> Self {
        Self {
            context,
            cache: AudioCache::new(),
            rate: 1.0,
            detune: 0.0,
        }
    }

    /// Get the audio context
    pub fn context(&self) -> &AudioContext {
        &self.context
    }

    /// Get the shared output destination node
    pub fn destination(&self) -> &GainNode {
        self.context.destination()
    }

    /// Get the decoded-audio cache
    pub fn cache(&self) -> &AudioCache {
        &self.cache
    }

    /// Get mutable access to the decoded-audio cache
    pub fn cache_mut(&mut self) -> &mut AudioCache {
        &mut self.cache
    }

    /// Manager-wide playback rate multiplier
    pub fn rate(&self) -> f32 {
        self.rate
    }

    /// Set the manager-wide playback rate multiplier
    pub fn set_rate(&mut self, rate: f32) {
        self.rate = rate;
    }

    /// Manager-wide detune offset in cents
    pub fn detune(&self) -> f32 {
        self.detune
    }

    /// Set the manager-wide detune offset in cents
    pub fn set_detune(&mut self, detune: f32) {
        self.detune = detune;
    }

    /// Create a sound bound to a cached buffer
    ///
    /// A missing key logs an error and yields an unusable sound; see
    /// [`BufferSound::new`].
    pub fn add_sound<S: Into<String>>(&self, key: S, config: SoundConfig) -> BufferSound {
        BufferSound::new(self, &key.into(), config)
    }
}

impl Default for SoundManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::AudioBuffer;

    #[test]
    fn test_manager_defaults() {
        let manager = SoundManager::new();
        assert_eq!(manager.rate(), 1.0);
        assert_eq!(manager.detune(), 0.0);
        assert!(manager.cache().is_empty());
    }

    #[test]
    fn test_global_multipliers() {
        let mut manager = SoundManager::new();
        manager.set_rate(1.5);
        manager.set_detune(200.0);
        assert_eq!(manager.rate(), 1.5);
        assert_eq!(manager.detune(), 200.0);
    }

    #[test]
    fn test_add_sound_resolves_cache() {
        let mut manager = SoundManager::new();
        manager
            .cache_mut()
            .insert("beep", AudioBuffer::silent(1.0, 1, 1000));

        let sound = manager.add_sound("beep", SoundConfig::default());
        assert_eq!(sound.total_duration(), 1.0);
    }
}
