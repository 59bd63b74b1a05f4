//! Transport state machine shared by sound implementations
//!
//! Holds the generic play/pause/resume/stop precondition checks and the
//! fields every sound backend shares: marker table, active marker, resolved
//! configuration and durations. Backends embed a `Transport` and delegate
//! validation to it; an accepted transition mutates the shared fields, a
//! rejected one returns `false` with no state change.

use std::collections::HashMap;

use crate::sound::config::{Marker, SoundConfig};

/// Playback state of a sound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundState {
    /// Not playing and not paused
    Stopped,
    /// Actively playing
    Playing,
    /// Paused mid-playback
    Paused,
}

/// Shared transport state and precondition logic
#[derive(Debug, Clone)]
pub struct Transport {
    state: SoundState,
    markers: HashMap<String, Marker>,
    current_marker: Option<Marker>,
    base_config: SoundConfig,
    current_config: SoundConfig,
    duration: f64,
    total_duration: f64,
}

impl Transport {
    /// Create a transport for a sound of the given total duration
    pub fn new(base_config: SoundConfig, total_duration: f64) -> Self {
        Self {
            state: SoundState::Stopped,
            markers: HashMap::new(),
            current_marker: None,
            base_config,
            current_config: base_config,
            duration: total_duration,
            total_duration,
        }
    }

    /// Get the current playback state
    pub fn state(&self) -> SoundState {
        self.state
    }

    /// Get the marker the current playback was started with
    pub fn current_marker(&self) -> Option<&Marker> {
        self.current_marker.as_ref()
    }

    /// Get the configuration resolved for the current playback
    pub fn current_config(&self) -> &SoundConfig {
        &self.current_config
    }

    /// Get mutable access to the resolved configuration
    ///
    /// Property setters on the sound write through this.
    pub fn config_mut(&mut self) -> &mut SoundConfig {
        &mut self.current_config
    }

    /// Duration of the current playback segment in seconds
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Duration of the whole decoded data in seconds
    pub fn total_duration(&self) -> f64 {
        self.total_duration
    }

    /// Register a marker; rejects duplicates and unnamed markers
    pub fn add_marker(&mut self, marker: Marker) -> bool {
        if marker.name.is_empty() {
            log::warn!("Cannot add marker with an empty name");
            return false;
        }
        if self.markers.contains_key(&marker.name) {
            log::warn!("Marker '{}' already exists", marker.name);
            return false;
        }
        self.markers.insert(marker.name.clone(), marker);
        true
    }

    /// Replace an existing marker; rejects unknown names
    pub fn update_marker(&mut self, marker: Marker) -> bool {
        if !self.markers.contains_key(&marker.name) {
            log::warn!("Marker '{}' does not exist", marker.name);
            return false;
        }
        self.markers.insert(marker.name.clone(), marker);
        true
    }

    /// Remove a marker by name
    pub fn remove_marker(&mut self, name: &str) -> Option<Marker> {
        self.markers.remove(name)
    }

    /// Look up a registered marker
    pub fn marker(&self, name: &str) -> Option<&Marker> {
        self.markers.get(name)
    }

    /// Validate and apply a play transition
    ///
    /// Playing while already playing restarts the sound. Rejects unknown
    /// marker names. On acceptance resolves the active marker, the
    /// configuration (explicit override, else marker config, else the base
    /// config) and the segment duration (marker duration, else the total).
    pub fn try_begin_play(
        &mut self,
        marker_name: Option<&str>,
        config: Option<&SoundConfig>,
    ) -> bool {
        let marker = match marker_name {
            Some(name) => match self.markers.get(name) {
                Some(marker) => Some(marker.clone()),
                None => {
                    log::warn!("No marker with name '{}' found", name);
                    return false;
                }
            },
            None => None,
        };

        self.duration = marker
            .as_ref()
            .and_then(|m| m.duration)
            .unwrap_or(self.total_duration);
        self.current_config = config
            .copied()
            .or_else(|| marker.as_ref().and_then(|m| m.config))
            .unwrap_or(self.base_config);
        self.current_marker = marker;
        self.state = SoundState::Playing;
        true
    }

    /// Validate and apply a pause transition (Playing -> Paused)
    pub fn try_pause(&mut self) -> bool {
        if self.state != SoundState::Playing {
            return false;
        }
        self.state = SoundState::Paused;
        true
    }

    /// Validate and apply a resume transition (Paused -> Playing)
    pub fn try_resume(&mut self) -> bool {
        if self.state != SoundState::Paused {
            return false;
        }
        self.state = SoundState::Playing;
        true
    }

    /// Validate and apply a stop transition (Playing or Paused -> Stopped)
    pub fn try_stop(&mut self) -> bool {
        if self.state == SoundState::Stopped {
            return false;
        }
        self.state = SoundState::Stopped;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport() -> Transport {
        Transport::new(SoundConfig::default(), 10.0)
    }

    #[test]
    fn test_initial_state() {
        let t = transport();
        assert_eq!(t.state(), SoundState::Stopped);
        assert_eq!(t.duration(), 10.0);
        assert_eq!(t.total_duration(), 10.0);
    }

    #[test]
    fn test_pause_requires_playing() {
        let mut t = transport();
        assert!(!t.try_pause());
        assert_eq!(t.state(), SoundState::Stopped);

        assert!(t.try_begin_play(None, None));
        assert!(t.try_pause());
        assert_eq!(t.state(), SoundState::Paused);
    }

    #[test]
    fn test_resume_requires_paused() {
        let mut t = transport();
        assert!(!t.try_resume());

        t.try_begin_play(None, None);
        assert!(!t.try_resume());

        t.try_pause();
        assert!(t.try_resume());
        assert_eq!(t.state(), SoundState::Playing);
    }

    #[test]
    fn test_stop_from_playing_and_paused() {
        let mut t = transport();
        assert!(!t.try_stop());

        t.try_begin_play(None, None);
        assert!(t.try_stop());

        t.try_begin_play(None, None);
        t.try_pause();
        assert!(t.try_stop());
        assert_eq!(t.state(), SoundState::Stopped);
    }

    #[test]
    fn test_replay_restarts() {
        let mut t = transport();
        assert!(t.try_begin_play(None, None));
        assert!(t.try_begin_play(None, None));
        assert_eq!(t.state(), SoundState::Playing);
    }

    #[test]
    fn test_unknown_marker_rejected() {
        let mut t = transport();
        assert!(!t.try_begin_play(Some("nope"), None));
        assert_eq!(t.state(), SoundState::Stopped);
        assert!(t.current_marker().is_none());
    }

    #[test]
    fn test_marker_duration_bounds_playback() {
        let mut t = transport();
        assert!(t.add_marker(Marker::new("intro", 1.0).with_duration(2.5)));
        assert!(t.add_marker(Marker::new("tail", 8.0)));

        assert!(t.try_begin_play(Some("intro"), None));
        assert_eq!(t.duration(), 2.5);
        assert_eq!(t.current_marker().unwrap().start, 1.0);

        assert!(t.try_begin_play(Some("tail"), None));
        assert_eq!(t.duration(), 10.0);
    }

    #[test]
    fn test_duplicate_marker_rejected() {
        let mut t = transport();
        assert!(t.add_marker(Marker::new("intro", 0.0)));
        assert!(!t.add_marker(Marker::new("intro", 1.0)));
        assert!(!t.add_marker(Marker::new("", 0.0)));
    }

    #[test]
    fn test_config_precedence() {
        let base = SoundConfig {
            volume: 0.3,
            ..SoundConfig::default()
        };
        let marker_config = SoundConfig {
            volume: 0.6,
            ..SoundConfig::default()
        };
        let override_config = SoundConfig {
            volume: 0.9,
            ..SoundConfig::default()
        };

        let mut t = Transport::new(base, 10.0);
        t.add_marker(Marker::new("loud", 0.0).with_config(marker_config));

        t.try_begin_play(None, None);
        assert_eq!(t.current_config().volume, 0.3);

        t.try_begin_play(Some("loud"), None);
        assert_eq!(t.current_config().volume, 0.6);

        t.try_begin_play(Some("loud"), Some(&override_config));
        assert_eq!(t.current_config().volume, 0.9);
    }
}
