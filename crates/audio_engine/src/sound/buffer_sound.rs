//! Buffer-source sound playback
//!
//! Maps the transport state machine onto the native audio graph: two
//! persistent gain nodes (mute and volume) wired to the manager's
//! destination at construction, and one buffer source recreated per
//! playback segment. The sound itself does no audio work; it plumbs
//! configuration values onto the nodes and keeps the elapsed-time
//! bookkeeping straight.
//!
//! # Completion handling
//!
//! The host graph delivers the segment completion callback on its own
//! dispatch context, not on the thread driving the transport calls. The
//! callback therefore never mutates the sound: it raises an atomic flag,
//! and only when the completed segment is still the live one. The per-tick
//! [`BufferSound::update`] consumes the flag and performs the actual
//! `stop()` on the main thread, so a completion can never interleave with
//! a concurrent `play()`/`stop()`.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use crate::graph::{AudioBuffer, BufferSourceNode, GainNode, NodeId};
use crate::manager::SoundManager;
use crate::sound::config::{Marker, SoundConfig};
use crate::sound::transport::{SoundState, Transport};

/// Lowest representable detune in cents
const DETUNE_MIN: f32 = -1200.0;
/// Highest representable detune in cents
const DETUNE_MAX: f32 = 1200.0;

/// A sound playing decoded audio through buffer-source segments
pub struct BufferSound {
    /// Cache key this sound was created from
    key: String,
    /// Decoded audio data; `None` leaves the sound unusable
    buffer: Option<Arc<AudioBuffer>>,
    /// Transport state machine and shared playback fields
    transport: Transport,
    /// Gain node toggled between 0 and 1 for muting
    mute_node: GainNode,
    /// Gain node carrying the volume setting
    volume_node: GainNode,
    /// Current playback segment; at most one exists at a time
    source: Option<BufferSourceNode>,
    /// Context time the previous playback started at
    start_time: f64,
    /// Elapsed playback seconds at the time `pause()` was called
    paused_time: f64,
    /// Raised by the completion callback, consumed by `update()`
    has_ended: Arc<AtomicBool>,
    /// Raw id of the live segment; completions for any other id are stale
    live_source: Arc<AtomicU64>,
}

impl BufferSound {
    /// Create a sound bound to a cached buffer
    ///
    /// A missing cache key is logged and leaves the sound unusable: the
    /// gain nodes exist and are wired, but every transport call rejects.
    pub fn new(manager: &SoundManager, key: &str, config: SoundConfig) -> Self {
        let buffer = manager.cache().get(key);
        if buffer.is_none() {
            log::error!("No audio loaded in cache with key '{}'", key);
        }

        let mute_node = manager.context().create_gain();
        let volume_node = manager.context().create_gain();
        mute_node.connect(&volume_node);
        volume_node.connect(manager.destination());

        let total_duration = buffer.as_ref().map_or(0.0, |b| b.duration());

        let mut sound = Self {
            key: key.to_string(),
            buffer,
            transport: Transport::new(config, total_duration),
            mute_node,
            volume_node,
            source: None,
            start_time: 0.0,
            paused_time: 0.0,
            has_ended: Arc::new(AtomicBool::new(false)),
            live_source: Arc::new(AtomicU64::new(NodeId::invalid().raw())),
        };
        sound.set_mute(config.mute);
        sound.set_volume(config.volume);
        sound
    }

    /// Start playback, optionally from a named marker
    ///
    /// Returns `false` without side effects when the transport rejects the
    /// transition or the sound has no buffer. Playing while already playing
    /// restarts from the marker offset.
    pub fn play(
        &mut self,
        marker_name: Option<&str>,
        config: Option<&SoundConfig>,
        manager: &SoundManager,
    ) -> bool {
        if self.buffer.is_none() {
            return false;
        }
        if !self.transport.try_begin_play(marker_name, config) {
            return false;
        }

        self.stop_and_release_source();
        // TODO: fold SoundConfig::seek into the offset once the engine
        // defines seek semantics for sounds
        let offset = self.transport.current_marker().map_or(0.0, |m| m.start);
        let duration = self.transport.duration();
        self.create_and_start_source(offset, duration, manager);
        self.start_time = manager.context().current_time();
        self.paused_time = 0.0;
        true
    }

    /// Pause playback, remembering the elapsed offset
    pub fn pause(&mut self, manager: &SoundManager) -> bool {
        if !self.transport.try_pause() {
            return false;
        }

        self.stop_and_release_source();
        self.paused_time = manager.context().current_time() - self.start_time;
        true
    }

    /// Resume playback from the paused offset
    pub fn resume(&mut self, manager: &SoundManager) -> bool {
        if !self.transport.try_resume() {
            return false;
        }

        let marker_start = self.transport.current_marker().map_or(0.0, |m| m.start);
        let offset = marker_start + self.paused_time;
        let duration = self.transport.duration() - self.paused_time;
        self.create_and_start_source(offset, duration, manager);
        self.start_time = manager.context().current_time() - self.paused_time;
        self.paused_time = 0.0;
        true
    }

    /// Stop playback and reset the elapsed-time bookkeeping
    pub fn stop(&mut self) -> bool {
        if !self.transport.try_stop() {
            return false;
        }

        self.stop_and_release_source();
        self.start_time = 0.0;
        self.paused_time = 0.0;
        true
    }

    /// Per-tick poll driven by the game loop
    ///
    /// Consumes the end-of-playback flag raised by the completion callback
    /// and normalizes the sound to the stopped state.
    pub fn update(&mut self) {
        if self.has_ended.swap(false, Ordering::AcqRel) {
            self.stop();
        }
    }

    /// Release the current segment
    ///
    /// The gain nodes stay behind; their lifecycle belongs to the host
    /// graph.
    pub fn destroy(&mut self) {
        self.stop_and_release_source();
    }

    /// True iff the mute gain currently outputs silence
    pub fn mute(&self) -> bool {
        self.mute_node.gain().value() == 0.0
    }

    /// Mute or unmute, writing the mute gain immediately with no ramp
    pub fn set_mute(&mut self, value: bool) {
        self.transport.config_mut().mute = value;
        self.mute_node
            .gain()
            .set_value_at_time(if value { 0.0 } else { 1.0 }, 0.0);
    }

    /// Current volume as carried by the volume gain
    pub fn volume(&self) -> f32 {
        self.volume_node.gain().value()
    }

    /// Set the volume, writing the volume gain immediately with no ramp
    pub fn set_volume(&mut self, value: f32) {
        self.transport.config_mut().volume = value;
        self.volume_node.gain().set_value_at_time(value, 0.0);
    }

    /// Configured playback rate
    pub fn rate(&self) -> f32 {
        self.transport.current_config().rate
    }

    /// Set the playback rate
    ///
    /// The live segment, if any, is updated immediately with the
    /// manager-wide rate multiplier applied.
    pub fn set_rate(&mut self, value: f32, manager: &SoundManager) {
        self.transport.config_mut().rate = value;
        if let Some(source) = &self.source {
            source
                .playback_rate()
                .set_value_at_time(value * manager.rate(), 0.0);
        }
    }

    /// Configured detune in cents
    pub fn detune(&self) -> f32 {
        self.transport.current_config().detune
    }

    /// Set the detune in cents
    ///
    /// The live segment, if it supports detuning, is updated immediately
    /// with the manager-wide detune added; the applied value is clamped to
    /// [-1200, 1200] cents, never rejected.
    pub fn set_detune(&mut self, value: f32, manager: &SoundManager) {
        self.transport.config_mut().detune = value;
        if let Some(source) = &self.source {
            if let Some(param) = source.detune() {
                let applied = (value + manager.detune()).clamp(DETUNE_MIN, DETUNE_MAX);
                param.set_value_at_time(applied, 0.0);
            }
        }
    }

    /// Get the cache key this sound was created from
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Get the current playback state
    pub fn state(&self) -> SoundState {
        self.transport.state()
    }

    /// Check if the sound is currently playing
    pub fn is_playing(&self) -> bool {
        self.transport.state() == SoundState::Playing
    }

    /// Check if the sound is currently paused
    pub fn is_paused(&self) -> bool {
        self.transport.state() == SoundState::Paused
    }

    /// Duration of the current playback segment in seconds
    pub fn duration(&self) -> f64 {
        self.transport.duration()
    }

    /// Duration of the whole decoded data in seconds
    pub fn total_duration(&self) -> f64 {
        self.transport.total_duration()
    }

    /// Register a marker on this sound
    pub fn add_marker(&mut self, marker: Marker) -> bool {
        self.transport.add_marker(marker)
    }

    /// Replace an existing marker
    pub fn update_marker(&mut self, marker: Marker) -> bool {
        self.transport.update_marker(marker)
    }

    /// Remove a marker by name
    pub fn remove_marker(&mut self, name: &str) -> Option<Marker> {
        self.transport.remove_marker(name)
    }

    /// Get the embedded transport
    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Create a fresh segment and start it at (offset, duration)
    ///
    /// Rate and detune live on the segment itself, so the stored
    /// configuration is reapplied to every new handle. The completion
    /// callback captures the live-id slot and only raises the flag when its
    /// own segment is still the tracked one.
    fn create_and_start_source(&mut self, offset: f64, duration: f64, manager: &SoundManager) {
        let buffer = match &self.buffer {
            Some(buffer) => Arc::clone(buffer),
            None => return,
        };

        let source = manager.context().create_buffer_source(buffer);
        source.connect(&self.mute_node);

        self.has_ended.store(false, Ordering::Release);
        self.live_source.store(source.id().raw(), Ordering::Release);

        let ended = Arc::clone(&self.has_ended);
        let live = Arc::clone(&self.live_source);
        source.set_on_ended(move |completed| {
            // A completion for a superseded segment is stale; only the live
            // one may raise the flag. stop() itself stays on the main
            // thread, inside update().
            if live.load(Ordering::Acquire) == completed.raw() {
                ended.store(true, Ordering::Release);
            }
        });

        self.source = Some(source);
        self.apply_config(manager);

        if let Some(source) = self.source.as_mut() {
            if let Err(err) = source.start(0.0, offset, duration) {
                log::error!("Failed to start playback segment for '{}': {}", self.key, err);
            }
        }
    }

    /// Reapply the stored configuration to the current nodes
    fn apply_config(&mut self, manager: &SoundManager) {
        let config = *self.transport.current_config();
        self.set_mute(config.mute);
        self.set_volume(config.volume);
        self.set_rate(config.rate, manager);
        self.set_detune(config.detune, manager);
    }

    /// Stop and discard the current segment, if any
    fn stop_and_release_source(&mut self) {
        if let Some(mut source) = self.source.take() {
            // Clear the live id before issuing the native stop so the
            // queued completion is already stale when it arrives.
            self.live_source
                .store(NodeId::invalid().raw(), Ordering::Release);
            source.stop();
        }
    }
}
