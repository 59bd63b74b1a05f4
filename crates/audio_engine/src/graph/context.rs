//! Audio context: playback clock, node factory and source dispatch
//!
//! The context stands in for the host audio engine. It owns the real-time
//! clock, records which nodes are wired to which, and tracks how far each
//! started buffer source has progressed through its media. The host loop
//! calls [`AudioContext::advance`] once per tick; completion callbacks for
//! sources that ended since the previous tick (naturally or through an
//! explicit stop) are delivered from inside that call.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::graph::buffer::AudioBuffer;
use crate::graph::gain::GainNode;
use crate::graph::param::AudioParam;
use crate::graph::source::BufferSourceNode;
use crate::graph::NodeId;

/// Completion callback invoked when a buffer source terminates
///
/// Runs on the context's dispatch path, not on the thread that issued the
/// transport call. Callbacks must not re-enter the context; flag or queue
/// the result and consume it from the main loop instead.
pub(crate) type EndedCallback = Box<dyn FnOnce(NodeId) + Send>;

/// Configuration for an audio context
#[derive(Debug, Clone)]
pub struct AudioContextConfig {
    /// Whether buffer sources expose a detune parameter
    ///
    /// Some host implementations predate detune support; sounds must treat
    /// the parameter as optional.
    pub supports_detune: bool,
}

impl Default for AudioContextConfig {
    fn default() -> Self {
        Self {
            supports_detune: true,
        }
    }
}

/// Progress state for one registered buffer source
pub(crate) struct SourceState {
    /// Rate parameter shared with the node handle
    playback_rate: AudioParam,
    /// Detune parameter shared with the node handle, if supported
    detune: Option<AudioParam>,
    /// Media seconds scheduled to play once started
    media_duration: f64,
    /// Media seconds consumed so far
    consumed: f64,
    /// Set once `start` was issued
    playing: bool,
    /// Completion callback, taken when the source terminates
    on_ended: Option<EndedCallback>,
}

impl SourceState {
    /// Media consumption rate in seconds per wall-clock second
    fn effective_rate(&self) -> f64 {
        let rate = f64::from(self.playback_rate.value());
        let cents = self.detune.as_ref().map_or(0.0, |d| f64::from(d.value()));
        (rate * 2.0_f64.powf(cents / 1200.0)).max(0.0)
    }
}

/// Shared interior of an audio context
pub(crate) struct ContextShared {
    /// Playback clock in seconds, stored as f64 bits
    clock_bits: AtomicU64,
    /// Next node handle
    next_node_id: AtomicU64,
    /// Whether created buffer sources carry a detune parameter
    supports_detune: bool,
    /// Recorded node connections (from, to)
    topology: Mutex<Vec<(NodeId, NodeId)>>,
    /// Registered buffer sources by node handle
    sources: Mutex<HashMap<NodeId, SourceState>>,
    /// Completions waiting for the next dispatch
    pending_ended: Mutex<Vec<(NodeId, EndedCallback)>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ContextShared {
    fn new(config: &AudioContextConfig) -> Self {
        Self {
            clock_bits: AtomicU64::new(0.0_f64.to_bits()),
            next_node_id: AtomicU64::new(0),
            supports_detune: config.supports_detune,
            topology: Mutex::new(Vec::new()),
            sources: Mutex::new(HashMap::new()),
            pending_ended: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn current_time(&self) -> f64 {
        f64::from_bits(self.clock_bits.load(Ordering::Acquire))
    }

    pub(crate) fn alloc_node_id(&self) -> NodeId {
        NodeId::from_raw(self.next_node_id.fetch_add(1, Ordering::Relaxed))
    }

    pub(crate) fn connect(&self, from: NodeId, to: NodeId) {
        let mut topology = lock(&self.topology);
        if !topology.contains(&(from, to)) {
            topology.push((from, to));
        }
    }

    pub(crate) fn is_connected(&self, from: NodeId, to: NodeId) -> bool {
        lock(&self.topology).contains(&(from, to))
    }

    pub(crate) fn supports_detune(&self) -> bool {
        self.supports_detune
    }

    pub(crate) fn register_source(
        &self,
        id: NodeId,
        playback_rate: AudioParam,
        detune: Option<AudioParam>,
    ) {
        let state = SourceState {
            playback_rate,
            detune,
            media_duration: 0.0,
            consumed: 0.0,
            playing: false,
            on_ended: None,
        };
        lock(&self.sources).insert(id, state);
    }

    pub(crate) fn set_source_on_ended(&self, id: NodeId, callback: EndedCallback) {
        if let Some(state) = lock(&self.sources).get_mut(&id) {
            state.on_ended = Some(callback);
        }
    }

    /// Begin playback of a registered source
    ///
    /// `media_duration` is already clamped to the data remaining past the
    /// start offset by the node handle.
    pub(crate) fn start_source(&self, id: NodeId, media_duration: f64) {
        if let Some(state) = lock(&self.sources).get_mut(&id) {
            state.media_duration = media_duration.max(0.0);
            state.consumed = 0.0;
            state.playing = true;
        }
    }

    /// Stop and deregister a source
    ///
    /// The completion callback is queued exactly as for a natural end; a
    /// stopped source is indistinguishable from one that ran out of data.
    pub(crate) fn stop_source(&self, id: NodeId) {
        let removed = lock(&self.sources).remove(&id);
        if let Some(state) = removed {
            if state.playing {
                if let Some(callback) = state.on_ended {
                    lock(&self.pending_ended).push((id, callback));
                }
            }
        }
    }

    fn advance(&self, dt: f64) {
        let now = self.current_time() + dt.max(0.0);
        self.clock_bits.store(now.to_bits(), Ordering::Release);

        // Advance playing sources and collect the ones that ran out of data.
        let mut ended = Vec::new();
        {
            let mut sources = lock(&self.sources);
            for (id, state) in sources.iter_mut() {
                if !state.playing {
                    continue;
                }
                state.consumed += dt * state.effective_rate();
                if state.consumed >= state.media_duration {
                    ended.push(*id);
                }
            }
            for id in ended {
                if let Some(state) = sources.remove(&id) {
                    if let Some(callback) = state.on_ended {
                        lock(&self.pending_ended).push((id, callback));
                    }
                }
            }
        }

        // Deliver completions outside the source lock so callbacks never
        // observe the registry mid-update.
        let pending: Vec<(NodeId, EndedCallback)> = lock(&self.pending_ended).drain(..).collect();
        for (id, callback) in pending {
            callback(id);
        }
    }
}

/// Handle to the host audio engine's graph and clock
///
/// Cheap to share; the manager owns one and hands it to sounds by reference.
pub struct AudioContext {
    shared: Arc<ContextShared>,
    destination: GainNode,
}

impl AudioContext {
    /// Create a context with default configuration
    pub fn new() -> Self {
        Self::with_config(&AudioContextConfig::default())
    }

    /// Create a context with the given configuration
    pub fn with_config(config: &AudioContextConfig) -> Self {
        let shared = Arc::new(ContextShared::new(config));
        let destination = GainNode::new(Arc::clone(&shared));
        Self {
            shared,
            destination,
        }
    }

    /// Get the playback clock in seconds
    pub fn current_time(&self) -> f64 {
        self.shared.current_time()
    }

    /// Get the output destination node all audible signal routes into
    pub fn destination(&self) -> &GainNode {
        &self.destination
    }

    /// Create a gain node
    pub fn create_gain(&self) -> GainNode {
        GainNode::new(Arc::clone(&self.shared))
    }

    /// Create a buffer source bound to decoded audio data
    pub fn create_buffer_source(&self, buffer: Arc<AudioBuffer>) -> BufferSourceNode {
        BufferSourceNode::new(Arc::clone(&self.shared), buffer)
    }

    /// Check whether a connection between two nodes was recorded
    pub fn is_connected(&self, from: NodeId, to: NodeId) -> bool {
        self.shared.is_connected(from, to)
    }

    /// Advance the playback clock by `dt` seconds
    ///
    /// Called once per tick by the host loop. Sources that terminated since
    /// the previous tick have their completion callbacks delivered from
    /// inside this call.
    pub fn advance(&self, dt: f64) {
        self.shared.advance(dt);
    }
}

impl Default for AudioContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::sync::atomic::AtomicBool;

    fn test_buffer(duration_secs: f64) -> Arc<AudioBuffer> {
        Arc::new(AudioBuffer::silent(duration_secs, 1, 1000))
    }

    #[test]
    fn test_clock_advances() {
        let ctx = AudioContext::new();
        assert_relative_eq!(ctx.current_time(), 0.0);

        ctx.advance(0.25);
        ctx.advance(0.25);
        assert_relative_eq!(ctx.current_time(), 0.5);
    }

    #[test]
    fn test_connection_recorded_once() {
        let ctx = AudioContext::new();
        let a = ctx.create_gain();
        let b = ctx.create_gain();

        a.connect(&b);
        a.connect(&b);

        assert!(ctx.is_connected(a.id(), b.id()));
        assert!(!ctx.is_connected(b.id(), a.id()));
    }

    #[test]
    fn test_natural_end_fires_callback() {
        let ctx = AudioContext::new();
        let fired = Arc::new(AtomicBool::new(false));

        let mut source = ctx.create_buffer_source(test_buffer(1.0));
        let flag = Arc::clone(&fired);
        source.set_on_ended(move |_| flag.store(true, Ordering::Release));
        source.start(0.0, 0.0, 1.0).unwrap();

        ctx.advance(0.5);
        assert!(!fired.load(Ordering::Acquire));

        ctx.advance(0.6);
        assert!(fired.load(Ordering::Acquire));
    }

    #[test]
    fn test_stop_queues_callback_for_next_tick() {
        let ctx = AudioContext::new();
        let fired = Arc::new(AtomicBool::new(false));

        let mut source = ctx.create_buffer_source(test_buffer(1.0));
        let flag = Arc::clone(&fired);
        source.set_on_ended(move |_| flag.store(true, Ordering::Release));
        source.start(0.0, 0.0, 1.0).unwrap();

        source.stop();
        assert!(!fired.load(Ordering::Acquire));

        ctx.advance(0.01);
        assert!(fired.load(Ordering::Acquire));
    }

    #[test]
    fn test_rate_scales_consumption() {
        let ctx = AudioContext::new();
        let fired = Arc::new(AtomicBool::new(false));

        let mut source = ctx.create_buffer_source(test_buffer(2.0));
        let flag = Arc::clone(&fired);
        source.set_on_ended(move |_| flag.store(true, Ordering::Release));
        source.playback_rate().set_value_at_time(2.0, 0.0);
        source.start(0.0, 0.0, 2.0).unwrap();

        // 2 seconds of media at double speed finish in one second.
        ctx.advance(1.1);
        assert!(fired.load(Ordering::Acquire));
    }

    #[test]
    fn test_detune_unsupported_context() {
        let config = AudioContextConfig {
            supports_detune: false,
        };
        let ctx = AudioContext::with_config(&config);
        let source = ctx.create_buffer_source(test_buffer(1.0));
        assert!(source.detune().is_none());
    }
}
