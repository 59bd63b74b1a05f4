//! Buffer source nodes
//!
//! A buffer source is one continuous playback segment: it plays a span of
//! decoded audio from an offset for a duration, exactly once. It is
//! immutable after `start` apart from its rate and detune parameters, and
//! terminates either through an explicit [`BufferSourceNode::stop`] or by
//! running out of data. The two endings are indistinguishable to the node
//! itself; both deliver the completion callback on the context's dispatch
//! path.

use std::sync::Arc;

use crate::error::AudioError;
use crate::graph::buffer::AudioBuffer;
use crate::graph::context::ContextShared;
use crate::graph::gain::GainNode;
use crate::graph::param::AudioParam;
use crate::graph::NodeId;

/// One continuous playback segment of a decoded buffer
pub struct BufferSourceNode {
    id: NodeId,
    buffer: Arc<AudioBuffer>,
    playback_rate: AudioParam,
    detune: Option<AudioParam>,
    ctx: Arc<ContextShared>,
    started: bool,
    start_offset: f64,
}

impl BufferSourceNode {
    pub(crate) fn new(ctx: Arc<ContextShared>, buffer: Arc<AudioBuffer>) -> Self {
        let id = ctx.alloc_node_id();
        let playback_rate = AudioParam::new(1.0);
        let detune = ctx.supports_detune().then(|| AudioParam::new(0.0));

        ctx.register_source(id, playback_rate.clone(), detune.clone());

        Self {
            id,
            buffer,
            playback_rate,
            detune,
            ctx,
            started: false,
            start_offset: 0.0,
        }
    }

    /// Get this node's graph handle
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Get the decoded data this source plays from
    pub fn buffer(&self) -> &Arc<AudioBuffer> {
        &self.buffer
    }

    /// Get the playback-rate parameter (default 1.0)
    pub fn playback_rate(&self) -> &AudioParam {
        &self.playback_rate
    }

    /// Get the detune parameter in cents, if the context supports detuning
    pub fn detune(&self) -> Option<&AudioParam> {
        self.detune.as_ref()
    }

    /// Route this node's output into a gain node
    pub fn connect(&self, target: &GainNode) {
        self.ctx.connect(self.id, target.id());
    }

    /// Register the completion callback
    ///
    /// The callback runs on the context's dispatch path once the source
    /// terminates, whether by explicit stop or natural end of data. It must
    /// not re-enter the graph; raise a flag and let the main loop consume it.
    pub fn set_on_ended<F>(&self, callback: F)
    where
        F: FnOnce(NodeId) + Send + 'static,
    {
        self.ctx.set_source_on_ended(self.id, Box::new(callback));
    }

    /// Start playback at `offset` seconds into the buffer for `duration`
    /// seconds of media time
    ///
    /// `when` is accepted for call-site parity with scheduled playback and
    /// means "now" for any time not in the future. The duration is clamped
    /// to the data remaining past the offset.
    ///
    /// # Errors
    /// - `SourceAlreadyStarted` if `start` was already called; a segment
    ///   plays at most once
    pub fn start(&mut self, when: f64, offset: f64, duration: f64) -> Result<(), AudioError> {
        let _ = when;
        if self.started {
            return Err(AudioError::SourceAlreadyStarted);
        }
        self.started = true;
        self.start_offset = offset.max(0.0);

        let remaining = (self.buffer.duration() - self.start_offset).max(0.0);
        self.ctx.start_source(self.id, duration.min(remaining));
        Ok(())
    }

    /// Stop playback and release this segment in the host graph
    ///
    /// Idempotent; stopping a source that never started just deregisters it.
    pub fn stop(&mut self) {
        self.ctx.stop_source(self.id);
    }

    /// Offset in seconds the segment was started at
    pub fn start_offset(&self) -> f64 {
        self.start_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::AudioContext;

    fn test_buffer() -> Arc<AudioBuffer> {
        Arc::new(AudioBuffer::silent(2.0, 1, 1000))
    }

    #[test]
    fn test_double_start_rejected() {
        let ctx = AudioContext::new();
        let mut source = ctx.create_buffer_source(test_buffer());

        assert!(source.start(0.0, 0.0, 2.0).is_ok());
        assert!(matches!(
            source.start(0.0, 0.0, 2.0),
            Err(AudioError::SourceAlreadyStarted)
        ));
    }

    #[test]
    fn test_stop_without_start_is_silent() {
        let ctx = AudioContext::new();
        let mut source = ctx.create_buffer_source(test_buffer());
        source.stop();
        // No callback, no panic.
        ctx.advance(1.0);
    }

    #[test]
    fn test_start_records_offset() {
        let ctx = AudioContext::new();
        let mut source = ctx.create_buffer_source(test_buffer());
        source.start(0.0, 0.75, 1.25).unwrap();
        assert_eq!(source.start_offset(), 0.75);
    }
}
