//! Gain nodes
//!
//! A gain node applies a scalar multiplier to signal amplitude. Sounds own
//! two for their whole lifetime (mute and volume) and never tear them down;
//! node lifecycle past that point belongs to the host graph.

use std::sync::Arc;

use crate::graph::context::ContextShared;
use crate::graph::param::AudioParam;
use crate::graph::NodeId;

/// A node applying a scalar multiplier to signal amplitude
pub struct GainNode {
    id: NodeId,
    gain: AudioParam,
    ctx: Arc<ContextShared>,
}

impl GainNode {
    pub(crate) fn new(ctx: Arc<ContextShared>) -> Self {
        Self {
            id: ctx.alloc_node_id(),
            gain: AudioParam::new(1.0),
            ctx,
        }
    }

    /// Get this node's graph handle
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Get the gain parameter (default 1.0)
    pub fn gain(&self) -> &AudioParam {
        &self.gain
    }

    /// Route this node's output into another gain node
    pub fn connect(&self, target: &GainNode) {
        self.ctx.connect(self.id, target.id());
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::AudioContext;

    #[test]
    fn test_default_gain_is_unity() {
        let ctx = AudioContext::new();
        let node = ctx.create_gain();
        assert_eq!(node.gain().value(), 1.0);
    }

    #[test]
    fn test_gain_write() {
        let ctx = AudioContext::new();
        let node = ctx.create_gain();

        node.gain().set_value_at_time(0.0, 0.0);
        assert_eq!(node.gain().value(), 0.0);
    }
}
