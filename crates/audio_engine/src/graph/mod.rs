//! Native audio graph abstraction
//!
//! The playback layer maps sounds onto a small graph of nodes: persistent
//! gain nodes for mute/volume control and short-lived buffer-source nodes,
//! one per continuous playback segment. No signal processing happens here;
//! nodes hold parameter state and the context tracks topology, the playback
//! clock, and source progress. The host loop drives the clock through
//! [`AudioContext::advance`].

pub mod buffer;
pub mod context;
pub mod gain;
pub mod param;
pub mod source;

pub use buffer::AudioBuffer;
pub use context::{AudioContext, AudioContextConfig};
pub use gain::GainNode;
pub use param::AudioParam;
pub use source::BufferSourceNode;

/// Handle to a node in the audio graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u64);

impl NodeId {
    /// Create an invalid node handle
    pub fn invalid() -> Self {
        Self(u64::MAX)
    }

    /// Check if this handle is valid
    pub fn is_valid(&self) -> bool {
        self.0 != u64::MAX
    }

    /// Raw handle value, usable as an atomic slot
    pub fn raw(&self) -> u64 {
        self.0
    }

    pub(crate) fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_handle() {
        let id = NodeId::invalid();
        assert!(!id.is_valid());
        assert!(NodeId::from_raw(0).is_valid());
    }
}
