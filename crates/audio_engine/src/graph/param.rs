//! Scalar automation parameters
//!
//! Parameters are the write targets for gain, playback-rate and detune
//! values. They are shared between the node handle held by a sound and the
//! context's dispatch side, so the value lives behind an atomic.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// A scalar parameter on an audio node
///
/// Writes take effect immediately; no ramping is performed.
#[derive(Debug, Clone)]
pub struct AudioParam {
    bits: Arc<AtomicU32>,
}

impl AudioParam {
    /// Create a parameter with an initial value
    pub(crate) fn new(initial: f32) -> Self {
        Self {
            bits: Arc::new(AtomicU32::new(initial.to_bits())),
        }
    }

    /// Get the current value
    pub fn value(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Acquire))
    }

    /// Set the value at the given context time
    ///
    /// The write is applied immediately without ramping; `when` is accepted
    /// for call-site parity with scheduled parameter APIs and a time in the
    /// past (including 0.0) means "now".
    pub fn set_value_at_time(&self, value: f32, when: f64) {
        let _ = when;
        self.bits.store(value.to_bits(), Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_roundtrip() {
        let param = AudioParam::new(1.0);
        assert_eq!(param.value(), 1.0);

        param.set_value_at_time(0.25, 0.0);
        assert_eq!(param.value(), 0.25);
    }

    #[test]
    fn test_shared_across_clones() {
        let param = AudioParam::new(1.0);
        let other = param.clone();

        other.set_value_at_time(0.5, 0.0);
        assert_eq!(param.value(), 0.5);
    }
}
