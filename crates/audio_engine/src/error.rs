//! Error types for the audio engine

use thiserror::Error;

/// Errors raised by the audio graph and buffer plumbing
///
/// Transport precondition rejections (e.g. pausing a sound that is not
/// playing) are not errors; those calls return `false` instead.
#[derive(Debug, Error)]
pub enum AudioError {
    /// Audio buffer data was malformed (zero channels, zero sample rate, etc.)
    #[error("Invalid audio buffer: {0}")]
    InvalidBuffer(String),

    /// A buffer source can only be started once
    #[error("Buffer source was already started")]
    SourceAlreadyStarted,
}
