//! Sound objects and the transport state machine

pub mod buffer_sound;
pub mod config;
pub mod transport;

pub use buffer_sound::BufferSound;
pub use config::{Marker, SoundConfig};
pub use transport::{SoundState, Transport};
