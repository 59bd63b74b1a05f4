//! # Audio Engine
//!
//! Buffer-source audio playback layer for a modular game engine.
//!
//! ## Features
//!
//! - **Transport state machine**: play/pause/resume/stop with shared
//!   precondition checks
//! - **Native graph plumbing**: persistent mute/volume gain nodes, one
//!   buffer-source segment per continuous playback run
//! - **Markers**: named offset/duration regions within a sound
//! - **Deterministic completion**: segment-end notifications are flagged by
//!   the graph's dispatch context and consumed by the per-tick update poll
//!
//! ## Quick Start
//!
//! ```rust
//! use audio_engine::prelude::*;
//!
//! fn main() -> Result<(), AudioError> {
//!     let mut manager = SoundManager::new();
//!     manager
//!         .cache_mut()
//!         .insert("beep", AudioBuffer::silent(1.0, 2, 48_000));
//!
//!     let mut sound = manager.add_sound("beep", SoundConfig::default());
//!     sound.play(None, None, &manager);
//!
//!     // Per-frame driver:
//!     manager.context().advance(1.0 / 60.0);
//!     sound.update();
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod cache;
pub mod graph;
pub mod logging;
pub mod manager;
pub mod sound;

mod error;

pub use error::AudioError;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        cache::AudioCache,
        graph::{AudioBuffer, AudioContext, AudioContextConfig},
        manager::SoundManager,
        sound::{BufferSound, Marker, SoundConfig, SoundState},
        AudioError,
    };
}
