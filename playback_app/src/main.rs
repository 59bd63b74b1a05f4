//! Playback demo application
//!
//! Drives the transport surface of a buffer-source sound from a fixed-step
//! main loop: play, pause mid-way, resume, then let the sound run out and
//! watch the update poll normalize it back to stopped.

use audio_engine::prelude::*;

const FRAME_DT: f64 = 1.0 / 60.0;

/// Generate one second of a 440 Hz tone as a mono buffer
fn tone_buffer(sample_rate: u32) -> Result<AudioBuffer, AudioError> {
    let frames = sample_rate as usize;
    let samples: Vec<f32> = (0..frames)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            (t * 440.0 * std::f32::consts::TAU).sin() * 0.5
        })
        .collect();
    AudioBuffer::new(samples, 1, sample_rate)
}

fn main() -> Result<(), AudioError> {
    audio_engine::logging::init();

    let mut manager = SoundManager::new();
    manager.cache_mut().insert("tone", tone_buffer(48_000)?);

    let mut sound = manager.add_sound("tone", SoundConfig::default());
    sound.add_marker(Marker::new("tail", 0.5));

    log::info!("Playing 'tone' ({}s)", sound.total_duration());
    sound.play(None, None, &manager);

    let mut last_state = sound.state();
    for frame in 0..180 {
        match frame {
            20 => {
                sound.pause(&manager);
            }
            40 => {
                sound.resume(&manager);
            }
            60 => {
                sound.set_volume(0.7);
                sound.set_rate(1.25, &manager);
            }
            _ => {}
        }

        manager.context().advance(FRAME_DT);
        sound.update();

        let state = sound.state();
        if state != last_state {
            log::info!(
                "frame {:3} t={:.3}s state {:?} -> {:?}",
                frame,
                manager.context().current_time(),
                last_state,
                state
            );
            last_state = state;
        }
    }

    log::info!("Replaying from marker 'tail'");
    sound.play(Some("tail"), None, &manager);
    while sound.state() != SoundState::Stopped {
        manager.context().advance(FRAME_DT);
        sound.update();
    }
    log::info!("Done at t={:.3}s", manager.context().current_time());

    Ok(())
}
