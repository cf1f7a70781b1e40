//! Audio sink seam.
//!
//! The simulation emits [`Sound`] triggers in its frame output; what happens
//! to them is a host concern. Mixing is out of scope for this repo, so the
//! shipped host wires up [`NullAudio`], which satisfies the surface (including
//! the start-music-once contract) without touching an audio device. A real
//! backend slots in behind the same trait.

use cart_core::frame::Sound;

pub trait AudioSink {
    /// Fire a one-shot effect.
    fn play(&mut self, sound: Sound);
    /// Start the looping background music. Idempotent; called once at game
    /// start.
    fn start_music(&mut self);
}

#[derive(Debug, Default)]
pub struct NullAudio {
    music_started: bool,
}

impl NullAudio {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AudioSink for NullAudio {
    fn play(&mut self, sound: Sound) {
        log::debug!("audio trigger: {sound:?}");
    }

    fn start_music(&mut self) {
        if !self.music_started {
            self.music_started = true;
            log::debug!("background music start requested");
        }
    }
}
