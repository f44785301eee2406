//! Sound effect contract
//!
//! The simulation only names the effect to play; mixing and playback belong
//! to whatever implements `AudioSink`.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Ball hits a wall, block or the platform
    Hit,
    /// Ball fell into the loss region
    Lose,
    /// Level cleared
    Win,
    /// Ball launched
    Launch,
}

impl SoundEffect {
    /// Stable identifier for asset lookup
    pub fn id(&self) -> &'static str {
        match self {
            SoundEffect::Hit => "hit",
            SoundEffect::Lose => "lose",
            SoundEffect::Win => "win",
            SoundEffect::Launch => "launch",
        }
    }
}

pub trait AudioSink {
    fn play(&self, effect: SoundEffect);

    /// Master volume in `[0, 1]`
    fn set_master_volume(&self, _volume: f32) {}
}

/// Audio sink for headless runs: logs and counts what would have played
#[derive(Debug)]
pub struct HeadlessAudio {
    master_volume: Cell<f32>,
    played: RefCell<HashMap<SoundEffect, u32>>,
}

impl Default for HeadlessAudio {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessAudio {
    pub fn new() -> Self {
        Self {
            master_volume: Cell::new(0.8),
            played: RefCell::new(HashMap::new()),
        }
    }

    pub fn master_volume(&self) -> f32 {
        self.master_volume.get()
    }

    /// How many times `effect` was played
    pub fn play_count(&self, effect: SoundEffect) -> u32 {
        self.played.borrow().get(&effect).copied().unwrap_or(0)
    }
}

impl AudioSink for HeadlessAudio {
    fn play(&self, effect: SoundEffect) {
        *self.played.borrow_mut().entry(effect).or_insert(0) += 1;
        if self.master_volume.get() > 0.0 {
            log::debug!("Sound: {}", effect.id());
        }
    }

    fn set_master_volume(&self, volume: f32) {
        self.master_volume.set(volume.clamp(0.0, 1.0));
    }
}
