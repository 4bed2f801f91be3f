//! Sound trigger boundary
//!
//! The simulation only decides *when* something should be heard and how
//! loud. Playback belongs to whatever media layer hosts the toy; it plugs in
//! through [`AudioSink`].

use serde::{Deserialize, Serialize};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Ball bounces off an arena wall
    Thump,
    /// Two balls knock together
    Clack,
    /// A matter/antimatter pair annihilates
    Annihilate,
}

impl SoundEffect {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundEffect::Thump => "thump",
            SoundEffect::Clack => "clack",
            SoundEffect::Annihilate => "annihilate",
        }
    }
}

/// Fire-and-forget playback. Volume is in `0.0..=1.0`.
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect, volume: f32);
}

/// Discards every sound
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _effect: SoundEffect, _volume: f32) {}
}

/// Records every sound (headless runs and tests)
#[derive(Debug, Default, Clone)]
pub struct SoundLog {
    pub played: Vec<(SoundEffect, f32)>,
}

impl SoundLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times `effect` was played
    pub fn count(&self, effect: SoundEffect) -> usize {
        self.played.iter().filter(|(e, _)| *e == effect).count()
    }

    pub fn clear(&mut self) {
        self.played.clear();
    }
}

impl AudioSink for SoundLog {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        log::trace!("sound {} at {:.2}", effect.as_str(), volume);
        self.played.push((effect, volume));
    }
}

/// Applies master/sfx volume and mute before forwarding to a backend
#[derive(Debug, Clone)]
pub struct Mixer<S: AudioSink> {
    backend: S,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl<S: AudioSink> Mixer<S> {
    pub fn new(backend: S) -> Self {
        Self {
            backend,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Overall gain, clamped to [0, 1]
    pub fn set_master_volume(&mut self, level: f32) {
        self.master_volume = level.clamp(0.0, 1.0);
    }

    /// Gain applied to impact effects, clamped to [0, 1]
    pub fn set_sfx_volume(&mut self, level: f32) {
        self.sfx_volume = level.clamp(0.0, 1.0);
    }

    /// Silences every effect without touching the stored levels
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut S {
        &mut self.backend
    }

    fn gain(&self) -> f32 {
        if self.muted {
            return 0.0;
        }
        self.master_volume * self.sfx_volume
    }
}

impl<S: AudioSink> AudioSink for Mixer<S> {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        let scaled = self.gain() * volume.clamp(0.0, 1.0);
        if scaled > 0.0 {
            self.backend.play(effect, scaled);
        }
    }
}
