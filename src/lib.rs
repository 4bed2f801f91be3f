//! Matterball - falling balls that bounce, jostle and annihilate
//!
//! Core modules:
//! - `sim`: Fixed timestep physics (integration, walls, pairwise forces, annihilation)
//! - `audio`: Sound trigger boundary (the core only fires effects, never plays them)
//! - `config`: Data-driven physics tuning and presets
//! - `driver`: Frame pacing, warm-up and input handling around the tick
//! - `error`: Error type for the fallible edges (config, spawning)

pub mod audio;
pub mod config;
pub mod driver;
pub mod error;
pub mod sim;

pub use audio::{AudioSink, Mixer, NullAudio, SoundEffect, SoundLog};
pub use config::{EnergyLossPolicy, Preset, SimConfig};
pub use driver::{FrameDriver, Sandbox};
pub use error::{Error, Result};

use glam::Vec3;

/// Simulation constants shared by every preset
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta the driver will accumulate
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Seconds of rendering before physics starts
    pub const WARMUP_SECS: f32 = 1.0;

    /// Ball diameter in arena units
    pub const BALL_SIZE: f32 = 0.1;
    /// Arena bounds (unit square)
    pub const ARENA_FLOOR: f32 = -1.0;
    pub const ARENA_LEFT: f32 = -1.0;
    pub const ARENA_RIGHT: f32 = 1.0;

    /// Downward gravity (arena units/s²)
    pub const GRAVITY: f32 = 1.0;
    /// Wall restitution
    pub const RESTITUTION: f32 = 0.9;
    /// Overlap repulsion constant
    pub const FORCE_CONSTANT: f32 = 0.3;
    /// Distance substituted for exactly coincident balls
    pub const MIN_CONTACT_DISTANCE: f32 = 0.01;
    /// Explosion impulse scale
    pub const EXPLOSION_FORCE: f32 = 0.05;

    /// Impacts below this speed are silent
    pub const SOUND_SPEED_THRESHOLD: f32 = 0.5;

    /// Total mechanical energy below which slop damping kicks in
    pub const SLOP_ENERGY_THRESHOLD: f32 = 0.005;
    /// Fraction of velocity removed per second once resting
    pub const SLOP_DAMPING: f32 = 0.9;

    /// Default spawn mass
    pub const DEFAULT_MASS: f32 = 1.0;
}

/// Normalize, mapping the zero vector to itself instead of NaN
#[inline]
pub fn norm(v: Vec3) -> Vec3 {
    if v == Vec3::ZERO {
        return Vec3::ZERO;
    }
    v / v.length()
}

/// Squared distance in the simulation plane (z is ignored)
#[inline]
pub fn planar_distance_squared(a: Vec3, b: Vec3) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

/// Angle between two velocity directions, in [0, π].
///
/// NaN when either vector is zero: there is no direction to compare.
#[inline]
pub fn direction_angle(a: Vec3, b: Vec3) -> f32 {
    let cos = a.dot(b) / (a.length() * b.length());
    cos.clamp(-1.0, 1.0).acos()
}

/// Volume for an impact at `speed`: silent below the threshold, full at +1
#[inline]
pub fn impact_volume(speed: f32) -> f32 {
    (speed - consts::SOUND_SPEED_THRESHOLD).max(0.0).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn norm_of_zero_is_zero() {
        assert_eq!(norm(Vec3::ZERO), Vec3::ZERO);
        let n = norm(Vec3::new(3.0, 4.0, 0.0));
        assert!((n.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn direction_angle_degenerate_is_nan() {
        assert!(direction_angle(Vec3::ZERO, Vec3::X).is_nan());
        let a = direction_angle(Vec3::X, -Vec3::X);
        assert!((a - std::f32::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn impact_volume_is_clamped() {
        assert_eq!(impact_volume(0.2), 0.0);
        assert!((impact_volume(1.0) - 0.5).abs() < 1e-6);
        assert_eq!(impact_volume(10.0), 1.0);
    }
}
