//! Physics tuning and presets
//!
//! The toy went through several iterations with different timesteps,
//! restitution and energy-loss laws. Each lives on as a [`Preset`]; any field
//! can be overridden from a JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Error, Result};

/// Named physics variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Preset {
    /// Inelastic walls, legacy energy loss, no annihilation
    Classic,
    /// Elastic walls with a ceiling, no energy loss, 60 Hz
    Elastic,
    /// Full matter/antimatter toy
    #[default]
    Annihilation,
}

impl Preset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Classic => "Classic",
            Preset::Elastic => "Elastic",
            Preset::Annihilation => "Annihilation",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(Preset::Classic),
            "elastic" => Some(Preset::Elastic),
            "annihilation" | "default" => Some(Preset::Annihilation),
            _ => None,
        }
    }
}

/// How pairwise contacts bleed energy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EnergyLossPolicy {
    /// No loss (factor 1)
    None,
    /// `acos(v̂₁·v̂₂) / π`
    Legacy,
    /// `sqrt((π − acos(v̂₁·v̂₂)) / π)`
    #[default]
    Angular,
}

impl EnergyLossPolicy {
    /// Loss factor for one contact given the angle between velocity directions.
    ///
    /// NaN in, NaN out; callers skip non-finite factors.
    pub fn factor(&self, angle: f32) -> f32 {
        use std::f32::consts::PI;
        match self {
            EnergyLossPolicy::None => 1.0,
            EnergyLossPolicy::Legacy => angle / PI,
            EnergyLossPolicy::Angular => ((PI - angle) / PI).sqrt(),
        }
    }
}

/// Arena bounds. The ceiling is optional; without one balls may leave upward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Arena {
    pub floor: f32,
    pub left: f32,
    pub right: f32,
    pub top: Option<f32>,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            floor: ARENA_FLOOR,
            left: ARENA_LEFT,
            right: ARENA_RIGHT,
            top: None,
        }
    }
}

/// Spawn balancing knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    /// Below this many live balls every kind is equally likely
    pub uniform_below: u32,
    /// Desired share of each kind (neutral, positive, negative)
    pub target: [f32; 3],
    /// Base chance points per kind
    pub base_points: [i32; 3],
    /// Chance points per unit of share deviation
    pub gain: f32,
    /// Mass given to pointer spawns
    pub default_mass: f32,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            uniform_below: 5,
            target: [0.5, 0.25, 0.25],
            base_points: [10, 10, 10],
            gain: 40.0,
            default_mass: DEFAULT_MASS,
        }
    }
}

/// Complete physics configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub preset: Preset,
    /// Fixed physics step (seconds)
    pub dt: f32,
    /// Ball diameter
    pub ball_size: f32,
    /// Downward gravity magnitude
    pub gravity: f32,
    pub restitution: f32,
    pub arena: Arena,
    pub force_constant: f32,
    pub min_contact_distance: f32,
    pub energy_loss: EnergyLossPolicy,
    /// Opposite kinds destroy each other on contact
    pub annihilation: bool,
    pub explosion_force: f32,
    pub slop_energy_threshold: f32,
    pub slop_damping: f32,
    /// Couple the wind oscillation into horizontal acceleration
    pub wind: bool,
    pub warmup_secs: f32,
    pub max_substeps: u32,
    pub spawn: SpawnTuning,
    pub master_volume: f32,
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::from_preset(Preset::Annihilation)
    }
}

impl SimConfig {
    /// Create a config from a preset (applies preset defaults)
    pub fn from_preset(preset: Preset) -> Self {
        let mut config = Self {
            preset,
            dt: SIM_DT,
            ball_size: BALL_SIZE,
            gravity: GRAVITY,
            restitution: RESTITUTION,
            arena: Arena::default(),
            force_constant: FORCE_CONSTANT,
            min_contact_distance: MIN_CONTACT_DISTANCE,
            energy_loss: EnergyLossPolicy::Angular,
            annihilation: true,
            explosion_force: EXPLOSION_FORCE,
            slop_energy_threshold: SLOP_ENERGY_THRESHOLD,
            slop_damping: SLOP_DAMPING,
            wind: false,
            warmup_secs: WARMUP_SECS,
            max_substeps: MAX_SUBSTEPS,
            spawn: SpawnTuning::default(),
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        };
        config.apply_preset(preset);
        config
    }

    /// Apply a preset (updates variant-dependent fields only)
    pub fn apply_preset(&mut self, preset: Preset) {
        self.preset = preset;
        match preset {
            Preset::Classic => {
                self.dt = 1.0 / 120.0;
                self.restitution = 0.9;
                self.energy_loss = EnergyLossPolicy::Legacy;
                self.annihilation = false;
                self.arena.top = None;
            }
            Preset::Elastic => {
                self.dt = 1.0 / 60.0;
                self.restitution = 1.0;
                self.energy_loss = EnergyLossPolicy::None;
                self.annihilation = false;
                self.arena.top = Some(1.0);
            }
            Preset::Annihilation => {
                self.dt = 1.0 / 120.0;
                self.restitution = 0.9;
                self.energy_loss = EnergyLossPolicy::Angular;
                self.annihilation = true;
                self.arena.top = None;
            }
        }
    }

    /// Gravity as an acceleration vector
    pub fn gravity_vec(&self) -> glam::Vec3 {
        glam::Vec3::new(0.0, -self.gravity, 0.0)
    }

    /// Reject values the tick cannot run with
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("dt", self.dt),
            ("ball_size", self.ball_size),
            ("min_contact_distance", self.min_contact_distance),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be finite and > 0, got {value}"
                )));
            }
        }
        let non_negative = [
            ("gravity", self.gravity),
            ("force_constant", self.force_constant),
            ("explosion_force", self.explosion_force),
            ("slop_energy_threshold", self.slop_energy_threshold),
            ("slop_damping", self.slop_damping),
            ("warmup_secs", self.warmup_secs),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be finite and >= 0, got {value}"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.restitution) {
            return Err(Error::InvalidConfig(format!(
                "restitution must be in [0, 1], got {}",
                self.restitution
            )));
        }
        let bounds = [self.arena.floor, self.arena.left, self.arena.right];
        if bounds.iter().chain(self.arena.top.iter()).any(|b| !b.is_finite()) {
            return Err(Error::InvalidConfig("arena bounds must be finite".into()));
        }
        if self.arena.left >= self.arena.right {
            return Err(Error::InvalidConfig("arena left must be < right".into()));
        }
        if let Some(top) = self.arena.top {
            if top <= self.arena.floor {
                return Err(Error::InvalidConfig("arena top must be > floor".into()));
            }
        }
        if self.max_substeps == 0 {
            return Err(Error::InvalidConfig("max_substeps must be >= 1".into()));
        }
        let mass = self.spawn.default_mass;
        if !mass.is_finite() || mass <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "spawn.default_mass must be finite and > 0, got {mass}"
            )));
        }
        if self.spawn.target.iter().any(|t| !t.is_finite() || *t < 0.0) {
            return Err(Error::InvalidConfig(
                "spawn.target shares must be finite and >= 0".into(),
            ));
        }
        Ok(())
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!(
            "Loaded {} config from {}",
            config.preset.as_str(),
            path.display()
        );
        Ok(config)
    }
}
