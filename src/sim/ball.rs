//! A single ball and its per-tick physics

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::collision::wall_collision;
use super::state::MatterKind;
use super::store::{Entity, PositionStore};
use crate::audio::{AudioSink, SoundEffect};
use crate::config::SimConfig;
use crate::impact_volume;

/// Wind oscillation shape
const WIND_AMPLITUDE: f32 = 0.5;
const WIND_FREQ: f32 = 0.2;

/// A ball. Its position lives in the store under `entity`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub entity: Entity,
    pub kind: MatterKind,
    pub mass: f32,
    pub velocity: Vec3,
    /// Simulated seconds since spawn (phases the wind)
    pub time_passed: f32,
    /// Set by the pairwise pass, consumed by removal in the same tick
    #[serde(skip)]
    pub annihilating: bool,
    /// Explosion push to apply at the start of next tick's integration
    pub pending_impulse: Vec3,
}

impl Ball {
    pub fn new(entity: Entity, kind: MatterKind, mass: f32) -> Self {
        Self {
            entity,
            kind,
            mass,
            velocity: Vec3::ZERO,
            time_passed: 0.0,
            annihilating: false,
            pending_impulse: Vec3::ZERO,
        }
    }

    pub fn position<S: PositionStore>(&self, store: &S) -> Vec3 {
        match store.position(self.entity) {
            Some(pos) => pos,
            None => {
                log::warn!("ball {:?} has no position entry", self.entity);
                Vec3::ZERO
            }
        }
    }

    /// Horizontal wind acceleration at the ball's current clock
    pub fn wind(&self) -> f32 {
        WIND_AMPLITUDE * (std::f32::consts::PI * WIND_FREQ * self.time_passed).sin()
    }

    /// Advance velocity and position by one step under gravity plus any
    /// pending explosion impulse.
    ///
    /// Position uses the old velocity and the new acceleration:
    /// `x += v·dt + ½·a·dt²`.
    pub fn integrate<S: PositionStore>(&mut self, store: &mut S, config: &SimConfig, dt: f32) {
        self.time_passed += dt;

        let mut acceleration = config.gravity_vec() + self.pending_impulse;
        self.pending_impulse = Vec3::ZERO;
        if config.wind {
            acceleration.x += self.wind();
        }

        let d_velocity = acceleration * dt;
        let d_position = self.velocity * dt + acceleration * 0.5 * dt * dt;

        self.velocity += d_velocity;
        let pos = self.position(store);
        store.set_position(self.entity, pos + d_position);
    }

    /// Bounce off the arena walls. Returns true if any wall was hit.
    pub fn collide_walls<S: PositionStore, A: AudioSink>(
        &mut self,
        store: &mut S,
        config: &SimConfig,
        audio: &mut A,
    ) -> bool {
        let pos = self.position(store);
        let res = wall_collision(
            pos,
            self.velocity,
            config.ball_size,
            &config.arena,
            config.restitution,
        );
        if !res.hit {
            return false;
        }

        store.set_position(self.entity, pos + res.displacement);
        self.velocity = res.velocity;

        let volume = impact_volume(self.velocity.length());
        if volume > 0.0 {
            audio.play(SoundEffect::Thump, volume);
        }
        true
    }

    /// Kinetic plus potential energy, with zero potential resting on the floor
    pub fn mechanical_energy(&self, pos: Vec3, config: &SimConfig) -> f32 {
        let kinetic = 0.5 * self.mass * self.velocity.length_squared();
        let height = pos.y - (config.arena.floor + config.ball_size / 2.0);
        let potential = self.mass * config.gravity * height;
        kinetic + potential
    }

    /// Bleed off residual jitter once the ball has nearly come to rest
    pub fn damp_slop<S: PositionStore>(&mut self, store: &S, config: &SimConfig, dt: f32) {
        let energy = self.mechanical_energy(self.position(store), config);
        if energy < config.slop_energy_threshold {
            let deceleration = self.velocity * -config.slop_damping;
            self.velocity += deceleration * dt;
        }
    }
}
