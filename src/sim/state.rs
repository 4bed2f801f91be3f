//! Simulation state and ball lifecycle
//!
//! Balls are created by [`SimState::spawn`] and destroyed either by
//! annihilation or by [`SimState::reset_all`]. Both paths remove the ball's
//! position entry in the same call, so no handle outlives its ball.

use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::spawn::SpawnPolicy;
use super::store::{Entity, PositionStore, Transforms};
use crate::config::SimConfig;
use crate::error::{Error, Result};

/// Matter kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatterKind {
    /// Inert, bounces off everything
    Neutral,
    /// Annihilates with `Negative`
    Positive,
    /// Annihilates with `Positive`
    Negative,
}

impl MatterKind {
    pub const ALL: [MatterKind; 3] = [MatterKind::Neutral, MatterKind::Positive, MatterKind::Negative];

    /// Stable index into per-kind tables
    pub fn index(&self) -> usize {
        match self {
            MatterKind::Neutral => 0,
            MatterKind::Positive => 1,
            MatterKind::Negative => 2,
        }
    }

    /// Render tint (RGBA)
    pub fn color(&self) -> Vec4 {
        match self {
            MatterKind::Neutral => Vec4::new(1.0, 1.0, 1.0, 1.0),
            MatterKind::Positive => Vec4::new(1.0, 0.0, 0.0, 1.0),
            MatterKind::Negative => Vec4::new(0.0, 0.0, 1.0, 1.0),
        }
    }

    pub fn annihilates_with(&self, other: MatterKind) -> bool {
        matches!(
            (self, other),
            (MatterKind::Positive, MatterKind::Negative) | (MatterKind::Negative, MatterKind::Positive)
        )
    }
}

/// Complete simulation state
#[derive(Debug, Clone, Serialize)]
pub struct SimState<S: PositionStore = Transforms> {
    pub config: SimConfig,
    /// Live balls, newest first
    pub balls: Vec<Ball>,
    /// Positions for every live ball
    pub store: S,
    /// Population counters and next spawn kind
    pub spawner: SpawnPolicy,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Explosion sites recorded by the most recent tick
    pub explosions: Vec<Vec3>,
    /// Annihilated pairs since the last reset
    pub annihilations: u64,
}

impl SimState<Transforms> {
    pub fn new(config: SimConfig) -> Result<Self> {
        Self::with_store(config, Transforms::new())
    }
}

impl<S: PositionStore> SimState<S> {
    /// Build a state around an existing (empty) position store
    pub fn with_store(config: SimConfig, store: S) -> Result<Self> {
        config.validate()?;
        let spawner = SpawnPolicy::new(config.spawn.clone());
        Ok(Self {
            config,
            balls: Vec::new(),
            store,
            spawner,
            time_ticks: 0,
            explosions: Vec::new(),
            annihilations: 0,
        })
    }

    /// Create a ball at `pos` and put it at the front of the collection
    pub fn spawn(&mut self, kind: MatterKind, pos: Vec3, mass: f32) -> Result<Entity> {
        if !mass.is_finite() || mass <= 0.0 {
            return Err(Error::InvalidSpawn(format!(
                "mass must be finite and > 0, got {mass}"
            )));
        }
        if !pos.is_finite() {
            return Err(Error::InvalidSpawn(format!("position must be finite, got {pos}")));
        }

        let entity = self.store.create_entity(pos);
        self.balls.insert(0, Ball::new(entity, kind, mass));
        self.spawner.population.increment(kind);
        log::info!("Spawned {:?} ball at ({:.2}, {:.2})", kind, pos.x, pos.y);
        Ok(entity)
    }

    /// Destroy one ball and its position entry. Returns the removed ball.
    pub fn despawn(&mut self, index: usize) -> Option<Ball> {
        if index >= self.balls.len() {
            return None;
        }
        let ball = self.balls.remove(index);
        self.store.destroy_entity(ball.entity);
        self.spawner.population.decrement(ball.kind);
        Some(ball)
    }

    /// Destroy every ball and zero the population counters
    pub fn reset_all(&mut self) {
        let count = self.balls.len();
        for ball in self.balls.drain(..) {
            self.store.destroy_entity(ball.entity);
        }
        self.spawner.population.clear();
        self.explosions.clear();
        self.annihilations = 0;
        if count > 0 {
            log::info!("Reset: removed {count} balls");
        }
    }

    /// Position of the ball at `index`
    pub fn position(&self, index: usize) -> Option<Vec3> {
        self.balls
            .get(index)
            .and_then(|b| self.store.position(b.entity))
    }

    /// Number of live balls of `kind`
    pub fn count(&self, kind: MatterKind) -> u32 {
        self.spawner.population.count(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_colors_are_distinct() {
        assert_eq!(MatterKind::Neutral.color(), Vec4::ONE);
        assert_eq!(MatterKind::Positive.color().x, 1.0);
        assert_eq!(MatterKind::Negative.color().z, 1.0);
        assert_ne!(MatterKind::Positive.color(), MatterKind::Negative.color());
    }

    #[test]
    fn test_spawn_newest_first() {
        let mut state = SimState::new(SimConfig::default()).unwrap();
        let a = state.spawn(MatterKind::Neutral, Vec3::ZERO, 1.0).unwrap();
        let b = state.spawn(MatterKind::Positive, Vec3::X * 0.5, 1.0).unwrap();
        assert_eq!(state.balls[0].entity, b);
        assert_eq!(state.balls[1].entity, a);
        assert_eq!(state.store.len(), 2);
        assert_eq!(state.count(MatterKind::Positive), 1);
        assert_eq!(state.position(0), Some(Vec3::X * 0.5));
    }

    #[test]
    fn test_spawn_rejects_bad_mass() {
        let mut state = SimState::new(SimConfig::default()).unwrap();
        assert!(state.spawn(MatterKind::Neutral, Vec3::ZERO, 0.0).is_err());
        assert!(state.spawn(MatterKind::Neutral, Vec3::ZERO, f32::NAN).is_err());
        assert!(state.spawn(MatterKind::Neutral, Vec3::splat(f32::INFINITY), 1.0).is_err());
        assert!(state.balls.is_empty());
        assert!(state.store.is_empty());
    }

    #[test]
    fn test_despawn_removes_position() {
        let mut state = SimState::new(SimConfig::default()).unwrap();
        let e = state.spawn(MatterKind::Negative, Vec3::ZERO, 1.0).unwrap();
        let ball = state.despawn(0).unwrap();
        assert_eq!(ball.entity, e);
        assert_eq!(state.store.position(e), None);
        assert_eq!(state.count(MatterKind::Negative), 0);
        assert!(state.despawn(0).is_none());
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut state = SimState::new(SimConfig::default()).unwrap();
        for kind in MatterKind::ALL {
            state.spawn(kind, Vec3::ZERO, 1.0).unwrap();
        }
        state.reset_all();
        assert!(state.balls.is_empty());
        assert!(state.store.is_empty());
        assert_eq!(state.spawner.population.total(), 0);

        state.reset_all();
        assert!(state.balls.is_empty());
        assert!(state.store.is_empty());
        assert_eq!(state.spawner.population.total(), 0);
    }

    #[test]
    fn test_annihilation_pairs() {
        assert!(MatterKind::Positive.annihilates_with(MatterKind::Negative));
        assert!(MatterKind::Negative.annihilates_with(MatterKind::Positive));
        assert!(!MatterKind::Positive.annihilates_with(MatterKind::Positive));
        assert!(!MatterKind::Neutral.annihilates_with(MatterKind::Negative));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = SimConfig::default();
        config.ball_size = 0.0;
        assert!(SimState::new(config).is_err());
    }
}
