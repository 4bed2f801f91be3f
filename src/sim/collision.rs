//! Wall and ball-ball collision response
//!
//! Both halves are pure functions over positions and velocities so the tick
//! can run them against a frozen snapshot and commit afterwards.

use glam::Vec3;

use super::state::MatterKind;
use crate::audio::{AudioSink, SoundEffect};
use crate::config::{Arena, SimConfig};
use crate::{direction_angle, impact_volume, norm, planar_distance_squared};

/// Direction used to separate two balls sitting exactly on top of each other
pub const COINCIDENT_DIRECTION: Vec3 = Vec3::new(-1.0, 0.0, 0.0);

/// Result of a wall check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallResponse {
    /// Whether any wall was touched
    pub hit: bool,
    /// Total de-penetration to add to the position
    pub displacement: Vec3,
    /// Velocity after every bounce this tick
    pub velocity: Vec3,
}

/// Shift that backs a ball out of a wall along its own trajectory.
///
/// `depth` is signed along `axis` (0 = x, 1 = y). The other component follows
/// the reversed velocity direction, so a ball slides back the way it came
/// rather than being clamped straight out. A resting ball gets no shift; a
/// ball moving parallel to the wall gets a plain axis push.
fn slide_back(vel: Vec3, depth: f32, axis: usize) -> Vec3 {
    let back = norm(vel) * -1.0;
    if back == Vec3::ZERO {
        return Vec3::ZERO;
    }
    let other = 1 - axis;
    let along = if back[axis] == 0.0 {
        0.0
    } else {
        back[other] / back[axis] * depth
    };
    let mut d = Vec3::ZERO;
    d[axis] = depth;
    d[other] = along;
    d
}

/// Collide one ball with the arena walls.
///
/// Floor, ceiling and side walls are checked independently, in that order,
/// each seeing the result of the previous one; a corner hit applies both.
pub fn wall_collision(
    pos: Vec3,
    vel: Vec3,
    ball_size: f32,
    arena: &Arena,
    restitution: f32,
) -> WallResponse {
    let half = ball_size / 2.0;
    let mut pos = pos;
    let mut vel = vel;
    let mut displacement = Vec3::ZERO;
    let mut hit = false;

    // Floor
    if pos.y - half <= arena.floor {
        let depth = arena.floor - (pos.y - half);
        let d = slide_back(vel, depth, 1);
        pos += d;
        displacement += d;
        vel = Vec3::new(vel.x * restitution, -vel.y * restitution, 0.0);
        hit = true;
    }

    // Ceiling
    if let Some(top) = arena.top {
        if pos.y + half >= top {
            let depth = top - (pos.y + half);
            let d = slide_back(vel, depth, 1);
            pos += d;
            displacement += d;
            vel = Vec3::new(vel.x * restitution, -vel.y * restitution, 0.0);
            hit = true;
        }
    }

    // Side walls
    let past_left = pos.x - half <= arena.left;
    if past_left || pos.x + half >= arena.right {
        let depth = if past_left {
            arena.left - (pos.x - half)
        } else {
            arena.right - (pos.x + half)
        };
        let d = slide_back(vel, depth, 0);
        displacement += d;
        vel = Vec3::new(-vel.x * restitution, vel.y * restitution, 0.0);
        hit = true;
    }

    WallResponse {
        hit,
        displacement,
        velocity: vel,
    }
}

/// Frozen per-ball state for the pairwise sweep
#[derive(Debug, Clone, Copy)]
pub struct BallSnapshot {
    pub pos: Vec3,
    pub vel: Vec3,
    pub mass: f32,
    pub kind: MatterKind,
}

/// Everything one ball picked up from its neighbours this tick
#[derive(Debug, Clone, PartialEq)]
pub struct Interaction {
    /// Summed repulsive acceleration
    pub acceleration: Vec3,
    /// Product of every finite per-contact loss factor
    pub energy_loss: f32,
    /// Indices of touching balls of the opposite kind
    pub annihilation_partners: Vec<usize>,
}

impl Interaction {
    pub fn none() -> Self {
        Self {
            acceleration: Vec3::ZERO,
            energy_loss: 1.0,
            annihilation_partners: Vec::new(),
        }
    }
}

/// Overlap repulsion felt by a ball displaced by `delta` from its neighbour.
///
/// `min_distance` stands in only for an exactly coincident pair.
pub fn repulsion(
    delta: Vec3,
    distance_squared: f32,
    mass: f32,
    force_constant: f32,
    min_distance: f32,
) -> Vec3 {
    let d2 = if distance_squared > 0.0 {
        distance_squared
    } else {
        min_distance * min_distance
    };
    let magnitude = force_constant / (d2 * mass);
    let direction = if delta == Vec3::ZERO {
        COINCIDENT_DIRECTION
    } else {
        norm(delta)
    };
    direction * magnitude
}

/// Accumulate the interaction of ball `id` with every other ball in `balls`.
pub fn collide_balls<A: AudioSink>(
    id: usize,
    balls: &[BallSnapshot],
    config: &SimConfig,
    audio: &mut A,
) -> Interaction {
    let me = &balls[id];
    let reach = config.ball_size * config.ball_size;
    let mut out = Interaction::none();

    for (j, other) in balls.iter().enumerate() {
        if j == id {
            continue;
        }
        let distance_squared = planar_distance_squared(me.pos, other.pos);
        if distance_squared > reach {
            continue;
        }

        if config.annihilation && me.kind.annihilates_with(other.kind) {
            out.annihilation_partners.push(j);
        }

        let delta = Vec3::new(me.pos.x - other.pos.x, me.pos.y - other.pos.y, 0.0);
        out.acceleration += repulsion(
            delta,
            distance_squared,
            me.mass,
            config.force_constant,
            config.min_contact_distance,
        );

        let loss = config
            .energy_loss
            .factor(direction_angle(me.vel, other.vel));
        if loss.is_finite() {
            out.energy_loss *= loss;
        }

        let volume = impact_volume(me.vel.length());
        if volume > 0.0 {
            audio.play(SoundEffect::Clack, volume);
        }
    }

    out
}
