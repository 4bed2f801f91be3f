//! Fixed timestep physics
//!
//! Everything that moves a ball lives here. The module is single-threaded and
//! renderer-free:
//! - Fixed timestep only
//! - Positions live in a [`PositionStore`], never in the balls
//! - Pairwise forces are staged against a snapshot, then committed
//! - Explosion impulses land one tick after the annihilation that caused them

pub mod annihilation;
pub mod ball;
pub mod collision;
pub mod spawn;
pub mod state;
pub mod store;
pub mod tick;

pub use annihilation::{explosion_impulse, match_pairs};
pub use ball::Ball;
pub use collision::{
    BallSnapshot, Interaction, WallResponse, collide_balls, repulsion, wall_collision,
};
pub use spawn::{Population, SpawnPolicy, pick_kind};
pub use state::{MatterKind, SimState};
pub use store::{Entity, PositionStore, Transforms};
pub use tick::tick;
