//! Fixed timestep simulation tick
//!
//! Order within a tick is fixed:
//! 1. integration (gravity + last tick's explosion impulses)
//! 2. wall collision
//! 3. pairwise forces against a snapshot
//! 4. commit of the accumulated forces
//! 5. annihilation removal
//! 6. slop damping
//! 7. explosion impulses queued for the next tick

use super::annihilation::{match_pairs, remove_annihilated, schedule_impulses};
use super::collision::{BallSnapshot, Interaction, collide_balls};
use super::state::SimState;
use super::store::PositionStore;
use crate::audio::AudioSink;

/// Advance the simulation by one fixed timestep
pub fn tick<S: PositionStore, A: AudioSink>(state: &mut SimState<S>, audio: &mut A, dt: f32) {
    state.time_ticks += 1;
    state.explosions.clear();

    for ball in &mut state.balls {
        ball.integrate(&mut state.store, &state.config, dt);
    }

    for ball in &mut state.balls {
        ball.collide_walls(&mut state.store, &state.config, audio);
    }

    // Every pair sees the same frozen state; nothing moves until commit
    let snapshot: Vec<BallSnapshot> = state
        .balls
        .iter()
        .map(|b| BallSnapshot {
            pos: b.position(&state.store),
            vel: b.velocity,
            mass: b.mass,
            kind: b.kind,
        })
        .collect();
    let interactions: Vec<Interaction> = (0..snapshot.len())
        .map(|i| collide_balls(i, &snapshot, &state.config, audio))
        .collect();

    let mut partners = Vec::with_capacity(interactions.len());
    for (ball, interaction) in state.balls.iter_mut().zip(interactions) {
        ball.annihilating = !interaction.annihilation_partners.is_empty();
        partners.push(interaction.annihilation_partners);

        if !interaction.acceleration.is_finite() {
            log::warn!(
                "discarding non-finite contact acceleration {} for {:?}",
                interaction.acceleration,
                ball.entity
            );
            continue;
        }
        ball.velocity += interaction.acceleration * dt;
        ball.velocity *= interaction.energy_loss;
    }

    let pairs = match_pairs(&mut state.balls, &partners);
    let sites = if pairs.is_empty() {
        Vec::new()
    } else {
        remove_annihilated(state, &pairs, audio)
    };

    for ball in &mut state.balls {
        ball.damp_slop(&state.store, &state.config, dt);
    }

    schedule_impulses(state, &sites);
    state.explosions = sites;
}
