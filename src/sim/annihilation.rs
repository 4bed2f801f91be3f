//! Annihilation removal and explosion impulses
//!
//! Contacts between opposite kinds are matched into disjoint pairs, so a
//! tick always removes an even number of balls. Each pair leaves one
//! explosion site at its midpoint. Survivors are pushed away from the sites,
//! but the push is only queued in `pending_impulse`; integration applies it
//! on the next tick.

use glam::Vec3;

use super::ball::Ball;
use super::state::SimState;
use super::store::PositionStore;
use crate::audio::{AudioSink, SoundEffect};
use crate::norm;

/// Match flagged balls into disjoint pairs.
///
/// `partners[i]` lists the opposite-kind balls `i` touched this tick. Balls
/// are visited in collection order; each unmatched flagged ball takes its
/// first still-unmatched partner. Flags on balls left without a partner are
/// cleared. Returned pairs are `(i, j)` with `i < j`.
pub fn match_pairs(balls: &mut [Ball], partners: &[Vec<usize>]) -> Vec<(usize, usize)> {
    let mut matched = vec![false; balls.len()];
    let mut pairs = Vec::new();

    for i in 0..balls.len() {
        if !balls[i].annihilating || matched[i] {
            continue;
        }
        let partner = partners
            .get(i)
            .into_iter()
            .flatten()
            .copied()
            .find(|&j| j < balls.len() && !matched[j] && balls[j].annihilating);
        if let Some(j) = partner {
            matched[i] = true;
            matched[j] = true;
            pairs.push((i.min(j), i.max(j)));
        }
    }

    for (ball, m) in balls.iter_mut().zip(&matched) {
        ball.annihilating = *m;
    }
    pairs
}

/// Remove every matched pair and return one explosion site per pair.
pub fn remove_annihilated<S: PositionStore, A: AudioSink>(
    state: &mut SimState<S>,
    pairs: &[(usize, usize)],
    audio: &mut A,
) -> Vec<Vec3> {
    let mut sites = Vec::with_capacity(pairs.len());
    for &(i, j) in pairs {
        let a = state.balls[i].position(&state.store);
        let b = state.balls[j].position(&state.store);
        let site = (a + b) * 0.5;
        log::debug!(
            "annihilation: {:?} + {:?} at ({:.3}, {:.3})",
            state.balls[i].kind,
            state.balls[j].kind,
            site.x,
            site.y
        );
        sites.push(site);
        audio.play(SoundEffect::Annihilate, 1.0);
    }

    // Walk backwards so earlier indices stay valid
    for i in (0..state.balls.len()).rev() {
        if state.balls[i].annihilating {
            state.despawn(i);
        }
    }

    state.annihilations += pairs.len() as u64;
    sites
}

/// Outward acceleration felt at `pos` from an explosion at `site`.
///
/// `None` when the ball sits exactly on the site.
pub fn explosion_impulse(pos: Vec3, site: Vec3, mass: f32, force_scale: f32) -> Option<Vec3> {
    let away = Vec3::new(pos.x - site.x, pos.y - site.y, 0.0);
    let distance_squared = away.length_squared();
    if distance_squared == 0.0 {
        return None;
    }
    Some(norm(away) * (force_scale / mass / distance_squared))
}

/// Queue explosion pushes on every survivor for the next tick
pub fn schedule_impulses<S: PositionStore>(state: &mut SimState<S>, sites: &[Vec3]) {
    if sites.is_empty() {
        return;
    }
    let force = state.config.explosion_force;
    for ball in &mut state.balls {
        let pos = ball.position(&state.store);
        for site in sites {
            if let Some(push) = explosion_impulse(pos, *site, ball.mass, force) {
                if push.is_finite() {
                    ball.pending_impulse += push;
                }
            }
        }
    }
}
