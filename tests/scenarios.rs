use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use matterball::sim::{MatterKind, PositionStore, SimState, tick};
use matterball::{NullAudio, Sandbox, SimConfig, SoundEffect, SoundLog};

/// A dropped ball bounces with restitution-scaled speed and never sinks into the floor.
#[test]
fn dropped_ball_bounces_and_stays_above_floor() -> matterball::Result<()> {
    let config = SimConfig::default();
    let dt = config.dt;
    let floor = config.arena.floor + config.ball_size / 2.0;
    let restitution = config.restitution;

    let mut state = SimState::new(config)?;
    state.spawn(MatterKind::Neutral, Vec3::new(0.0, 0.5, 0.0), 1.0)?;
    let mut sounds = SoundLog::new();

    let mut bounced = false;
    for _ in 0..1200 {
        let before = state.balls[0].velocity;
        tick(&mut state, &mut sounds, dt);
        let after = state.balls[0].velocity;

        if !bounced && before.y < 0.0 && after.y > 0.0 {
            bounced = true;
            let impact = before.y.abs() + state.config.gravity * dt;
            assert!(
                (after.y - restitution * impact).abs() < 1e-4,
                "bounce speed {} vs {}",
                after.y,
                restitution * impact
            );
        }

        let y = state.position(0).unwrap().y;
        assert!(y >= floor - 1e-5, "ball sank to {y}");
    }

    assert!(bounced);
    assert!(sounds.count(SoundEffect::Thump) >= 1);
    Ok(())
}

/// Opposite kinds in contact vanish together in one tick.
#[test]
fn opposite_pair_annihilates() -> matterball::Result<()> {
    let mut state = SimState::new(SimConfig::default())?;
    let a = state.spawn(MatterKind::Positive, Vec3::new(-0.02, 0.2, 0.0), 1.0)?;
    let b = state.spawn(MatterKind::Negative, Vec3::new(0.02, 0.2, 0.0), 1.0)?;
    let dt = state.config.dt;

    tick(&mut state, &mut NullAudio, dt);

    assert!(state.balls.is_empty());
    assert_eq!(state.store.position(a), None);
    assert_eq!(state.store.position(b), None);
    assert_eq!(state.spawner.population.counts(), [0, 0, 0]);
    assert_eq!(state.explosions.len(), 1);
    let site = state.explosions[0];
    assert!(site.x.abs() < 1e-4);
    assert!((site.y - 0.2).abs() < 1e-3);
    Ok(())
}

/// Random crowds: removals always come in pairs and bookkeeping stays in sync.
#[test]
fn removals_are_even_and_store_stays_in_sync() -> matterball::Result<()> {
    let mut rng = Pcg32::seed_from_u64(2024);
    let mut sandbox = Sandbox::new(SimConfig::default(), NullAudio, 2024)?;
    for _ in 0..60 {
        let pos = Vec3::new(
            rng.random_range(-0.9..0.9),
            rng.random_range(-0.9..0.9),
            0.0,
        );
        sandbox.pointer_down(pos)?;
    }

    let dt = sandbox.state.config.dt;
    for _ in 0..600 {
        let before = sandbox.state.balls.len();
        tick(&mut sandbox.state, &mut sandbox.audio, dt);
        let after = sandbox.state.balls.len();

        assert_eq!((before - after) % 2, 0);
        assert_eq!(before - after, sandbox.state.explosions.len() * 2);
        assert_eq!(sandbox.state.store.len(), after);
        assert_eq!(sandbox.state.spawner.population.total() as usize, after);
        for ball in &sandbox.state.balls {
            assert!(ball.velocity.is_finite());
            assert!(!ball.annihilating);
        }
    }
    Ok(())
}

/// A survivor next to an annihilation is pushed outward on the following tick only.
#[test]
fn survivor_pushed_one_tick_later() -> matterball::Result<()> {
    let mut config = SimConfig::default();
    config.gravity = 0.0;
    let mut state = SimState::new(config)?;
    state.spawn(MatterKind::Neutral, Vec3::new(-0.3, 0.0, 0.0), 1.0)?;
    state.spawn(MatterKind::Neutral, Vec3::new(0.0, 0.4, 0.0), 1.0)?;
    state.spawn(MatterKind::Positive, Vec3::new(0.0, 0.0, 0.0), 1.0)?;
    state.spawn(MatterKind::Negative, Vec3::new(0.04, 0.0, 0.0), 1.0)?;
    let dt = state.config.dt;

    tick(&mut state, &mut NullAudio, dt);
    assert_eq!(state.balls.len(), 2);
    let site = state.explosions[0];
    for ball in &state.balls {
        assert_eq!(ball.velocity, Vec3::ZERO);
    }

    tick(&mut state, &mut NullAudio, dt);
    assert!(state.explosions.is_empty());
    for (i, ball) in state.balls.iter().enumerate() {
        let outward = state.position(i).unwrap() - site;
        assert!(ball.velocity.dot(outward) > 0.0);
    }
    Ok(())
}

/// Resetting twice is the same as resetting once.
#[test]
fn reset_is_idempotent() -> matterball::Result<()> {
    let mut config = SimConfig::default();
    config.warmup_secs = 0.0;
    let mut sandbox = Sandbox::new(config, NullAudio, 5)?;
    sandbox.seed_grid(5)?;
    for _ in 0..30 {
        sandbox.frame(1.0 / 60.0);
    }

    sandbox.reset();
    let once = (
        sandbox.state.balls.len(),
        sandbox.state.store.len(),
        sandbox.state.spawner.population.counts(),
        sandbox.state.explosions.len(),
    );
    sandbox.reset();
    let twice = (
        sandbox.state.balls.len(),
        sandbox.state.store.len(),
        sandbox.state.spawner.population.counts(),
        sandbox.state.explosions.len(),
    );
    assert_eq!(once, (0, 0, [0, 0, 0], 0));
    assert_eq!(once, twice);
    Ok(())
}
