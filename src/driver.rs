//! Frame pacing and input handling around the fixed tick
//!
//! Render frames arrive at whatever rate the host manages. [`FrameDriver`]
//! turns those variable deltas into a whole number of fixed physics steps,
//! after a short warm-up so the host can finish setting up before anything
//! falls. [`Sandbox`] bundles the driver with the simulation, the audio sink
//! and the spawn RNG, and is what an input layer talks to.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::audio::{AudioSink, Mixer, NullAudio};
use crate::config::SimConfig;
use crate::consts::MAX_FRAME_DT;
use crate::error::Result;
use crate::sim::{Entity, MatterKind, PositionStore, SimState, Transforms, tick};

/// Converts variable frame time into fixed ticks
#[derive(Debug, Clone)]
pub struct FrameDriver {
    dt: f32,
    max_substeps: u32,
    warmup: f32,
    accumulator: f32,
}

impl FrameDriver {
    pub fn new(dt: f32, warmup_secs: f32, max_substeps: u32) -> Self {
        Self {
            dt,
            max_substeps,
            warmup: warmup_secs,
            accumulator: 0.0,
        }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(config.dt, config.warmup_secs, config.max_substeps)
    }

    /// True while physics is still held back
    pub fn warming_up(&self) -> bool {
        self.warmup >= 0.0
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Feed one frame's elapsed time; returns how many ticks to run now
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        let frame_dt = frame_dt.clamp(0.0, MAX_FRAME_DT);
        if self.warming_up() {
            self.warmup -= frame_dt;
            return 0;
        }

        self.accumulator += frame_dt;
        let mut substeps = 0;
        while self.accumulator >= self.dt && substeps < self.max_substeps {
            self.accumulator -= self.dt;
            substeps += 1;
        }
        if substeps == self.max_substeps && self.accumulator >= self.dt {
            log::debug!("dropping {:.4}s of backlog", self.accumulator);
            self.accumulator = 0.0;
        }
        substeps
    }
}

/// Discrete input actions
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Add a ball at this arena position
    PointerDown(Vec3),
    /// Clear everything
    Reset,
}

/// The simulation plus everything needed to drive it from a host loop
pub struct Sandbox<A: AudioSink = Mixer<NullAudio>, S: PositionStore = Transforms> {
    pub state: SimState<S>,
    pub driver: FrameDriver,
    pub audio: A,
    rng: Pcg32,
}

impl<A: AudioSink> Sandbox<A, Transforms> {
    pub fn new(config: SimConfig, audio: A, seed: u64) -> Result<Self> {
        Self::with_store(config, Transforms::new(), audio, seed)
    }
}

impl<A: AudioSink, S: PositionStore> Sandbox<A, S> {
    pub fn with_store(config: SimConfig, store: S, audio: A, seed: u64) -> Result<Self> {
        let driver = FrameDriver::from_config(&config);
        let state = SimState::with_store(config, store)?;
        let mut sandbox = Self {
            state,
            driver,
            audio,
            rng: Pcg32::seed_from_u64(seed),
        };
        sandbox.state.spawner.advance(&mut sandbox.rng);
        Ok(sandbox)
    }

    /// Run however many fixed ticks this frame owes. Returns the tick count.
    pub fn frame(&mut self, frame_dt: f32) -> u32 {
        let steps = self.driver.advance(frame_dt);
        let dt = self.driver.dt();
        for _ in 0..steps {
            tick(&mut self.state, &mut self.audio, dt);
        }
        steps
    }

    pub fn handle(&mut self, event: InputEvent) -> Result<()> {
        match event {
            InputEvent::PointerDown(pos) => self.pointer_down(pos).map(|_| ()),
            InputEvent::Reset => {
                self.reset();
                Ok(())
            }
        }
    }

    /// Spawn the queued kind at `pos`, then draw the next one
    pub fn pointer_down(&mut self, pos: Vec3) -> Result<Entity> {
        let kind = self.state.spawner.next_kind();
        let mass = self.state.config.spawn.default_mass;
        let entity = self.state.spawn(kind, pos, mass)?;
        self.state.spawner.advance(&mut self.rng);
        Ok(entity)
    }

    pub fn reset(&mut self) {
        self.state.reset_all();
    }

    /// Lay out a `side`×`side` grid of balls across the middle of the arena.
    ///
    /// Kinds cycle diagonally, each row is heavier than the one below, and
    /// every ball gets a small random sideways velocity.
    pub fn seed_grid(&mut self, side: u32) -> Result<()> {
        let half = (side as f32 - 1.0) / 2.0;
        let spacing = 2.0 / 3.0 / half.max(1.0);
        for y in 0..side {
            for x in 0..side {
                let pos = Vec3::new((x as f32 - half) * spacing, (y as f32 - half) * spacing, 0.0);
                let kind = MatterKind::ALL[((x + y) % 3) as usize];
                let mass = 0.2 * (y + 1) as f32;
                self.state.spawn(kind, pos, mass)?;
                let jitter = 0.5 - self.rng.random_range(0..100) as f32 / 100.0;
                self.state.balls[0].velocity.x = jitter;
            }
        }
        Ok(())
    }
}
