//! Matterball headless runner
//!
//! Seeds the classic 5×5 grid, drives the simulation at a steady 60 fps for
//! a number of seconds and prints a JSON summary, including every survivor's
//! position and render color. Useful for tuning configs without a window.
//!
//! Usage: `matterball [config.json] [seconds] [preset]`

use std::process::ExitCode;

use serde::Serialize;

use matterball::sim::MatterKind;
use matterball::{Mixer, Preset, Sandbox, SimConfig, SoundEffect, SoundLog};

const FRAME_DT: f32 = 1.0 / 60.0;
const DEFAULT_SECONDS: f32 = 10.0;
const GRID_SIDE: u32 = 5;
const SEED: u64 = 0;

/// Final state of one surviving ball, ready for plotting
#[derive(Debug, Serialize)]
struct BallReport {
    kind: MatterKind,
    color: [f32; 4],
    position: [f32; 2],
    velocity: [f32; 2],
}

#[derive(Debug, Serialize)]
struct Summary {
    preset: &'static str,
    seconds: f32,
    ticks: u64,
    live: usize,
    neutral: u32,
    positive: u32,
    negative: u32,
    annihilations: u64,
    thumps: usize,
    clacks: usize,
    kinetic_energy: f32,
    balls: Vec<BallReport>,
}

fn load_config(args: &[String]) -> matterball::Result<SimConfig> {
    let mut config = match args.first().filter(|a| a.ends_with(".json")) {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    if let Some(preset) = args.iter().find_map(|a| Preset::from_str(a)) {
        config.apply_preset(preset);
    }
    Ok(config)
}

fn run(args: &[String]) -> matterball::Result<Summary> {
    let config = load_config(args)?;
    let seconds = args
        .iter()
        .find_map(|a| a.parse::<f32>().ok())
        .unwrap_or(DEFAULT_SECONDS);

    let mut mixer = Mixer::new(SoundLog::new());
    mixer.set_master_volume(config.master_volume);
    mixer.set_sfx_volume(config.sfx_volume);
    mixer.set_muted(config.muted);

    let preset = config.preset.as_str();
    log::info!("Running {preset} preset for {seconds}s");

    let mut sandbox = Sandbox::new(config, mixer, SEED)?;
    sandbox.seed_grid(GRID_SIDE)?;

    let frames = (seconds / FRAME_DT).round() as u32;
    for frame in 0..frames {
        sandbox.frame(FRAME_DT);
        if frame % 60 == 0 {
            log::debug!(
                "t={:.1}s live={} annihilations={}",
                frame as f32 * FRAME_DT,
                sandbox.state.balls.len(),
                sandbox.state.annihilations
            );
        }
    }

    let state = &sandbox.state;
    let sounds = sandbox.audio.backend();
    let kinetic_energy = state
        .balls
        .iter()
        .map(|b| 0.5 * b.mass * b.velocity.length_squared())
        .sum();
    let balls = state
        .balls
        .iter()
        .enumerate()
        .filter_map(|(i, b)| {
            let pos = state.position(i)?;
            Some(BallReport {
                kind: b.kind,
                color: b.kind.color().to_array(),
                position: [pos.x, pos.y],
                velocity: [b.velocity.x, b.velocity.y],
            })
        })
        .collect();

    Ok(Summary {
        preset,
        seconds,
        ticks: state.time_ticks,
        live: state.balls.len(),
        neutral: state.count(MatterKind::Neutral),
        positive: state.count(MatterKind::Positive),
        negative: state.count(MatterKind::Negative),
        annihilations: state.annihilations,
        thumps: sounds.count(SoundEffect::Thump),
        clacks: sounds.count(SoundEffect::Clack),
        kinetic_energy,
        balls,
    })
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(summary) => match serde_json::to_string_pretty(&summary) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                log::error!("Failed to encode summary: {e}");
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
