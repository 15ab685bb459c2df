//! Hazard Ball headless driver
//!
//! Runs the simulation without a window: a simple autopilot stands in for
//! the keyboard and events are logged. Useful for soak-testing tuning files.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use glam::DVec2;

use hazard_ball::sim::{Direction, Engine, GameEvent, SessionPhase, Snapshot, TileKind};
use hazard_ball::{Tuning, cell_origin, consts::GRID_CELL_SIZE};

#[derive(Parser, Debug)]
#[command(name = "hazard-ball", about = "Headless Hazard Ball simulation")]
struct Args {
    /// RNG seed (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Ticks to simulate
    #[arg(long, default_value_t = 3600)]
    ticks: u64,

    /// JSON tuning overrides
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// Print the final snapshot as JSON
    #[arg(long)]
    dump: bool,

    /// Print the default tuning table as JSON and exit
    #[arg(long)]
    print_tuning: bool,
}

fn load_tuning(path: Option<&PathBuf>) -> Result<Tuning> {
    let Some(path) = path else {
        return Ok(Tuning::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading tuning file {}", path.display()))?;
    let tuning = Tuning::from_json(&json)
        .with_context(|| format!("parsing tuning file {}", path.display()))?;
    log::info!("Loaded tuning from {}", path.display());
    Ok(tuning)
}

/// Steer toward the nearest diamond, or the portal once it is open
fn autopilot(snapshot: &Snapshot<'_>) -> Vec<Direction> {
    let half = GRID_CELL_SIZE as f64 / 2.0;
    let me = snapshot.player.planar();

    let target = if snapshot.progression.portal_open() {
        Some(cell_origin(snapshot.portal_cell()) + DVec2::splat(half))
    } else {
        snapshot
            .grid
            .iter()
            .filter(|(_, kind)| *kind == TileKind::Diamond)
            .map(|(cell, _)| cell_origin(cell) + DVec2::splat(half))
            .min_by(|a, b| a.distance_squared(me).total_cmp(&b.distance_squared(me)))
    };

    let Some(target) = target else {
        return Vec::new();
    };

    let to_target = target - me;
    let velocity = snapshot.player.velocity.truncate();
    let mut dirs = Vec::new();
    // Cap speed so the ball can still react to what it rolls onto
    if to_target.x.abs() > half / 2.0 && velocity.x * to_target.x.signum() < 4.0 {
        dirs.push(if to_target.x > 0.0 { Direction::Forward } else { Direction::Back });
    }
    if to_target.y.abs() > half / 2.0 && velocity.y * to_target.y.signum() < 4.0 {
        dirs.push(if to_target.y > 0.0 { Direction::Left } else { Direction::Right });
    }
    dirs
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.print_tuning {
        println!("{}", Tuning::default().to_json()?);
        return Ok(());
    }

    let tuning = load_tuning(args.tuning.as_ref())?;
    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("Hazard Ball (headless) starting, seed {}", seed);

    let mut engine = Engine::from_seed(seed, tuning);

    for _ in 0..args.ticks {
        if engine.phase() == SessionPhase::GameOver {
            break;
        }
        let dirs = autopilot(&engine.snapshot());
        for dir in dirs {
            engine.push(dir);
        }
        for event in engine.tick() {
            match event {
                GameEvent::LevelComplete { .. }
                | GameEvent::LifeLost { .. }
                | GameEvent::GameOver { .. }
                | GameEvent::ExtraLife { .. }
                | GameEvent::SpeedBoostActivated { .. } => log::info!("{:?}", event),
                other => log::debug!("{:?}", other),
            }
        }
    }

    let snapshot = engine.snapshot();
    println!(
        "tick {} | level {} | score {} | lives {} | diamonds {}/{} | {:?}",
        snapshot.session.tick,
        snapshot.progression.level,
        snapshot.session.score,
        snapshot.session.lives,
        snapshot.progression.diamonds_collected,
        snapshot.progression.diamonds_needed,
        snapshot.phase(),
    );

    if args.dump {
        println!("{}", snapshot.to_json()?);
    }

    Ok(())
}
