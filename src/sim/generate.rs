//! Procedural level generation
//!
//! One sweep over the lattice, one primary draw per cell outside the spawn
//! square. Holes and obstacles share that draw:
//!
//! - `[0, hole_threshold)` → hole
//! - `[hole_threshold, obstacle_threshold)` → obstacle
//! - `[obstacle_threshold, 1)` → floor, then a second draw for items
//!
//! The obstacle bucket is empty once the hole threshold reaches the obstacle
//! threshold (level 3 with stock tuning). From the hazard level on, draws
//! below `hazard_chance` spawn a moving hazard instead of any static tile.

use glam::DVec2;

use super::grid::{CellCoord, Grid, TileKind};
use super::hazard::{Axis, HazardKind, MovingHazard};
use super::random::UniformSource;
use crate::cell_origin;
use crate::tuning::GenerationTuning;

/// A freshly generated level
#[derive(Debug, Clone)]
pub struct Level {
    pub grid: Grid,
    pub hazards: Vec<MovingHazard>,
}

/// Generate the grid and hazard list for `level`
pub fn generate_level<R: UniformSource + ?Sized>(
    level: u32,
    rng: &mut R,
    tuning: &GenerationTuning,
) -> Level {
    let mut grid = Grid::new();
    let mut hazards = Vec::new();
    let hole_threshold = tuning.hole_threshold(level);

    for cell in Grid::cells() {
        if cell.in_safe_zone() {
            continue;
        }

        let roll = rng.next_unit();

        if level >= tuning.hazard_min_level && roll < tuning.hazard_chance {
            hazards.push(spawn_hazard(level, cell, rng, tuning));
            continue;
        }

        let tile = if roll < hole_threshold {
            TileKind::Hole
        } else if roll < tuning.obstacle_threshold {
            TileKind::Obstacle
        } else {
            roll_item(rng, tuning)
        };
        grid.set(cell, tile);
    }

    grid.set(CellCoord::portal(), TileKind::Portal);

    log::info!(
        "Level {} generated: {} holes, {} obstacles, {} diamonds, {} hazards",
        level,
        grid.count(TileKind::Hole),
        grid.count(TileKind::Obstacle),
        grid.count(TileKind::Diamond),
        hazards.len()
    );

    Level { grid, hazards }
}

fn spawn_hazard<R: UniformSource + ?Sized>(
    level: u32,
    cell: CellCoord,
    rng: &mut R,
    tuning: &GenerationTuning,
) -> MovingHazard {
    let kind = if level >= tuning.void_hazard_min_level && rng.next_unit() < 0.5 {
        HazardKind::VoidHole
    } else {
        HazardKind::Wall
    };
    let axis = if rng.next_unit() < 0.5 { Axis::X } else { Axis::Y };
    let origin: DVec2 = cell_origin(cell);
    MovingHazard::new(kind, origin, axis, tuning.hazard_half_range, tuning.hazard_speed)
}

/// Item draw for a floor cell
fn roll_item<R: UniformSource + ?Sized>(rng: &mut R, tuning: &GenerationTuning) -> TileKind {
    let roll = rng.next_unit();
    if roll < tuning.diamond_threshold {
        TileKind::Diamond
    } else if roll < tuning.speed_boost_threshold {
        TileKind::SpeedBoost
    } else if roll < tuning.extra_life_threshold {
        TileKind::ExtraLife
    } else {
        TileKind::Floor
    }
}
