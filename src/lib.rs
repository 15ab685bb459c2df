//! Hazard Ball - a grid arena ball game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (map generation, physics, collisions, game state)
//! - `tuning`: Data-driven game balance
//!
//! Rendering, camera and window handling live outside this crate. A host
//! drives [`sim::Engine::tick`] once per frame and draws from
//! [`sim::Engine::snapshot`].

pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

use glam::DVec2;

use sim::CellCoord;

/// Arena geometry constants
pub mod consts {
    /// Half-extent of the square arena (world units). The playfield spans
    /// `[-GRID_LENGTH, GRID_LENGTH)` on both axes.
    pub const GRID_LENGTH: i32 = 1200;
    /// Edge length of one grid cell
    pub const GRID_CELL_SIZE: i32 = 50;
    /// Cells per arena side
    pub const CELLS_PER_SIDE: i32 = 2 * GRID_LENGTH / GRID_CELL_SIZE;

    /// Player ball radius, used for the arena-edge clamp
    pub const BALL_RADIUS: f64 = 20.0;

    /// Cells whose origin lies strictly within this distance of the
    /// world origin on both axes are always plain floor
    pub const SAFE_ZONE_HALF: i32 = 150;

    /// World origin of the portal cell (far corner, outside the safe zone)
    pub const PORTAL_CORNER: (i32, i32) = (GRID_LENGTH - 100, GRID_LENGTH - 100);
}

/// Cell containing a world position.
///
/// Floor division per axis, so `-0.5` lands in cell `-1`, not `0`.
#[inline]
pub fn cell_of(pos: DVec2) -> CellCoord {
    let size = consts::GRID_CELL_SIZE as f64;
    CellCoord::new((pos.x / size).floor() as i32, (pos.y / size).floor() as i32)
}

/// World position of a cell's minimum corner
#[inline]
pub fn cell_origin(cell: CellCoord) -> DVec2 {
    let size = consts::GRID_CELL_SIZE as f64;
    DVec2::new(cell.x as f64 * size, cell.y as f64 * size)
}
