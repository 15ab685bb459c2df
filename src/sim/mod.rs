//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per host frame, no wall clock
//! - Randomness only from a host-supplied source
//! - Stable iteration order (lattice order, hazard list order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod engine;
pub mod generate;
pub mod grid;
pub mod hazard;
pub mod physics;
pub mod progression;
pub mod random;
pub mod session;
pub mod state;
pub mod tick;

pub use collision::{Resolution, resolve};
pub use engine::{Direction, Engine};
pub use generate::{Level, generate_level};
pub use grid::{CellCoord, Grid, TileKind};
pub use hazard::{Axis, HazardKind, MovingHazard};
pub use physics::{EdgeBounce, PlayerState};
pub use progression::PortalOutcome;
pub use random::{SequenceSource, UniformSource};
pub use state::{
    FallCause, GameEvent, GameState, ProgressionState, SessionPhase, SessionState, Snapshot,
};
pub use tick::{TickInput, reset, tick};
