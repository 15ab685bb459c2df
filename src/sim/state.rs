//! Game state and core simulation types
//!
//! Everything one running session owns lives in [`GameState`]. Hosts read it
//! through [`Snapshot`] between ticks.

use serde::{Deserialize, Serialize};

use super::generate::{Level, generate_level};
use super::grid::{CellCoord, Grid};
use super::hazard::MovingHazard;
use super::physics::PlayerState;
use super::random::UniformSource;
use crate::tuning::{RulesTuning, Tuning};

/// Session bookkeeping: score, lives, power-up, tick counter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub score: u32,
    pub lives: u32,
    /// Terminal until `reset`
    pub game_over: bool,
    pub powerup_active: bool,
    /// Ticks of boost remaining
    pub powerup_timer: u32,
    /// Ticks simulated since the last reset
    pub tick: u64,
}

impl SessionState {
    pub fn new(rules: &RulesTuning) -> Self {
        Self {
            score: 0,
            lives: rules.starting_lives,
            game_over: false,
            powerup_active: false,
            powerup_timer: 0,
            tick: 0,
        }
    }

    /// Start (or restart) the speed boost
    pub fn arm_powerup(&mut self, ticks: u32) {
        self.powerup_active = ticks > 0;
        self.powerup_timer = ticks;
    }
}

/// Level progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionState {
    pub level: u32,
    pub diamonds_collected: u32,
    pub diamonds_needed: u32,
    /// Alive ticks since the last crumble attempt
    pub crumble_timer: u32,
}

impl ProgressionState {
    pub fn new(rules: &RulesTuning) -> Self {
        Self {
            level: 1,
            diamonds_collected: 0,
            diamonds_needed: rules.diamonds_needed,
            crumble_timer: 0,
        }
    }

    /// Portal unlocked for this level
    pub fn portal_open(&self) -> bool {
        self.diamonds_collected >= self.diamonds_needed
    }

    pub fn diamonds_remaining(&self) -> u32 {
        self.diamonds_needed.saturating_sub(self.diamonds_collected)
    }
}

/// Coarse lifecycle of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    Alive,
    Falling,
    GameOver,
}

/// What made the ball fall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FallCause {
    Hole(CellCoord),
    /// Index into the hazard list
    VoidHazard(usize),
}

/// Something observable that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    EdgeBounce { x: bool, y: bool },
    ObstacleHit { cell: CellCoord },
    DiamondCollected { cell: CellCoord, score: u32, collected: u32, needed: u32 },
    SpeedBoostActivated { cell: CellCoord, ticks: u32 },
    SpeedBoostExpired,
    ExtraLife { cell: CellCoord, lives: u32 },
    PortalLocked { missing: u32 },
    LevelComplete { completed: u32, next: u32 },
    FallStarted { cause: FallCause },
    WallPush { hazard: usize },
    LifeLost { remaining: u32 },
    Respawned,
    GameOver { score: u32, level: u32 },
    TileCrumbled { cell: CellCoord },
    Reset,
}

/// Complete simulation context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub grid: Grid,
    /// Hazards in generation order
    pub hazards: Vec<MovingHazard>,
    pub player: PlayerState,
    pub session: SessionState,
    pub progression: ProgressionState,
    pub tuning: Tuning,
}

impl GameState {
    /// Fresh session on level 1
    pub fn new<R: UniformSource + ?Sized>(tuning: Tuning, rng: &mut R) -> Self {
        let Level { grid, hazards } = generate_level(1, rng, &tuning.generation);
        Self {
            grid,
            hazards,
            player: PlayerState::spawned(),
            session: SessionState::new(&tuning.rules),
            progression: ProgressionState::new(&tuning.rules),
            tuning,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.snapshot().phase()
    }

    /// Replace grid and hazards with a new layout for `level`
    pub fn load_level<R: UniformSource + ?Sized>(&mut self, level: u32, rng: &mut R) {
        let Level { grid, hazards } = generate_level(level, rng, &self.tuning.generation);
        self.grid = grid;
        self.hazards = hazards;
        self.progression.level = level;
        self.progression.diamonds_collected = 0;
        self.progression.crumble_timer = 0;
    }

    /// Borrowed read-only view for presentation
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            grid: &self.grid,
            hazards: &self.hazards,
            player: &self.player,
            session: &self.session,
            progression: &self.progression,
        }
    }
}

/// Read-only view of the simulation between ticks
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Snapshot<'a> {
    pub grid: &'a Grid,
    pub hazards: &'a [MovingHazard],
    pub player: &'a PlayerState,
    pub session: &'a SessionState,
    pub progression: &'a ProgressionState,
}

impl Snapshot<'_> {
    pub fn phase(&self) -> SessionPhase {
        if self.session.game_over {
            SessionPhase::GameOver
        } else if self.player.falling {
            SessionPhase::Falling
        } else {
            SessionPhase::Alive
        }
    }

    /// Remaining boost as a fraction of a full pickup, for a HUD bar
    pub fn powerup_fraction(&self, full_ticks: u32) -> f64 {
        if !self.session.powerup_active || full_ticks == 0 {
            return 0.0;
        }
        (self.session.powerup_timer as f64 / full_ticks as f64).clamp(0.0, 1.0)
    }

    pub fn portal_cell(&self) -> CellCoord {
        CellCoord::portal()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
