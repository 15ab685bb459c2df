//! Host-facing control surface
//!
//! The engine owns one simulation context and its random source. A host
//! frame loop feeds movement intent, calls [`Engine::tick`] once per frame,
//! and draws from [`Engine::snapshot`] in between.

use glam::DVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::random::UniformSource;
use super::state::{GameEvent, GameState, SessionPhase, Snapshot};
use super::tick::{TickInput, reset, tick};
use crate::tuning::Tuning;

/// Discrete movement directions, as bound to keys by a host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// +x
    Forward,
    /// -x
    Back,
    /// +y
    Left,
    /// -y
    Right,
}

impl Direction {
    pub fn unit(self) -> DVec2 {
        match self {
            Direction::Forward => DVec2::X,
            Direction::Back => DVec2::NEG_X,
            Direction::Left => DVec2::Y,
            Direction::Right => DVec2::NEG_Y,
        }
    }
}

/// A running game
pub struct Engine<R: UniformSource = Pcg32> {
    state: GameState,
    rng: R,
    /// Intent gathered since the last tick
    pending: TickInput,
}

impl Engine<Pcg32> {
    /// Reproducible engine from a seed
    pub fn from_seed(seed: u64, tuning: Tuning) -> Self {
        log::info!("Engine seeded with {}", seed);
        Self::new(Pcg32::seed_from_u64(seed), tuning)
    }
}

impl<R: UniformSource> Engine<R> {
    /// Start a session on level 1 using the host's random source
    pub fn new(mut rng: R, tuning: Tuning) -> Self {
        let state = GameState::new(tuning, &mut rng);
        Self {
            state,
            rng,
            pending: TickInput::default(),
        }
    }

    /// Queue movement intent for the next tick. Ignored unless the ball is
    /// rolling.
    pub fn apply_acceleration(&mut self, dx: f64, dy: f64) {
        if self.state.phase() != SessionPhase::Alive {
            log::trace!("Ignoring acceleration while {:?}", self.state.phase());
            return;
        }
        if !(dx.is_finite() && dy.is_finite()) {
            log::trace!("Ignoring non-finite acceleration ({}, {})", dx, dy);
            return;
        }
        self.pending.accel += DVec2::new(dx, dy);
    }

    /// Queue one unit of intent in a direction
    pub fn push(&mut self, direction: Direction) {
        let d = direction.unit();
        self.apply_acceleration(d.x, d.y);
    }

    /// Advance one frame, consuming queued intent
    pub fn tick(&mut self) -> Vec<GameEvent> {
        let input = std::mem::take(&mut self.pending);
        let events = tick(&mut self.state, &input, &mut self.rng);
        for event in &events {
            log::trace!("tick {}: {:?}", self.state.session.tick, event);
        }
        events
    }

    /// Throw the session away and start over on level 1
    pub fn reset(&mut self) -> GameEvent {
        self.pending = TickInput::default();
        reset(&mut self.state, &mut self.rng);
        GameEvent::Reset
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        self.state.snapshot()
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase()
    }

    pub fn tuning(&self) -> &Tuning {
        &self.state.tuning
    }

    /// Full context, for hosts that persist or inspect it
    pub fn state(&self) -> &GameState {
        &self.state
    }
}
