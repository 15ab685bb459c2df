//! Level progression
//!
//! `Playing(N)` → `LevelComplete` → `Playing(N + 1)`. The middle state is
//! instantaneous: it exists only as the [`GameEvent::LevelComplete`] event.

use super::random::UniformSource;
use super::state::{GameEvent, GameState};

/// Outcome of stepping onto the portal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortalOutcome {
    Locked { missing: u32 },
    Advanced { level: u32 },
}

/// Try to leave the level through the portal
pub fn enter_portal<R: UniformSource + ?Sized>(
    state: &mut GameState,
    rng: &mut R,
    events: &mut Vec<GameEvent>,
) -> PortalOutcome {
    if !state.progression.portal_open() {
        let missing = state.progression.diamonds_remaining();
        log::debug!("Portal locked, {} diamonds missing", missing);
        events.push(GameEvent::PortalLocked { missing });
        return PortalOutcome::Locked { missing };
    }

    let completed = state.progression.level;
    let next = completed.saturating_add(1);
    log::info!("Level {} complete", completed);
    events.push(GameEvent::LevelComplete { completed, next });

    advance_to(state, next, rng);
    PortalOutcome::Advanced { level: next }
}

/// Jump straight to `level`: new layout, ball back on the spawn point
pub fn advance_to<R: UniformSource + ?Sized>(state: &mut GameState, level: u32, rng: &mut R) {
    state.player.respawn();
    state.load_level(level, rng);
}
