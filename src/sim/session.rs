//! Session lifecycle: lives, respawn, game over, power-up timer, crumble
//!
//! `Alive → Falling` happens in the collision resolver. This module owns
//! what follows: finishing a fall, counting down the boost, and the late
//! level crumbling floor.

use super::grid::TileKind;
use super::random::UniformSource;
use super::state::{GameEvent, GameState};
use crate::cell_of;

/// Falling tick bookkeeping. Call after the physics step while falling.
///
/// Once the ball sinks past the fall depth a life is spent. With lives left
/// the ball respawns; otherwise the session is over.
pub fn finish_fall_if_done(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if !state.player.falling || state.player.position.z >= state.tuning.physics.fall_depth {
        return;
    }

    state.session.lives = state.session.lives.saturating_sub(1);
    let remaining = state.session.lives;
    events.push(GameEvent::LifeLost { remaining });

    if remaining > 0 {
        state.player.respawn();
        log::debug!("Respawned, {} lives left", remaining);
        events.push(GameEvent::Respawned);
    } else {
        state.session.game_over = true;
        log::info!(
            "Game over on level {} with score {}",
            state.progression.level,
            state.session.score
        );
        events.push(GameEvent::GameOver {
            score: state.session.score,
            level: state.progression.level,
        });
    }
}

/// Count the speed boost down by one alive tick
pub fn tick_powerup(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let session = &mut state.session;
    if !session.powerup_active {
        return;
    }
    session.powerup_timer = session.powerup_timer.saturating_sub(1);
    if session.powerup_timer == 0 {
        session.powerup_active = false;
        log::debug!("Speed boost ended");
        events.push(GameEvent::SpeedBoostExpired);
    }
}

/// Late-level floor decay. Every `crumble_interval` alive ticks, try a few
/// random cells around the ball and turn the first plain floor into a hole.
pub fn tick_crumble<R: UniformSource + ?Sized>(
    state: &mut GameState,
    rng: &mut R,
    events: &mut Vec<GameEvent>,
) {
    let rules = &state.tuning.rules;
    if state.progression.level < rules.crumble_min_level {
        return;
    }

    state.progression.crumble_timer += 1;
    if state.progression.crumble_timer < rules.crumble_interval {
        return;
    }
    state.progression.crumble_timer = 0;

    let center = cell_of(state.player.planar());
    for _ in 0..rules.crumble_attempts {
        let dx = rng.next_offset(rules.crumble_radius);
        let dy = rng.next_offset(rules.crumble_radius);
        let target = center.offset(dx, dy);
        // Off-lattice cells have no tile to crumble
        if state.grid.contains(target) && state.grid.get(target) == TileKind::Floor {
            state.grid.set(target, TileKind::Hole);
            log::debug!("Floor at {:?} crumbled", target);
            events.push(GameEvent::TileCrumbled { cell: target });
            return;
        }
    }
}
