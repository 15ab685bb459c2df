//! Collision and event resolution
//!
//! One occupant check per tick: the tile under the ball's cell, then every
//! moving hazard whose box contains the ball. The arena-edge clamp has
//! already run as part of the physics step.

use glam::DVec2;

use super::grid::TileKind;
use super::hazard::HazardKind;
use super::progression::{PortalOutcome, enter_portal};
use super::random::UniformSource;
use super::state::{FallCause, GameEvent, GameState};
use crate::cell_of;

/// Whether the tick may carry on after resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Continue,
    /// The ball went through an open portal; the level was regenerated
    LevelAdvanced,
}

/// Apply tile and hazard effects for the ball's current position
pub fn resolve<R: UniformSource + ?Sized>(
    state: &mut GameState,
    rng: &mut R,
    events: &mut Vec<GameEvent>,
) -> Resolution {
    if resolve_tile(state, rng, events) == Resolution::LevelAdvanced {
        return Resolution::LevelAdvanced;
    }
    resolve_hazards(state, events);
    Resolution::Continue
}

fn resolve_tile<R: UniformSource + ?Sized>(
    state: &mut GameState,
    rng: &mut R,
    events: &mut Vec<GameEvent>,
) -> Resolution {
    let cell = cell_of(state.player.planar());
    let rules = &state.tuning.rules;

    let kind = state.grid.get(cell);
    if kind.is_item() {
        state.grid.set(cell, TileKind::Floor);
    }

    match kind {
        TileKind::Floor => {}
        TileKind::Hole => {
            if !state.player.falling {
                state.player.start_falling();
                events.push(GameEvent::FallStarted {
                    cause: FallCause::Hole(cell),
                });
            }
        }
        TileKind::Obstacle => {
            let physics = &state.tuning.physics;
            let v = state.player.velocity.truncate() * physics.obstacle_reflect;
            let nudge = v * physics.obstacle_nudge;
            state.player.velocity.x = v.x;
            state.player.velocity.y = v.y;
            state.player.position.x += nudge.x;
            state.player.position.y += nudge.y;
            events.push(GameEvent::ObstacleHit { cell });
        }
        TileKind::Diamond => {
            state.session.score = state.session.score.saturating_add(rules.diamond_score);
            state.progression.diamonds_collected += 1;
            log::debug!(
                "Diamond: score {} | {}/{}",
                state.session.score,
                state.progression.diamonds_collected,
                state.progression.diamonds_needed
            );
            events.push(GameEvent::DiamondCollected {
                cell,
                score: state.session.score,
                collected: state.progression.diamonds_collected,
                needed: state.progression.diamonds_needed,
            });
        }
        TileKind::SpeedBoost => {
            state.session.arm_powerup(rules.powerup_ticks);
            log::debug!("Speed boost activated");
            events.push(GameEvent::SpeedBoostActivated {
                cell,
                ticks: rules.powerup_ticks,
            });
        }
        TileKind::ExtraLife => {
            state.session.lives = state.session.lives.saturating_add(1);
            log::debug!("Extra life, lives: {}", state.session.lives);
            events.push(GameEvent::ExtraLife {
                cell,
                lives: state.session.lives,
            });
        }
        TileKind::Portal => {
            if let PortalOutcome::Advanced { .. } = enter_portal(state, rng, events) {
                return Resolution::LevelAdvanced;
            }
        }
    }

    Resolution::Continue
}

/// Every hazard containing the ball applies, in list order
fn resolve_hazards(state: &mut GameState, events: &mut Vec<GameEvent>) {
    for (index, hazard) in state.hazards.iter().enumerate() {
        if !hazard.contains(state.player.planar()) {
            continue;
        }
        match hazard.kind {
            HazardKind::Wall => {
                let push: DVec2 = hazard.push();
                state.player.position.x += push.x;
                state.player.position.y += push.y;
                events.push(GameEvent::WallPush { hazard: index });
            }
            HazardKind::VoidHole => {
                if !state.player.falling {
                    state.player.start_falling();
                    events.push(GameEvent::FallStarted {
                        cause: FallCause::VoidHazard(index),
                    });
                }
            }
        }
    }
}
