//! Discrete simulation tick
//!
//! Core game loop that advances the simulation one frame-coupled step:
//! physics → collision → hazard motion → session/progression upkeep.

use glam::DVec2;

use super::collision::{Resolution, resolve};
use super::hazard::advance_all;
use super::physics;
use super::random::UniformSource;
use super::session::{finish_fall_if_done, tick_crumble, tick_powerup};
use super::state::{GameEvent, GameState, ProgressionState, SessionState};

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Accumulated movement intent; one unit per held direction
    pub accel: DVec2,
}

impl TickInput {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            accel: DVec2::new(x, y),
        }
    }
}

/// Advance the game state by one tick and report what happened.
///
/// A no-op once the session is over; only [`reset`] leaves that state.
pub fn tick<R: UniformSource + ?Sized>(
    state: &mut GameState,
    input: &TickInput,
    rng: &mut R,
) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.session.game_over {
        return events;
    }

    state.session.tick += 1;
    let began_falling = state.player.falling;

    if began_falling {
        physics::step(&mut state.player, DVec2::ZERO, false, &state.tuning.physics);
        finish_fall_if_done(state, &mut events);
    } else {
        let boosted = state.session.powerup_active;
        let bounce = physics::step(&mut state.player, input.accel, boosted, &state.tuning.physics);
        if bounce.any() {
            events.push(GameEvent::EdgeBounce {
                x: bounce.x,
                y: bounce.y,
            });
        }
        if resolve(state, rng, &mut events) == Resolution::LevelAdvanced {
            // fresh layout; hazards start moving next tick
            return events;
        }
    }

    advance_all(&mut state.hazards);

    // upkeep counts alive ticks only; the respawn tick began mid-fall
    if !began_falling && !state.player.falling && !state.session.game_over {
        tick_powerup(state, &mut events);
        tick_crumble(state, rng, &mut events);
    }

    events
}

/// Discard the session and start over on level 1.
///
/// Safe from any state, including mid-fall and after game over.
pub fn reset<R: UniformSource + ?Sized>(state: &mut GameState, rng: &mut R) {
    state.session = SessionState::new(&state.tuning.rules);
    state.progression = ProgressionState::new(&state.tuning.rules);
    state.player.respawn();
    state.load_level(1, rng);
    log::info!("Game restarted (level 1)");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{BALL_RADIUS, GRID_LENGTH};
    use crate::sim::grid::{CellCoord, Grid, TileKind};
    use crate::sim::hazard::{Axis, HazardKind, MovingHazard};
    use crate::sim::random::SequenceSource;
    use crate::sim::state::SessionPhase;
    use crate::tuning::Tuning;
    use glam::DVec3;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn open_floor(seed: u64) -> (GameState, Pcg32) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut state = GameState::new(Tuning::default(), &mut rng);
        state.grid = Grid::new();
        state.grid.set(CellCoord::portal(), TileKind::Portal);
        state.hazards.clear();
        (state, rng)
    }

    fn fall_out(state: &mut GameState, rng: &mut Pcg32) -> Vec<GameEvent> {
        state.player.start_falling();
        let mut all = Vec::new();
        while state.player.falling && !state.session.game_over {
            all.extend(tick(state, &TickInput::default(), rng));
        }
        all
    }

    #[test]
    fn test_tick_counts_and_moves() {
        let (mut state, mut rng) = open_floor(1);
        let events = tick(&mut state, &TickInput::new(1.0, 0.0), &mut rng);
        assert!(events.is_empty());
        assert_eq!(state.session.tick, 1);
        assert_eq!(state.player.position, DVec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_edge_bounce_event() {
        let (mut state, mut rng) = open_floor(1);
        state.player.position.x = GRID_LENGTH as f64 - BALL_RADIUS - 1.0;
        state.player.velocity.x = 10.0;
        let events = tick(&mut state, &TickInput::default(), &mut rng);
        assert_eq!(events, vec![GameEvent::EdgeBounce { x: true, y: false }]);
        assert!(state.player.velocity.x < 0.0);
    }

    #[test]
    fn test_four_diamonds_leave_portal_locked() {
        let (mut state, mut rng) = open_floor(2);
        for y in 0..5 {
            state.grid.set(CellCoord::new(6, y), TileKind::Diamond);
        }
        for y in 0..4 {
            state.player.position = DVec3::new(310.0, 50.0 * y as f64 + 10.0, 0.0);
            tick(&mut state, &TickInput::default(), &mut rng);
        }
        assert_eq!(state.progression.diamonds_collected, 4);

        state.player.position = DVec3::new(1120.0, 1120.0, 0.0);
        let events = tick(&mut state, &TickInput::default(), &mut rng);
        assert_eq!(state.progression.level, 1);
        assert!(events.contains(&GameEvent::PortalLocked { missing: 1 }));

        state.player.position = DVec3::new(310.0, 210.0, 0.0);
        tick(&mut state, &TickInput::default(), &mut rng);
        assert_eq!(state.progression.diamonds_collected, 5);

        state.player.position = DVec3::new(1120.0, 1120.0, 0.0);
        let events = tick(&mut state, &TickInput::default(), &mut rng);
        assert_eq!(state.progression.level, 2);
        assert_eq!(state.progression.diamonds_collected, 0);
        assert!(events.contains(&GameEvent::LevelComplete { completed: 1, next: 2 }));
        assert_eq!(state.session.score, 50);
    }

    #[test]
    fn test_third_fall_ends_game() {
        let (mut state, mut rng) = open_floor(3);
        assert_eq!(state.session.lives, 3);

        fall_out(&mut state, &mut rng);
        assert_eq!(state.phase(), SessionPhase::Alive);
        assert_eq!(state.session.lives, 2);

        fall_out(&mut state, &mut rng);
        assert_eq!(state.phase(), SessionPhase::Alive);
        assert_eq!(state.session.lives, 1);

        let events = fall_out(&mut state, &mut rng);
        assert_eq!(state.phase(), SessionPhase::GameOver);
        assert!(events.iter().any(|e| matches!(e, GameEvent::GameOver { .. })));
    }

    #[test]
    fn test_fall_takes_until_below_depth() {
        let (mut state, mut rng) = open_floor(3);
        state.player.start_falling();
        // 6 units per tick, strictly below -700 needs 117 ticks
        for _ in 0..116 {
            tick(&mut state, &TickInput::default(), &mut rng);
        }
        assert!(state.player.falling);
        tick(&mut state, &TickInput::default(), &mut rng);
        assert!(!state.player.falling);
        assert_eq!(state.player.position, DVec3::ZERO);
    }

    #[test]
    fn test_game_over_is_inert() {
        let (mut state, mut rng) = open_floor(4);
        state.session.game_over = true;
        let before = state.clone();
        let events = tick(&mut state, &TickInput::new(1.0, 1.0), &mut rng);
        assert!(events.is_empty());
        assert_eq!(state.player, before.player);
        assert_eq!(state.session, before.session);
    }

    #[test]
    fn test_crumble_after_exactly_interval() {
        let (mut state, _) = open_floor(5);
        state.progression.level = 5;
        let mut rng = SequenceSource::new([0.3, 0.7]);
        for _ in 0..119 {
            tick(&mut state, &TickInput::default(), &mut rng);
        }
        assert_eq!(state.grid.count(TileKind::Hole), 0);
        let events = tick(&mut state, &TickInput::default(), &mut rng);
        assert_eq!(state.grid.count(TileKind::Hole), 1);
        let crumbled = events
            .iter()
            .find_map(|e| match e {
                GameEvent::TileCrumbled { cell } => Some(*cell),
                _ => None,
            })
            .unwrap();
        assert!(crumbled.x.abs() <= 4 && crumbled.y.abs() <= 4);
    }

    #[test]
    fn test_crumble_paused_while_falling() {
        let (mut state, mut rng) = open_floor(6);
        state.progression.level = 5;
        state.player.start_falling();
        for _ in 0..50 {
            tick(&mut state, &TickInput::default(), &mut rng);
        }
        assert_eq!(state.progression.crumble_timer, 0);
    }

    #[test]
    fn test_respawn_tick_skips_upkeep() {
        let (mut state, mut rng) = open_floor(6);
        state.progression.level = 5;
        state.progression.crumble_timer = 119;
        state.session.arm_powerup(40);
        state.player.start_falling();
        state.player.position.z = -699.0;

        let events = tick(&mut state, &TickInput::default(), &mut rng);
        assert!(events.contains(&GameEvent::Respawned));
        assert_eq!(state.session.powerup_timer, 40);
        assert_eq!(state.progression.crumble_timer, 119);

        tick(&mut state, &TickInput::default(), &mut rng);
        assert_eq!(state.session.powerup_timer, 39);
        assert_eq!(state.progression.crumble_timer, 0);
    }

    #[test]
    fn test_oversized_crumble_radius_does_not_panic() {
        let tuning = Tuning::from_json(r#"{ "rules": { "crumble_radius": 2000000000 } }"#).unwrap();
        let mut rng = Pcg32::seed_from_u64(12);
        let mut state = GameState::new(tuning, &mut rng);
        state.grid = Grid::new();
        state.hazards.clear();
        state.progression.level = 5;
        for _ in 0..130 {
            tick(&mut state, &TickInput::default(), &mut rng);
        }
        assert_eq!(state.session.tick, 130);
    }

    #[test]
    fn test_deep_fall_depth_still_ends_fall() {
        let tuning = Tuning::from_json(r#"{ "physics": { "fall_depth": -1e308 } }"#).unwrap();
        let mut rng = Pcg32::seed_from_u64(13);
        let mut state = GameState::new(tuning, &mut rng);
        state.grid = Grid::new();
        state.hazards.clear();
        state.player.start_falling();
        for _ in 0..200 {
            tick(&mut state, &TickInput::default(), &mut rng);
        }
        assert!(!state.player.falling);
        assert_eq!(state.session.lives, 2);
    }

    #[test]
    fn test_powerup_runs_out_and_restores_base_physics() {
        let (mut state, mut rng) = open_floor(7);
        state.session.arm_powerup(3);
        let mut expired = false;
        for _ in 0..3 {
            let events = tick(&mut state, &TickInput::default(), &mut rng);
            expired |= events.contains(&GameEvent::SpeedBoostExpired);
        }
        assert!(expired);
        assert!(!state.session.powerup_active);

        let v0 = state.player.velocity.x;
        tick(&mut state, &TickInput::new(1.0, 0.0), &mut rng);
        assert!((state.player.velocity.x - (v0 * 0.97 + 1.0)).abs() < 1e-9);
    }

    #[test]
    fn test_hazards_advance_each_tick() {
        let (mut state, mut rng) = open_floor(8);
        state.hazards.push(MovingHazard::new(
            HazardKind::Wall,
            glam::DVec2::new(-600.0, 600.0),
            Axis::X,
            200.0,
            2.0,
        ));
        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), &mut rng);
        }
        assert_eq!(state.hazards[0].position.x, -580.0);
    }

    #[test]
    fn test_moving_wall_carries_ball() {
        let (mut state, mut rng) = open_floor(9);
        state.hazards.push(MovingHazard::new(
            HazardKind::Wall,
            glam::DVec2::new(400.0, 400.0),
            Axis::X,
            200.0,
            2.0,
        ));
        state.player.position = DVec3::new(420.0, 425.0, 0.0);
        let events = tick(&mut state, &TickInput::default(), &mut rng);
        assert_eq!(events, vec![GameEvent::WallPush { hazard: 0 }]);
        assert_eq!(state.player.position.x, 422.0);
        assert_eq!(state.hazards[0].position.x, 402.0);
    }

    #[test]
    fn test_reset_from_any_state_is_idempotent() {
        let (mut state, mut rng) = open_floor(10);
        state.progression.level = 6;
        state.session.score = 900;
        state.session.lives = 0;
        state.session.game_over = true;
        state.player.start_falling();
        state.player.position.z = -300.0;

        reset(&mut state, &mut rng);
        let once = (state.session.clone(), state.progression.clone());
        reset(&mut state, &mut rng);
        assert_eq!((state.session.clone(), state.progression.clone()), once);
        assert_eq!(state.session.lives, 3);
        assert_eq!(state.session.score, 0);
        assert_eq!(state.progression.level, 1);
        assert_eq!(state.phase(), SessionPhase::Alive);
        assert_eq!(state.player.position, DVec3::ZERO);
    }

    #[test]
    fn test_same_seed_same_run() {
        let run = |seed| {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut state = GameState::new(Tuning::default(), &mut rng);
            state.progression.level = 5;
            let inputs = [TickInput::new(1.0, 0.0), TickInput::new(0.0, -1.0), TickInput::default()];
            for i in 0..600 {
                tick(&mut state, &inputs[i % inputs.len()], &mut rng);
            }
            (state.player, state.session, state.grid)
        };
        assert_eq!(run(77), run(77));
    }

    proptest! {
        #[test]
        fn prop_rolling_ball_stays_on_floor(
            seed in any::<u64>(),
            level in 1u32..8,
            inputs in proptest::collection::vec((-1i8..=1, -1i8..=1), 1..400),
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut state = GameState::new(Tuning::default(), &mut rng);
            state.load_level(level, &mut rng);
            for (ax, ay) in inputs {
                tick(&mut state, &TickInput::new(ax as f64, ay as f64), &mut rng);
                if !state.player.falling {
                    prop_assert_eq!(state.player.position.z, 0.0);
                }
                for hazard in &state.hazards {
                    let p = hazard.axis.of(hazard.position);
                    prop_assert!(p >= hazard.range.0 && p <= hazard.range.1);
                }
            }
        }
    }
}
