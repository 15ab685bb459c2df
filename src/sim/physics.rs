//! Player ball physics
//!
//! Frame-coupled integration: one call is one tick, no `dt`. Rolling applies
//! friction, input acceleration and an arena-edge bounce; falling ignores
//! input, drifts, and sinks at a constant rate.

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

use crate::consts::{BALL_RADIUS, GRID_LENGTH};
use crate::tuning::PhysicsTuning;

/// The player ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// `z` is height above the floor plane; 0 while rolling
    pub position: DVec3,
    pub velocity: DVec3,
    pub falling: bool,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::spawned()
    }
}

impl PlayerState {
    /// At rest on the spawn point
    pub fn spawned() -> Self {
        Self {
            position: DVec3::ZERO,
            velocity: DVec3::ZERO,
            falling: false,
        }
    }

    /// Horizontal position
    #[inline]
    pub fn planar(&self) -> DVec2 {
        self.position.truncate()
    }

    /// Return to the spawn point at rest
    pub fn respawn(&mut self) {
        *self = Self::spawned();
    }

    pub fn start_falling(&mut self) {
        self.falling = true;
    }
}

/// Which arena edges the ball bounced off this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeBounce {
    pub x: bool,
    pub y: bool,
}

impl EdgeBounce {
    pub fn any(self) -> bool {
        self.x || self.y
    }
}

/// Advance the ball one tick.
///
/// `accel` is the accumulated movement intent for this tick (unit per held
/// direction); it is ignored while falling.
pub fn step(
    player: &mut PlayerState,
    accel: DVec2,
    boosted: bool,
    tuning: &PhysicsTuning,
) -> EdgeBounce {
    if player.falling {
        player.position.z -= tuning.fall_speed();
        player.velocity.x *= tuning.fall_drift;
        player.velocity.y *= tuning.fall_drift;
        return EdgeBounce::default();
    }

    let (friction, gain) = if boosted {
        (tuning.boosted_friction, tuning.acceleration * tuning.boost_multiplier)
    } else {
        (tuning.friction, tuning.acceleration)
    };

    player.velocity.x = player.velocity.x * friction + accel.x * gain;
    player.velocity.y = player.velocity.y * friction + accel.y * gain;
    player.position.x += player.velocity.x;
    player.position.y += player.velocity.y;

    clamp_to_arena(player, tuning)
}

/// Keep the ball inside the arena walls, reflecting and damping velocity on
/// each axis that hit.
pub fn clamp_to_arena(player: &mut PlayerState, tuning: &PhysicsTuning) -> EdgeBounce {
    let limit = GRID_LENGTH as f64 - BALL_RADIUS;
    let mut bounce = EdgeBounce::default();

    let (px, vx) = (&mut player.position.x, &mut player.velocity.x);
    bounce.x = clamp_axis(px, vx, limit, tuning.wall_bounce);
    let (py, vy) = (&mut player.position.y, &mut player.velocity.y);
    bounce.y = clamp_axis(py, vy, limit, tuning.wall_bounce);

    bounce
}

fn clamp_axis(pos: &mut f64, vel: &mut f64, limit: f64, bounce: f64) -> bool {
    if *pos > limit {
        *pos = limit;
    } else if *pos < -limit {
        *pos = -limit;
    } else {
        return false;
    }
    *vel *= -bounce;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tuning() -> PhysicsTuning {
        PhysicsTuning::default()
    }

    #[test]
    fn test_friction_then_accel_then_integrate() {
        let mut p = PlayerState::spawned();
        p.velocity = DVec3::new(10.0, 0.0, 0.0);
        step(&mut p, DVec2::new(0.0, 1.0), false, &tuning());
        assert!((p.velocity.x - 9.7).abs() < 1e-9);
        assert!((p.velocity.y - 1.0).abs() < 1e-9);
        assert!((p.position.x - 9.7).abs() < 1e-9);
        assert!((p.position.y - 1.0).abs() < 1e-9);
        assert_eq!(p.position.z, 0.0);
    }

    #[test]
    fn test_boost_doubles_accel_and_lowers_friction() {
        let mut p = PlayerState::spawned();
        p.velocity = DVec3::new(10.0, 0.0, 0.0);
        step(&mut p, DVec2::new(0.0, 1.0), true, &tuning());
        assert!((p.velocity.x - 9.85).abs() < 1e-9);
        assert!((p.velocity.y - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_edge_bounce_flips_and_damps() {
        let mut p = PlayerState::spawned();
        p.position.x = GRID_LENGTH as f64;
        p.velocity.x = 5.0;
        let bounce = clamp_to_arena(&mut p, &tuning());
        assert!(bounce.x && !bounce.y);
        assert_eq!(p.position.x, GRID_LENGTH as f64 - BALL_RADIUS);
        assert!((p.velocity.x - -4.0).abs() < 1e-9);
    }

    #[test]
    fn test_edge_bounce_negative_side() {
        let mut p = PlayerState::spawned();
        p.position.y = -2000.0;
        p.velocity.y = -10.0;
        let bounce = clamp_to_arena(&mut p, &tuning());
        assert!(bounce.y);
        assert_eq!(p.position.y, -(GRID_LENGTH as f64 - BALL_RADIUS));
        assert!((p.velocity.y - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_falling_ignores_input_and_sinks() {
        let mut p = PlayerState::spawned();
        p.falling = true;
        p.velocity = DVec3::new(4.0, -2.0, 0.0);
        step(&mut p, DVec2::new(1.0, 1.0), true, &tuning());
        assert_eq!(p.position.z, -6.0);
        assert!((p.velocity.x - 3.96).abs() < 1e-9);
        assert!((p.velocity.y - -1.98).abs() < 1e-9);
        // no horizontal integration while falling
        assert_eq!(p.planar(), DVec2::ZERO);
    }

    #[test]
    fn test_respawn_clears_motion() {
        let mut p = PlayerState::spawned();
        p.position = DVec3::new(300.0, 10.0, -80.0);
        p.velocity = DVec3::new(1.0, 2.0, 0.0);
        p.falling = true;
        p.respawn();
        assert_eq!(p, PlayerState::spawned());
    }

    proptest! {
        #[test]
        fn prop_rolling_stays_on_floor_and_in_arena(
            inputs in proptest::collection::vec((-1.0f64..=1.0, -1.0f64..=1.0, any::<bool>()), 1..300)
        ) {
            let mut p = PlayerState::spawned();
            let limit = GRID_LENGTH as f64 - BALL_RADIUS;
            for (ax, ay, boosted) in inputs {
                step(&mut p, DVec2::new(ax, ay), boosted, &tuning());
                prop_assert_eq!(p.position.z, 0.0);
                prop_assert!(p.position.x.abs() <= limit);
                prop_assert!(p.position.y.abs() <= limit);
            }
        }
    }
}
