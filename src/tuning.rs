//! Data-driven game balance
//!
//! Every number the simulation uses that is not arena geometry lives here.
//! Defaults reproduce the stock game; hosts may load overrides from JSON.

use serde::{Deserialize, Serialize};

use crate::consts::CELLS_PER_SIDE;

/// Deepest accepted fall depth; anything lower keeps a fall going for ages
pub const MIN_FALL_DEPTH: f64 = -1.0e6;

/// Movement and falling constants
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PhysicsTuning {
    /// Per-tick velocity multiplier while rolling
    pub friction: f64,
    /// Per-tick velocity multiplier while a speed boost is active
    pub boosted_friction: f64,
    /// Velocity added per unit of acceleration intent
    pub acceleration: f64,
    /// Acceleration multiplier while boosted
    pub boost_multiplier: f64,
    pub gravity: f64,
    /// Height lost per falling tick is `gravity * fall_multiplier`
    pub fall_multiplier: f64,
    /// Horizontal velocity multiplier while falling
    pub fall_drift: f64,
    /// Fraction of velocity kept (and reversed) at the arena edge
    pub wall_bounce: f64,
    /// Velocity multiplier applied on obstacle contact (negative reflects)
    pub obstacle_reflect: f64,
    /// Position nudge after an obstacle hit, in ticks of the new velocity
    pub obstacle_nudge: f64,
    /// Height below which a fall is over
    pub fall_depth: f64,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            friction: 0.97,
            boosted_friction: 0.985,
            acceleration: 1.0,
            boost_multiplier: 2.0,
            gravity: 1.5,
            fall_multiplier: 4.0,
            fall_drift: 0.99,
            wall_bounce: 0.8,
            obstacle_reflect: -1.2,
            obstacle_nudge: 2.0,
            fall_depth: -700.0,
        }
    }
}

impl PhysicsTuning {
    /// Height lost per falling tick
    #[inline]
    pub fn fall_speed(&self) -> f64 {
        self.gravity * self.fall_multiplier
    }
}

/// Map generator probabilities
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GenerationTuning {
    pub hole_base: f64,
    pub hole_per_level: f64,
    /// Upper bound of the obstacle bucket on the same draw as holes
    pub obstacle_threshold: f64,
    pub diamond_threshold: f64,
    pub speed_boost_threshold: f64,
    pub extra_life_threshold: f64,
    pub hazard_chance: f64,
    pub hazard_min_level: u32,
    pub void_hazard_min_level: u32,
    /// Half-width of a hazard's oscillation range
    pub hazard_half_range: f64,
    pub hazard_speed: f64,
}

impl Default for GenerationTuning {
    fn default() -> Self {
        Self {
            hole_base: 0.10,
            hole_per_level: 0.02,
            obstacle_threshold: 0.15,
            diamond_threshold: 0.03,
            speed_boost_threshold: 0.035,
            extra_life_threshold: 0.037,
            hazard_chance: 0.025,
            hazard_min_level: 3,
            void_hazard_min_level: 4,
            hazard_half_range: 200.0,
            hazard_speed: 2.0,
        }
    }
}

impl GenerationTuning {
    /// Hole bucket upper bound for a level
    #[inline]
    pub fn hole_threshold(&self, level: u32) -> f64 {
        self.hole_base + level as f64 * self.hole_per_level
    }
}

/// Scoring, lives, timers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RulesTuning {
    pub starting_lives: u32,
    pub diamond_score: u32,
    pub diamonds_needed: u32,
    pub powerup_ticks: u32,
    pub crumble_min_level: u32,
    pub crumble_interval: u32,
    pub crumble_attempts: u32,
    /// Chebyshev radius (in cells) around the player searched by crumble
    pub crumble_radius: i32,
}

impl Default for RulesTuning {
    fn default() -> Self {
        Self {
            starting_lives: 3,
            diamond_score: 10,
            diamonds_needed: 5,
            powerup_ticks: 600,
            crumble_min_level: 5,
            crumble_interval: 120,
            crumble_attempts: 5,
            crumble_radius: 4,
        }
    }
}

/// Complete balance table
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Tuning {
    pub physics: PhysicsTuning,
    pub generation: GenerationTuning,
    pub rules: RulesTuning,
}

impl Tuning {
    /// Parse a (possibly partial) tuning table. Missing fields keep defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Clamp values that would break simulation invariants
    pub fn sanitized(mut self) -> Self {
        let defaults = Tuning::default();

        let p = &mut self.physics;
        if !(p.fall_depth < 0.0 && p.fall_depth >= MIN_FALL_DEPTH) {
            log::warn!(
                "fall_depth {} must be in [{}, 0), using default",
                p.fall_depth,
                MIN_FALL_DEPTH
            );
            p.fall_depth = defaults.physics.fall_depth;
        }
        if !(p.fall_speed() > 0.0 && p.fall_speed().is_finite()) {
            log::warn!("fall speed must be positive, using default gravity");
            p.gravity = defaults.physics.gravity;
            p.fall_multiplier = defaults.physics.fall_multiplier;
        }
        for (name, value) in [
            ("friction", &mut p.friction),
            ("boosted_friction", &mut p.boosted_friction),
            ("fall_drift", &mut p.fall_drift),
            ("wall_bounce", &mut p.wall_bounce),
        ] {
            if !(0.0..=1.0).contains(&*value) {
                log::warn!("{} {} outside [0, 1], clamping", name, value);
                // NaN survives clamp
                *value = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
            }
        }
        for (name, value, default) in [
            ("acceleration", &mut p.acceleration, defaults.physics.acceleration),
            ("boost_multiplier", &mut p.boost_multiplier, defaults.physics.boost_multiplier),
        ] {
            if !(value.is_finite() && *value >= 0.0) {
                log::warn!("{} {} must be finite and non-negative, using default", name, value);
                *value = default;
            }
        }
        for (name, value, default) in [
            ("obstacle_reflect", &mut p.obstacle_reflect, defaults.physics.obstacle_reflect),
            ("obstacle_nudge", &mut p.obstacle_nudge, defaults.physics.obstacle_nudge),
        ] {
            if !value.is_finite() {
                log::warn!("{} {} must be finite, using default", name, value);
                *value = default;
            }
        }

        let g = &mut self.generation;
        if !(g.hazard_speed > 0.0)
            || !(g.hazard_half_range > g.hazard_speed)
            || !g.hazard_half_range.is_finite()
        {
            log::warn!(
                "hazard speed {} / half range {} invalid, using defaults",
                g.hazard_speed,
                g.hazard_half_range
            );
            g.hazard_speed = defaults.generation.hazard_speed;
            g.hazard_half_range = defaults.generation.hazard_half_range;
        }

        let r = &mut self.rules;
        if r.crumble_interval == 0 {
            log::warn!("crumble_interval must be non-zero, using default");
            r.crumble_interval = defaults.rules.crumble_interval;
        }
        if !(0..=CELLS_PER_SIDE).contains(&r.crumble_radius) {
            log::warn!(
                "crumble_radius {} outside [0, {}], clamping",
                r.crumble_radius,
                CELLS_PER_SIDE
            );
            r.crumble_radius = r.crumble_radius.clamp(0, CELLS_PER_SIDE);
        }

        self
    }
}
