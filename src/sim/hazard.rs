//! Moving hazards
//!
//! Cell-sized entities that oscillate along one axis, independent of the
//! tile grid. Walls shove the ball along; void holes swallow it.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::GRID_CELL_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardKind {
    /// Pushes the ball along its motion axis
    Wall,
    /// Drops the ball
    VoidHole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    #[inline]
    pub fn of(self, v: DVec2) -> f64 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
        }
    }

    #[inline]
    pub fn component_mut(self, v: &mut DVec2) -> &mut f64 {
        match self {
            Axis::X => &mut v.x,
            Axis::Y => &mut v.y,
        }
    }

    /// Unit vector along this axis
    #[inline]
    pub fn unit(self) -> DVec2 {
        match self {
            Axis::X => DVec2::X,
            Axis::Y => DVec2::Y,
        }
    }
}

/// An oscillating hazard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovingHazard {
    pub kind: HazardKind,
    /// Minimum corner of the hazard's cell-sized box
    pub position: DVec2,
    pub axis: Axis,
    /// Bounds for `position[axis]`
    pub range: (f64, f64),
    /// Signed velocity along `axis`, units per tick
    pub speed: f64,
}

impl MovingHazard {
    /// Hazard oscillating `half_range` either side of its start position
    pub fn new(kind: HazardKind, position: DVec2, axis: Axis, half_range: f64, speed: f64) -> Self {
        let center = axis.of(position);
        Self {
            kind,
            position,
            axis,
            range: (center - half_range, center + half_range),
            speed,
        }
    }

    /// Advance one tick. Overshoot past a bound is mirrored back inside
    /// the range and the direction flips.
    pub fn advance(&mut self) {
        let (min, max) = self.range;
        let axis = self.axis;
        let p = axis.component_mut(&mut self.position);
        let mut next = *p + self.speed;
        if next > max {
            next = max - (next - max);
            self.speed = -self.speed;
        } else if next < min {
            next = min + (min - next);
            self.speed = -self.speed;
        }
        *p = next.clamp(min, max);
    }

    /// Strict containment of a point in the hazard's box
    pub fn contains(&self, point: DVec2) -> bool {
        let size = GRID_CELL_SIZE as f64;
        point.x > self.position.x
            && point.x < self.position.x + size
            && point.y > self.position.y
            && point.y < self.position.y + size
    }

    /// Displacement a wall applies to an overlapping ball this tick
    #[inline]
    pub fn push(&self) -> DVec2 {
        self.axis.unit() * self.speed
    }
}

/// Advance every hazard one tick, in list order
pub fn advance_all(hazards: &mut [MovingHazard]) {
    for hazard in hazards {
        hazard.advance();
    }
}
