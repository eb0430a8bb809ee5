//! Boid state and the toroidal world it moves on

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::angle::PerceptionCone;
use crate::{to_cartesian, to_polar};

/// Extents of the torus. Leaving one edge re-enters at the opposite one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub width: f64,
    pub height: f64,
}

impl World {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Wrap a point back onto the torus
    #[inline]
    pub fn wrap(&self, p: DVec2) -> DVec2 {
        DVec2::new(wrap_coordinate(p.x, self.width), wrap_coordinate(p.y, self.height))
    }

    #[inline]
    pub fn contains(&self, p: DVec2) -> bool {
        (0.0..self.width).contains(&p.x) && (0.0..self.height).contains(&p.y)
    }
}

/// `coord mod extent` in [0, extent), also for negative and oversized inputs
#[inline]
fn wrap_coordinate(coord: f64, extent: f64) -> f64 {
    let wrapped = (coord + extent).rem_euclid(extent);
    if wrapped >= extent { 0.0 } else { wrapped }
}

/// A single flocking agent.
///
/// Heading is in radians and is not renormalized after a disrupt. Speed is
/// in world units per tick at speed multiplier 1. NaN or infinite fields
/// are not guarded against; results are meaningless from then on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boid {
    pub position: DVec2,
    pub heading: f64,
    pub speed: f64,
    /// Fixed at spawn; only consumed by whoever draws the boid
    pub size: f64,
}

impl Boid {
    pub fn new(position: DVec2, heading: f64, speed: f64, size: f64) -> Self {
        Self {
            position,
            heading,
            speed,
            size,
        }
    }

    /// Displacement for one tick at the given speed multiplier
    #[inline]
    pub fn displacement(&self, speed_multiplier: f64) -> DVec2 {
        to_cartesian(self.heading) * (self.speed * speed_multiplier)
    }

    /// Move along the current heading and wrap onto the torus
    pub fn advance(&mut self, speed_multiplier: f64, world: &World) {
        self.position = world.wrap(self.position + self.displacement(speed_multiplier));
    }

    #[inline]
    pub fn distance_squared(&self, other: &Boid) -> f64 {
        self.position.distance_squared(other.position)
    }

    /// Does `other` perceive `self`?
    ///
    /// True when `self` is within the cone's radius of `other` and the
    /// bearing from `other` to `self` lies inside the cone centred on
    /// `other.heading`. The relation is not symmetric.
    pub fn is_neighbor_of(&self, other: &Boid, cone: &PerceptionCone) -> bool {
        if self.distance_squared(other) > cone.distance_squared {
            return false;
        }
        let delta = self.position - other.position;
        let bearing = to_polar(delta.x, delta.y);
        cone.contains_bearing(other.heading, bearing)
    }
}
