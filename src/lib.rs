//! Torus Flock - a headless flocking kernel
//!
//! Core modules:
//! - `sim`: Deterministic simulation (boid state, neighbor queries, flocking)
//! - `settings`: Data-driven run configuration
//! - `error`: Error type shared by the kernel and the settings layer

pub mod error;
pub mod settings;
pub mod sim;

pub use error::FlockError;
pub use settings::Settings;

use glam::DVec2;
use std::f64::consts::{PI, TAU};

/// Kernel configuration constants
pub mod consts {
    /// Half-angle of the forward perception cone (radians).
    /// Wide enough that only a narrow wedge behind a boid is blind.
    pub const PERCEPTION_HALF_ANGLE: f64 = 4.0 * std::f64::consts::PI / 5.0;

    /// Spawn speed range
    pub const DEFAULT_MIN_SPEED: f64 = 0.5;
    pub const DEFAULT_MAX_SPEED: f64 = 1.5;

    /// Boid size scales with the size multiplier: min = 5x, variance = 2.5x
    pub const MIN_SIZE_PER_MULTIPLIER: f64 = 5.0;
    pub const SIZE_VARIANCE_PER_MULTIPLIER: f64 = 2.5;

    /// Upper bounds of the random kick applied by a disrupt
    pub const DISRUPT_HEADING_JITTER: f64 = 5.0;
    pub const DISRUPT_SPEED_JITTER: f64 = 0.5;
}

/// Fold an angle into [0, 2π)
#[inline]
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid may round a tiny negative input up to exactly TAU
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Unit vector pointing along `angle`
#[inline]
pub fn to_cartesian(angle: f64) -> DVec2 {
    DVec2::new(angle.cos(), angle.sin())
}

/// Angle of the vector (x, y), counterclockwise from +x, in [0, 2π).
///
/// Computed per quadrant from `atan(|y / x|)`. The zero vector maps to 0.
pub fn to_polar(x: f64, y: f64) -> f64 {
    if x == 0.0 && y == 0.0 {
        return 0.0;
    }

    let base = (y / x).abs().atan();
    let angle = if x >= 0.0 {
        if y >= 0.0 { base } else { TAU - base }
    } else if y >= 0.0 {
        PI - base
    } else {
        PI + base
    };

    if angle >= TAU { 0.0 } else { angle }
}
