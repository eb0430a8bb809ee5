//! Circular statistics and perception-cone geometry
//!
//! Angles are averaged as unit vectors: each angle becomes (cos, sin),
//! optionally scaled by a weight, the vectors are summed and the sum is
//! turned back into an angle. An arithmetic mean of raw angle values would
//! put the mean of 0.1 and 6.2 near π instead of near 0.

use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::consts::PERCEPTION_HALF_ANGLE;
use crate::error::FlockError;
use crate::{to_cartesian, to_polar, wrap_angle};

/// Resultants shorter than this fraction of the total weight count as zero
const DEGENERATE_RESULTANT: f64 = 1e-12;

/// Angle of the sum of weighted unit vectors.
///
/// A resultant that cancels out (empty input, all-zero weights, opposed
/// angles) yields 0. Opposed angles leave a residue of order 1e-16 from
/// `sin(π)`, so cancellation is judged relative to the total weight.
fn resultant_angle(pairs: impl Iterator<Item = (f64, f64)>) -> f64 {
    let (sum, total_weight) = pairs.fold((DVec2::ZERO, 0.0), |(acc, total), (angle, weight)| {
        (acc + to_cartesian(angle) * weight, total + weight.abs())
    });
    if sum.length() <= total_weight * DEGENERATE_RESULTANT {
        return 0.0;
    }
    to_polar(sum.x, sum.y)
}

/// Unweighted circular mean of `angles`
pub fn circular_mean(angles: &[f64]) -> f64 {
    resultant_angle(angles.iter().map(|&a| (a, 1.0)))
}

/// Circular mean of `angles` with one weight per angle.
///
/// Fails with [`FlockError::InvalidArgument`] when the slices differ in
/// length.
pub fn weighted_circular_mean(angles: &[f64], weights: &[f64]) -> Result<f64, FlockError> {
    if angles.len() != weights.len() {
        return Err(FlockError::InvalidArgument {
            angles: angles.len(),
            weights: weights.len(),
        });
    }
    Ok(resultant_angle(angles.iter().copied().zip(weights.iter().copied())))
}

/// Blend `toward` into `from` with the given weight: weight 1 returns
/// `toward`, weight 0 returns `from`.
pub(crate) fn blend_angles(toward: f64, from: f64, weight: f64) -> f64 {
    resultant_angle([(toward, weight), (from, 1.0 - weight)].into_iter())
}

/// How the cone's angular window is compared against a bearing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConeWindow {
    /// Raw `heading - Δ <= bearing <= heading + Δ` compare. Misses
    /// bearings on the far side of 0/2π when the window crosses it.
    Unwrapped,
    /// Shortest signed angular difference, correct across 0/2π and for
    /// headings outside [0, 2π)
    #[default]
    Wrapped,
}

impl ConeWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConeWindow::Unwrapped => "unwrapped",
            ConeWindow::Wrapped => "wrapped",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "unwrapped" | "reference" => Some(ConeWindow::Unwrapped),
            "wrapped" => Some(ConeWindow::Wrapped),
            _ => None,
        }
    }

    /// Is `bearing` within `heading ± half_angle`?
    pub fn contains(&self, heading: f64, half_angle: f64, bearing: f64) -> bool {
        match self {
            ConeWindow::Unwrapped => {
                heading - half_angle <= bearing && bearing <= heading + half_angle
            }
            ConeWindow::Wrapped => signed_difference(bearing, heading).abs() <= half_angle,
        }
    }
}

/// `a - b` folded into [-π, π)
pub fn signed_difference(a: f64, b: f64) -> f64 {
    wrap_angle(a - b + PI) - PI
}

/// Distance and angle limits of the forward perception cone.
///
/// Distances are always compared squared; `distance_squared` is the square
/// of the perception radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerceptionCone {
    pub distance_squared: f64,
    pub half_angle: f64,
    pub window: ConeWindow,
}

impl PerceptionCone {
    /// Cone reaching `radius * size_multiplier` with the fixed half-angle
    pub fn new(radius: f64, size_multiplier: f64, window: ConeWindow) -> Self {
        let reach = radius * size_multiplier;
        Self {
            distance_squared: reach * reach,
            half_angle: PERCEPTION_HALF_ANGLE,
            window,
        }
    }

    /// Perception radius (square root of the stored threshold)
    pub fn reach(&self) -> f64 {
        self.distance_squared.sqrt()
    }

    #[inline]
    pub fn contains_bearing(&self, heading: f64, bearing: f64) -> bool {
        self.window.contains(heading, self.half_angle, bearing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, TAU};

    const EPS: f64 = 1e-9;

    #[test]
    fn test_mean_of_identical_angles() {
        for a in [0.0, 0.3, FRAC_PI_2, 2.0, PI, 4.5, TAU - 0.01] {
            assert!(signed_difference(circular_mean(&[a, a]), a).abs() < EPS, "angle {a}");
        }
    }

    #[test]
    fn test_mean_across_zero() {
        // Arithmetic mean would give ~π here
        let mean = circular_mean(&[0.1, TAU - 0.1]);
        assert!(signed_difference(mean, 0.0).abs() < EPS);
    }

    #[test]
    fn test_mean_of_opposite_angles_is_zero() {
        assert_eq!(circular_mean(&[0.0, PI]), 0.0);
        assert_eq!(circular_mean(&[FRAC_PI_2, 3.0 * FRAC_PI_2]), 0.0);
        assert_eq!(weighted_circular_mean(&[PI, 0.0], &[0.5, 0.5]).unwrap(), 0.0);
    }

    #[test]
    fn test_small_but_real_resultant_is_kept() {
        // Nearly opposed, but the 0.01 rad gap is far above the cutoff
        let mean = circular_mean(&[0.0, PI - 0.01]);
        assert!((mean - (PI - 0.01) / 2.0).abs() < EPS);
    }

    #[test]
    fn test_mean_of_nothing() {
        assert_eq!(circular_mean(&[]), 0.0);
        assert_eq!(weighted_circular_mean(&[1.0, 2.0], &[0.0, 0.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_weighted_blend_extremes() {
        let (a, b) = (0.4, 2.9);
        let only_a = weighted_circular_mean(&[a, b], &[1.0, 0.0]).unwrap();
        let only_b = weighted_circular_mean(&[a, b], &[0.0, 1.0]).unwrap();
        assert!((only_a - a).abs() < EPS);
        assert!((only_b - b).abs() < EPS);

        assert!((blend_angles(a, b, 1.0) - a).abs() < EPS);
        assert!((blend_angles(a, b, 0.0) - b).abs() < EPS);
    }

    #[test]
    fn test_weighted_mean_length_mismatch() {
        let err = weighted_circular_mean(&[0.0, 1.0], &[1.0]).unwrap_err();
        assert!(matches!(
            err,
            FlockError::InvalidArgument {
                angles: 2,
                weights: 1
            }
        ));
    }

    #[test]
    fn test_unwrapped_window_misses_across_zero() {
        // Heading just above 0, bearing just below 2π: 0.2 rad apart
        let (heading, bearing) = (0.1, TAU - 0.1);
        assert!(!ConeWindow::Unwrapped.contains(heading, 0.5, bearing));
        assert!(ConeWindow::Wrapped.contains(heading, 0.5, bearing));
    }

    #[test]
    fn test_wrapped_window_handles_unnormalized_heading() {
        // Heading pushed past 2π by a disrupt
        let heading = TAU + 0.2;
        assert!(ConeWindow::Wrapped.contains(heading, 0.5, 0.1));
        assert!(!ConeWindow::Unwrapped.contains(heading, 0.5, 0.1));
        assert!(!ConeWindow::Wrapped.contains(heading, 0.5, PI));
    }

    #[test]
    fn test_windows_agree_away_from_boundary() {
        for bearing in [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0] {
            assert_eq!(
                ConeWindow::Unwrapped.contains(PI, FRAC_PI_2, bearing),
                ConeWindow::Wrapped.contains(PI, FRAC_PI_2, bearing),
                "bearing {bearing}"
            );
        }
    }

    #[test]
    fn test_cone_squares_scaled_radius() {
        let cone = PerceptionCone::new(10.0, 2.0, ConeWindow::Wrapped);
        assert_eq!(cone.distance_squared, 400.0);
        assert_eq!(cone.reach(), 20.0);
        assert_eq!(cone.half_angle, PERCEPTION_HALF_ANGLE);
    }

    #[test]
    fn test_cone_window_names() {
        for window in [ConeWindow::Unwrapped, ConeWindow::Wrapped] {
            assert_eq!(ConeWindow::from_str(window.as_str()), Some(window));
        }
        assert_eq!(ConeWindow::from_str("diagonal"), None);
    }
}
