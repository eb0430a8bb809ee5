//! Flocking update: each boid blends its heading and speed toward the
//! average of the boids inside its perception cone.

use serde::{Deserialize, Serialize};

use super::angle::{ConeWindow, PerceptionCone, blend_angles, circular_mean};
use super::boid::{Boid, World};
use super::grid::SpatialGrid;

/// Per-tick flocking parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlockParams {
    /// Perception radius before size scaling
    pub radius: f64,
    /// Blend factor in [0, 1]: 0 ignores neighbors, 1 snaps to their average
    pub weight: f64,
    /// Scales the perception radius along with boid size
    pub size_multiplier: f64,
}

impl Default for FlockParams {
    fn default() -> Self {
        Self {
            radius: 10.0,
            weight: 0.05,
            size_multiplier: 2.0,
        }
    }
}

impl FlockParams {
    pub fn cone(&self, window: ConeWindow) -> PerceptionCone {
        PerceptionCone::new(self.radius, self.size_multiplier, window)
    }
}

/// Whether boids updated earlier in a pass are visible to later ones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateOrder {
    /// All steering is computed from the population as it was when the
    /// pass started, then applied together
    #[default]
    Snapshot,
    /// Boids are updated in place by ascending index; boid i sees the new
    /// heading and speed of every boid j < i
    Sequential,
}

impl UpdateOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateOrder::Snapshot => "snapshot",
            UpdateOrder::Sequential => "sequential",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "snapshot" | "simultaneous" => Some(UpdateOrder::Snapshot),
            "sequential" | "in_place" | "in-place" => Some(UpdateOrder::Sequential),
            _ => None,
        }
    }
}

/// How neighbor candidates are found. Both give identical results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeighborSearch {
    /// Test every ordered pair, O(n²)
    #[default]
    AllPairs,
    /// Bucket boids into a uniform grid first
    Grid,
}

impl NeighborSearch {
    pub fn as_str(&self) -> &'static str {
        match self {
            NeighborSearch::AllPairs => "all_pairs",
            NeighborSearch::Grid => "grid",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "all_pairs" | "all-pairs" | "brute" => Some(NeighborSearch::AllPairs),
            "grid" => Some(NeighborSearch::Grid),
            _ => None,
        }
    }
}

/// Behavioral switches for a flocking pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FlockOptions {
    pub update_order: UpdateOrder,
    pub cone_window: ConeWindow,
    pub search: NeighborSearch,
}

/// New heading and speed for one boid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Steering {
    pub heading: f64,
    pub speed: f64,
}

impl Steering {
    #[inline]
    fn apply(self, boid: &mut Boid) {
        boid.heading = self.heading;
        boid.speed = self.speed;
    }
}

/// Indices j != index of boids inside `boids[index]`'s cone, ascending
pub fn neighbors_of(boids: &[Boid], index: usize, cone: &PerceptionCone) -> Vec<usize> {
    let focal = &boids[index];
    (0..boids.len())
        .filter(|&j| j != index && boids[j].is_neighbor_of(focal, cone))
        .collect()
}

/// Steering for `boids[index]` from the candidate indices, or `None` when
/// no candidate is inside its cone
fn steer(
    boids: &[Boid],
    index: usize,
    candidates: impl Iterator<Item = usize>,
    cone: &PerceptionCone,
    weight: f64,
) -> Option<Steering> {
    let focal = &boids[index];
    let mut speed_sum = 0.0;
    let mut headings = Vec::new();

    for j in candidates {
        if j != index && boids[j].is_neighbor_of(focal, cone) {
            speed_sum += boids[j].speed;
            headings.push(boids[j].heading);
        }
    }

    if headings.is_empty() {
        return None;
    }

    let avg_speed = speed_sum / headings.len() as f64;
    let neighbor_heading = circular_mean(&headings);

    Some(Steering {
        heading: blend_angles(neighbor_heading, focal.heading, weight),
        speed: weight * avg_speed + (1.0 - weight) * focal.speed,
    })
}

/// Flock a single boid in place against the rest of the population.
///
/// Returns false (and leaves the boid untouched) when it has no neighbors.
pub fn flock_one(boids: &mut [Boid], index: usize, params: &FlockParams, window: ConeWindow) -> bool {
    let cone = params.cone(window);
    match steer(boids, index, 0..boids.len(), &cone, params.weight) {
        Some(steering) => {
            steering.apply(&mut boids[index]);
            true
        }
        None => false,
    }
}

/// Flock every boid once. Returns how many boids had at least one neighbor.
///
/// `world` is only consulted by the grid search.
pub fn flock_all(boids: &mut [Boid], params: &FlockParams, options: &FlockOptions, world: &World) -> usize {
    let cone = params.cone(options.cone_window);

    // Flocking never moves boids, so one grid serves the whole pass
    let grid = match options.search {
        NeighborSearch::AllPairs => None,
        NeighborSearch::Grid => Some(SpatialGrid::build(world, cone.reach(), boids)),
    };
    let mut candidates = Vec::new();
    let mut steering_for = |boids: &[Boid], i: usize| match &grid {
        None => steer(boids, i, 0..boids.len(), &cone, params.weight),
        Some(grid) => {
            grid.candidates(boids[i].position, &mut candidates);
            steer(boids, i, candidates.iter().copied(), &cone, params.weight)
        }
    };

    match options.update_order {
        UpdateOrder::Sequential => {
            let mut flocked = 0;
            for i in 0..boids.len() {
                if let Some(steering) = steering_for(&*boids, i) {
                    steering.apply(&mut boids[i]);
                    flocked += 1;
                }
            }
            flocked
        }
        UpdateOrder::Snapshot => {
            let updates: Vec<Option<Steering>> =
                (0..boids.len()).map(|i| steering_for(&*boids, i)).collect();
            let mut flocked = 0;
            for (boid, update) in boids.iter_mut().zip(updates) {
                if let Some(steering) = update {
                    steering.apply(boid);
                    flocked += 1;
                }
            }
            flocked
        }
    }
}
