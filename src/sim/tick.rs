//! One simulation step
//!
//! Advances the flock deterministically: every boid moves along its
//! current heading, then every boid flocks.

use serde::{Deserialize, Serialize};

use super::boid::World;
use super::flock::{FlockOptions, FlockParams, flock_all};
use super::state::Simulation;

/// Everything a tick reads from the outside world. Supplied fresh on every
/// call; nothing is cached between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickParams {
    pub world: World,
    pub speed_multiplier: f64,
    pub flock: FlockParams,
    pub options: FlockOptions,
}

impl TickParams {
    pub fn new(world: World) -> Self {
        Self {
            world,
            speed_multiplier: 1.0,
            flock: FlockParams::default(),
            options: FlockOptions::default(),
        }
    }
}

/// Move every boid, then flock every boid. Returns how many boids flocked.
pub fn tick(sim: &mut Simulation, params: &TickParams) -> usize {
    for boid in &mut sim.boids {
        boid.advance(params.speed_multiplier, &params.world);
    }
    let flocked = flock_all(&mut sim.boids, &params.flock, &params.options, &params.world);
    sim.time_ticks += 1;

    log::trace!(
        "tick {}: {}/{} boids flocked",
        sim.time_ticks,
        flocked,
        sim.boids.len()
    );
    flocked
}
