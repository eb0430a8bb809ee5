//! Simulation context and population lifecycle
//!
//! Everything a run owns lives in [`Simulation`]: the boids, the seeded RNG
//! they are spawned and disrupted with, and the tick counter. Per-tick
//! parameters are passed in from outside on every call.

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use super::boid::{Boid, World};
use crate::consts::*;
use crate::to_cartesian;

/// How a fresh population is drawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnConfig {
    pub count: usize,
    pub min_size: f64,
    /// Sizes are `min_size + floor(U * size_variance)`
    pub size_variance: f64,
    pub min_speed: f64,
    pub max_speed: f64,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self::for_size_multiplier(200, 2.0)
    }
}

impl SpawnConfig {
    /// Sizes scaled the way the perception radius is
    pub fn for_size_multiplier(count: usize, size_multiplier: f64) -> Self {
        Self {
            count,
            min_size: MIN_SIZE_PER_MULTIPLIER * size_multiplier,
            size_variance: SIZE_VARIANCE_PER_MULTIPLIER * size_multiplier,
            min_speed: DEFAULT_MIN_SPEED,
            max_speed: DEFAULT_MAX_SPEED,
        }
    }
}

/// Bounds of the random kick a disrupt gives every boid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisruptConfig {
    pub max_heading_jitter: f64,
    pub max_speed_jitter: f64,
}

impl Default for DisruptConfig {
    fn default() -> Self {
        Self {
            max_heading_jitter: DISRUPT_HEADING_JITTER,
            max_speed_jitter: DISRUPT_SPEED_JITTER,
        }
    }
}

/// A running flock
#[derive(Debug, Clone)]
pub struct Simulation {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Spawn parameters used by the last reset
    pub spawn: SpawnConfig,
    /// The population; fixed length between resets
    pub boids: Vec<Boid>,
    /// Ticks since the last reset
    pub time_ticks: u64,
    rng: Pcg32,
}

impl Simulation {
    /// Seed a new run and spawn its first population
    pub fn new(seed: u64, spawn: SpawnConfig, world: &World) -> Self {
        let mut sim = Self {
            seed,
            spawn,
            boids: Vec::new(),
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
        };
        sim.reset(world);
        sim
    }

    /// Wrap an existing population, e.g. a hand-placed test scenario
    pub fn from_boids(seed: u64, boids: Vec<Boid>) -> Self {
        Self {
            seed,
            spawn: SpawnConfig {
                count: boids.len(),
                ..SpawnConfig::default()
            },
            boids,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Replace the population with a freshly drawn one
    pub fn reset(&mut self, world: &World) {
        let spawn = self.spawn;
        self.boids = (0..spawn.count)
            .map(|_| spawn_boid(&mut self.rng, &spawn, world))
            .collect();
        self.time_ticks = 0;
        log::debug!(
            "Spawned {} boids on {}x{} (speed {}..{}, size {}+{})",
            spawn.count,
            world.width,
            world.height,
            spawn.min_speed,
            spawn.max_speed,
            spawn.min_size,
            spawn.size_variance
        );
    }

    /// Adopt new spawn parameters and reset
    pub fn reset_with(&mut self, spawn: SpawnConfig, world: &World) {
        self.spawn = spawn;
        self.reset(world);
    }

    /// Kick every boid's heading and speed by a random non-negative amount.
    /// Headings are left unnormalized.
    pub fn disrupt(&mut self, jitter: &DisruptConfig) {
        for boid in &mut self.boids {
            boid.heading += self.rng.random::<f64>() * jitter.max_heading_jitter;
            boid.speed += self.rng.random::<f64>() * jitter.max_speed_jitter;
        }
        log::debug!("Disrupted {} boids at tick {}", self.boids.len(), self.time_ticks);
    }

    pub fn len(&self) -> usize {
        self.boids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boids.is_empty()
    }

    /// Mean speed of the population (0 when empty)
    pub fn mean_speed(&self) -> f64 {
        if self.boids.is_empty() {
            return 0.0;
        }
        self.boids.iter().map(|b| b.speed).sum::<f64>() / self.boids.len() as f64
    }

    /// Length of the mean unit heading vector: 1 when every boid faces the
    /// same way, near 0 for random headings (0 when empty)
    pub fn polarization(&self) -> f64 {
        if self.boids.is_empty() {
            return 0.0;
        }
        let sum: DVec2 = self.boids.iter().map(|b| to_cartesian(b.heading)).sum();
        sum.length() / self.boids.len() as f64
    }
}

fn spawn_boid(rng: &mut Pcg32, spawn: &SpawnConfig, world: &World) -> Boid {
    // Whole-number start coordinates
    let x = (rng.random::<f64>() * world.width).floor();
    let y = (rng.random::<f64>() * world.height).floor();
    let speed = spawn.min_speed + rng.random::<f64>() * (spawn.max_speed - spawn.min_speed);
    let heading = rng.random::<f64>() * TAU;
    let size = spawn.min_size + (rng.random::<f64>() * spawn.size_variance).floor();
    Boid::new(DVec2::new(x, y), heading, speed, size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> World {
        World::new(640.0, 480.0)
    }

    #[test]
    fn test_spawn_ranges() {
        let spawn = SpawnConfig::for_size_multiplier(500, 2.0);
        let sim = Simulation::new(7, spawn, &world());

        assert_eq!(sim.len(), 500);
        for boid in &sim.boids {
            assert!(world().contains(boid.position));
            assert_eq!(boid.position.x.fract(), 0.0);
            assert_eq!(boid.position.y.fract(), 0.0);
            assert!(boid.speed >= 0.5 && boid.speed < 1.5);
            assert!(boid.heading >= 0.0 && boid.heading < TAU);
            assert!(boid.size >= 10.0 && boid.size < 15.0);
            assert_eq!(boid.size.fract(), 0.0);
        }
    }

    #[test]
    fn test_same_seed_same_population() {
        let a = Simulation::new(99999, SpawnConfig::default(), &world());
        let b = Simulation::new(99999, SpawnConfig::default(), &world());
        let c = Simulation::new(12345, SpawnConfig::default(), &world());
        assert_eq!(a.boids, b.boids);
        assert_ne!(a.boids, c.boids);
    }

    #[test]
    fn test_reset_replaces_population() {
        let mut sim = Simulation::new(1, SpawnConfig::default(), &world());
        let first = sim.boids.clone();
        sim.time_ticks = 40;

        sim.reset(&world());
        assert_eq!(sim.len(), first.len());
        assert_ne!(sim.boids, first);
        assert_eq!(sim.time_ticks, 0);

        sim.reset_with(SpawnConfig::for_size_multiplier(17, 1.0), &world());
        assert_eq!(sim.len(), 17);
        assert!(sim.boids.iter().all(|b| b.size >= 5.0 && b.size < 7.5));
    }

    #[test]
    fn test_degenerate_spawn_ranges() {
        let spawn = SpawnConfig {
            count: 10,
            min_size: 4.0,
            size_variance: 0.0,
            min_speed: 1.0,
            max_speed: 1.0,
        };
        let sim = Simulation::new(3, spawn, &world());
        assert!(sim.boids.iter().all(|b| b.speed == 1.0 && b.size == 4.0));
    }

    #[test]
    fn test_disrupt_bounds() {
        let mut sim = Simulation::new(5, SpawnConfig::default(), &world());
        let before = sim.boids.clone();
        sim.disrupt(&DisruptConfig::default());

        for (old, new) in before.iter().zip(&sim.boids) {
            let dh = new.heading - old.heading;
            let ds = new.speed - old.speed;
            assert!((0.0..5.0).contains(&dh));
            assert!((0.0..0.5).contains(&ds));
            assert_eq!(old.position, new.position);
        }
        // Headings may now exceed 2π
        assert!(sim.boids.iter().any(|b| b.heading >= TAU));
    }

    #[test]
    fn test_stats() {
        let mut sim = Simulation::from_boids(
            0,
            vec![
                Boid::new(DVec2::ZERO, 0.0, 1.0, 1.0),
                Boid::new(DVec2::ZERO, 0.0, 3.0, 1.0),
            ],
        );
        assert_eq!(sim.mean_speed(), 2.0);
        assert!((sim.polarization() - 1.0).abs() < 1e-12);

        sim.boids[1].heading = std::f64::consts::PI;
        assert!(sim.polarization() < 1e-12);

        let empty = Simulation::from_boids(0, Vec::new());
        assert!(empty.is_empty());
        assert_eq!(empty.mean_speed(), 0.0);
        assert_eq!(empty.polarization(), 0.0);
    }
}
