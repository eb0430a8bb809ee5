//! Deterministic flocking kernel
//!
//! Everything here is pure and reproducible:
//! - Seeded RNG only (spawn and disrupt)
//! - Stable iteration order (by boid index)
//! - No rendering, input or timing dependencies

pub mod angle;
pub mod boid;
pub mod flock;
pub mod grid;
pub mod state;
pub mod tick;

pub use angle::{ConeWindow, PerceptionCone, circular_mean, signed_difference, weighted_circular_mean};
pub use boid::{Boid, World};
pub use flock::{FlockOptions, FlockParams, NeighborSearch, Steering, UpdateOrder, flock_all, flock_one, neighbors_of};
pub use grid::SpatialGrid;
pub use state::{DisruptConfig, Simulation, SpawnConfig};
pub use tick::{TickParams, tick};
