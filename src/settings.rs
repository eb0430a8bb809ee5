//! Run settings
//!
//! Everything the host would normally read from sliders and buttons, as a
//! JSON-loadable struct. Missing fields take their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_MAX_SPEED, DEFAULT_MIN_SPEED};
use crate::error::FlockError;
use crate::sim::{
    ConeWindow, DisruptConfig, FlockOptions, FlockParams, NeighborSearch, SpawnConfig, TickParams,
    UpdateOrder, World,
};

/// Simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Run seed
    pub seed: u64,

    // === World ===
    pub width: f64,
    pub height: f64,

    // === Population (read on reset) ===
    pub num_boids: usize,
    /// Scales boid size and perception radius together
    pub size_multiplier: f64,
    pub min_speed: f64,
    pub max_speed: f64,

    // === Per tick ===
    pub speed_multiplier: f64,
    pub flocking_radius: f64,
    /// Flocking weight in [0, 1]
    pub flocking_strength: f64,

    // === Kernel behavior ===
    pub update_order: UpdateOrder,
    pub cone_window: ConeWindow,
    pub neighbor_search: NeighborSearch,

    // === Disrupt ===
    pub disrupt: DisruptConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0x5eed,

            width: 800.0,
            height: 600.0,

            num_boids: 200,
            size_multiplier: 2.0,
            min_speed: DEFAULT_MIN_SPEED,
            max_speed: DEFAULT_MAX_SPEED,

            speed_multiplier: 1.0,
            flocking_radius: 10.0,
            flocking_strength: 0.05,

            update_order: UpdateOrder::default(),
            cone_window: ConeWindow::default(),
            neighbor_search: NeighborSearch::default(),

            disrupt: DisruptConfig::default(),
        }
    }
}

impl Settings {
    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, FlockError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load and validate settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FlockError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| FlockError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, FlockError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the kernel would turn into garbage
    pub fn validate(&self) -> Result<(), FlockError> {
        positive("width", self.width)?;
        positive("height", self.height)?;
        positive("size_multiplier", self.size_multiplier)?;
        non_negative("min_speed", self.min_speed)?;
        non_negative("max_speed", self.max_speed)?;
        non_negative("speed_multiplier", self.speed_multiplier)?;
        non_negative("flocking_radius", self.flocking_radius)?;
        non_negative("disrupt.max_heading_jitter", self.disrupt.max_heading_jitter)?;
        non_negative("disrupt.max_speed_jitter", self.disrupt.max_speed_jitter)?;

        if self.min_speed > self.max_speed {
            return Err(FlockError::invalid_setting(
                "min_speed",
                format!("{} exceeds max_speed {}", self.min_speed, self.max_speed),
            ));
        }
        if !(0.0..=1.0).contains(&self.flocking_strength) {
            return Err(FlockError::invalid_setting(
                "flocking_strength",
                format!("{} is outside [0, 1]", self.flocking_strength),
            ));
        }
        Ok(())
    }

    pub fn world(&self) -> World {
        World::new(self.width, self.height)
    }

    pub fn spawn_config(&self) -> SpawnConfig {
        SpawnConfig {
            min_speed: self.min_speed,
            max_speed: self.max_speed,
            ..SpawnConfig::for_size_multiplier(self.num_boids, self.size_multiplier)
        }
    }

    pub fn flock_options(&self) -> FlockOptions {
        FlockOptions {
            update_order: self.update_order,
            cone_window: self.cone_window,
            search: self.neighbor_search,
        }
    }

    pub fn tick_params(&self) -> TickParams {
        TickParams {
            world: self.world(),
            speed_multiplier: self.speed_multiplier,
            flock: FlockParams {
                radius: self.flocking_radius,
                weight: self.flocking_strength,
                size_multiplier: self.size_multiplier,
            },
            options: self.flock_options(),
        }
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), FlockError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(FlockError::invalid_setting(field, format!("{value} must be finite and >= 0")))
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), FlockError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(FlockError::invalid_setting(field, format!("{value} must be finite and > 0")))
    }
}
