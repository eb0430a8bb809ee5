//! Torus Flock headless driver
//!
//! Runs the kernel for a fixed number of ticks and reports how ordered the
//! flock has become. Stands in for the animation loop a renderer would run.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use env_logger::{Builder, Env};
use log::LevelFilter;

use torus_flock::sim::{Boid, ConeWindow, NeighborSearch, Simulation, UpdateOrder, tick};
use torus_flock::{FlockError, Settings};

#[derive(Debug, Parser)]
#[command(name = "torus-flock", about = "Run a boid flock on a torus without a display")]
struct Args {
    /// JSON settings file; defaults are used when omitted
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Number of ticks to run
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Override the settings seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the number of boids
    #[arg(long)]
    boids: Option<usize>,

    /// Disrupt the flock before this tick (repeatable)
    #[arg(long = "disrupt-at")]
    disrupt_at: Vec<u64>,

    /// snapshot | sequential
    #[arg(long, value_parser = parse_update_order)]
    order: Option<UpdateOrder>,

    /// wrapped | unwrapped
    #[arg(long, value_parser = parse_cone_window)]
    cone: Option<ConeWindow>,

    /// all_pairs | grid
    #[arg(long, value_parser = parse_search)]
    search: Option<NeighborSearch>,

    /// Log flock statistics every N ticks (0 disables)
    #[arg(long, default_value_t = 60)]
    report_every: u64,

    /// Print the final population as JSON on stdout
    #[arg(long)]
    dump: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_update_order(s: &str) -> Result<UpdateOrder, String> {
    UpdateOrder::from_str(s).ok_or_else(|| format!("unknown update order `{s}`"))
}

fn parse_cone_window(s: &str) -> Result<ConeWindow, String> {
    ConeWindow::from_str(s).ok_or_else(|| format!("unknown cone window `{s}`"))
}

fn parse_search(s: &str) -> Result<NeighborSearch, String> {
    NeighborSearch::from_str(s).ok_or_else(|| format!("unknown neighbor search `{s}`"))
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let env = Env::default().default_filter_or(level.to_string());
    // Only fails if a logger is already installed
    let _ = Builder::from_env(env).try_init();
}

fn settings_from(args: &Args) -> Result<Settings, FlockError> {
    let mut settings = match &args.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    if let Some(seed) = args.seed {
        settings.seed = seed;
    }
    if let Some(boids) = args.boids {
        settings.num_boids = boids;
    }
    if let Some(order) = args.order {
        settings.update_order = order;
    }
    if let Some(cone) = args.cone {
        settings.cone_window = cone;
    }
    if let Some(search) = args.search {
        settings.neighbor_search = search;
    }

    settings.validate()?;
    Ok(settings)
}

fn dump_population(boids: &[Boid]) -> Result<String, FlockError> {
    serde_json::to_string_pretty(boids).map_err(FlockError::Output)
}

fn run(args: &Args) -> Result<(), FlockError> {
    let settings = settings_from(args)?;
    let world = settings.world();
    let mut sim = Simulation::new(settings.seed, settings.spawn_config(), &world);

    log::info!(
        "Flocking {} boids on {}x{} for {} ticks (seed {}, {}, {} cone, {} search)",
        sim.len(),
        world.width,
        world.height,
        args.ticks,
        settings.seed,
        settings.update_order.as_str(),
        settings.cone_window.as_str(),
        settings.neighbor_search.as_str()
    );
    log::info!(
        "Start: polarization {:.3}, mean speed {:.3}",
        sim.polarization(),
        sim.mean_speed()
    );

    // Parameters are re-read every tick, as a UI layer would supply them
    for t in 0..args.ticks {
        if args.disrupt_at.contains(&t) {
            sim.disrupt(&settings.disrupt);
            log::info!("Disrupted at tick {t}");
        }

        let flocked = tick(&mut sim, &settings.tick_params());

        if args.report_every > 0 && sim.time_ticks % args.report_every == 0 {
            log::info!(
                "Tick {}: polarization {:.3}, mean speed {:.3}, {} flocking",
                sim.time_ticks,
                sim.polarization(),
                sim.mean_speed(),
                flocked
            );
        }
    }

    log::info!(
        "Done: polarization {:.3}, mean speed {:.3}",
        sim.polarization(),
        sim.mean_speed()
    );

    if args.dump {
        println!("{}", dump_population(&sim.boids)?);
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        Args::parse_from(std::iter::once("torus-flock").chain(extra.iter().copied()))
    }

    #[test]
    fn test_defaults_without_overrides() {
        let args = args(&[]);
        assert_eq!(args.ticks, 600);
        assert_eq!(settings_from(&args).unwrap(), Settings::default());
    }

    #[test]
    fn test_overrides_replace_settings() {
        let settings = settings_from(&args(&[
            "--seed", "7", "--boids", "42", "--order", "sequential", "--cone", "unwrapped", "--search",
            "grid",
        ]))
        .unwrap();

        assert_eq!(settings.seed, 7);
        assert_eq!(settings.num_boids, 42);
        assert_eq!(settings.update_order, UpdateOrder::Sequential);
        assert_eq!(settings.cone_window, ConeWindow::Unwrapped);
        assert_eq!(settings.neighbor_search, NeighborSearch::Grid);
        assert_eq!(settings.width, Settings::default().width);
    }

    #[test]
    fn test_overrides_apply_over_settings_file() {
        let path = std::env::temp_dir().join(format!("torus-flock-args-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "num_boids": 10, "seed": 3, "flocking_strength": 0.4 }"#).unwrap();

        let settings = settings_from(&args(&["--settings", path.to_str().unwrap(), "--boids", "25"]));
        std::fs::remove_file(&path).unwrap();

        let settings = settings.unwrap();
        assert_eq!(settings.num_boids, 25);
        assert_eq!(settings.seed, 3);
        assert_eq!(settings.flocking_strength, 0.4);
    }

    #[test]
    fn test_invalid_settings_file_rejected() {
        let path = std::env::temp_dir().join(format!("torus-flock-bad-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "min_speed": 3.0, "max_speed": 1.0 }"#).unwrap();

        let result = settings_from(&args(&["--settings", path.to_str().unwrap(), "--seed", "1"]));
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(result, Err(FlockError::InvalidSetting { field: "min_speed", .. })));
    }

    #[test]
    fn test_unknown_option_values_rejected() {
        for bad in [["--order", "random"], ["--cone", "diagonal"], ["--search", "octree"]] {
            let argv = std::iter::once("torus-flock").chain(bad);
            assert!(Args::try_parse_from(argv).is_err(), "{bad:?}");
        }
    }

    #[test]
    fn test_dump_population() {
        let sim = Simulation::from_boids(0, vec![Boid::new(glam::DVec2::new(1.0, 2.0), 0.5, 1.0, 10.0)]);
        let json = dump_population(&sim.boids).unwrap();
        let parsed: Vec<Boid> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, sim.boids);
    }
}
