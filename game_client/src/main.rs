#![deny(unsafe_op_in_unsafe_fn)]
#![deny(unused_crate_dependencies)]

mod config;
mod scenario;
mod simulation;

use std::path::PathBuf;

use clap::Parser;
use config::Config;
use game_core::logger;
use scenario::Scenario;
use simulation::Simulation;

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the config file. Defaults are used if the file does not exist.
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,
    /// Path to the scenario file.
    #[arg(short, long)]
    scenario: PathBuf,
    /// Simulated time in seconds.
    #[arg(short, long, default_value_t = 10.0)]
    duration: f32,
    /// Frames per second. Overrides the timestep of the config file.
    #[arg(short, long)]
    timestep: Option<u32>,
}

fn main() {
    let args = Args::parse();

    let config_exists = args.config.exists();
    let config = if config_exists {
        Config::from_file(&args.config)
    } else {
        Ok(Config::default())
    };

    let level = config
        .as_ref()
        .ok()
        .and_then(|config| logger::parse_level(&config.log.level));
    if let Err(err) = logger::init(level) {
        eprintln!("failed to install logger: {}", err);
    }

    let config = match config {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("failed to load config file from {:?}: {}", args.config, err);
            return;
        }
    };

    if !config_exists {
        tracing::info!("no config file at {:?}, using defaults", args.config);
    }

    if level.is_none() {
        tracing::warn!("invalid log level {:?}", config.log.level);
    }

    let timestep = args.timestep.unwrap_or(config.timestep);
    if timestep == 0 {
        tracing::error!("timestep must be greater than zero");
        return;
    }

    let scenario = match Scenario::from_file(&args.scenario) {
        Ok(scenario) => scenario,
        Err(err) => {
            tracing::error!("failed to load scenario from {:?}: {}", args.scenario, err);
            return;
        }
    };

    let stage = match scenario.build() {
        Ok(stage) => stage,
        Err(err) => {
            tracing::error!("invalid scenario {:?}: {}", args.scenario, err);
            return;
        }
    };

    let mut simulation = Simulation::new(config.lock_on, stage, scenario.script, timestep);

    let frames = (args.duration.max(0.0) * timestep as f32).ceil() as u64;
    tracing::info!(
        "running {} frames of {:?}",
        frames,
        simulation.delta()
    );

    for _ in 0..frames {
        simulation.step();
    }

    if !simulation.is_finished() {
        tracing::warn!("simulation ended before the script finished");
    }

    tracing::info!(
        "finished in state {:?} with target {:?}",
        simulation.system().current_state(),
        simulation.target_name()
    );
}
