use bevy::prelude::Resource;
use clap::Parser;
use std::path::PathBuf;

use crate::simulation::config::ScenarioConfig;

/// Lumen: a headless simulator for multi-camera fiducial localization.
///
/// Runs a scenario's scripted robot past a tag layout and logs every pose
/// observation the vision pipeline hands to the localization filter.
#[derive(Parser, Debug, Resource, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The path to the scenario TOML file to run.
    #[arg(short, long, default_value = "assets/scenarios/default.toml")]
    pub scenario: PathBuf,

    /// Override the scenario's run length, in seconds.
    #[arg(short, long)]
    pub duration: Option<f64>,

    /// Override the scenario's PRNG seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print the effective scenario as TOML and exit without running.
    #[arg(long, default_value_t = false)]
    pub dump_config: bool,
}

impl Cli {
    /// Applies command-line overrides on top of a parsed scenario.
    pub fn apply_overrides(&self, config: &mut ScenarioConfig) {
        if let Some(duration) = self.duration {
            config.simulation.duration_seconds = duration;
        }
        if let Some(seed) = self.seed {
            config.simulation.seed = Some(seed);
        }
    }
}
