// lumen_sim/src/main.rs

//! Headless entry point: load a scenario, then run the vision pipeline
//! against it at the scenario's fixed tick rate.
//!
//! `cargo run -p lumen_sim -- --scenario assets/scenarios/default.toml`

use bevy::{app::ScheduleRunnerPlugin, log::LogPlugin, prelude::*};
use clap::Parser;
use lumen_sim::cli::Cli;
use lumen_sim::simulation::config::load_scenario;
use lumen_sim::{insert_scenario, LumenSimulationPlugin};
use std::time::Duration;

fn main() -> AppExit {
    let cli = Cli::parse();

    // --- 1. Load Simulation Configuration ---
    let mut scenario = match load_scenario(&cli.scenario) {
        Ok(scenario) => scenario,
        Err(err) => {
            eprintln!("Could not load scenario '{}': {}", cli.scenario.display(), err);
            return AppExit::error();
        }
    };
    cli.apply_overrides(&mut scenario.config);
    if let Err(err) = scenario.config.validate() {
        eprintln!("Invalid scenario after overrides: {}", err);
        return AppExit::error();
    }

    if cli.dump_config {
        return match toml::to_string_pretty(&scenario.config) {
            Ok(text) => {
                println!("{}", text);
                AppExit::Success
            }
            Err(err) => {
                eprintln!("Failed to serialize scenario: {}", err);
                AppExit::error()
            }
        };
    }

    // --- 2. Core Bevy Plugins (no window, no renderer) ---
    let mut app = App::new();
    app.add_plugins((
        MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
            1.0 / scenario.config.simulation.tick_hz,
        ))),
        LogPlugin {
            level: bevy::log::Level::INFO,
            filter: "info,lumen_sim=debug,lumen_core=info".to_string(),
            ..default()
        },
    ));

    // --- 3. Scenario Resources & Simulation Plugin ---
    if let Err(err) = insert_scenario(&mut app, &scenario) {
        eprintln!("Could not build the simulation: {}", err);
        return AppExit::error();
    }
    app.insert_resource(cli).add_plugins(LumenSimulationPlugin);

    app.run()
}
