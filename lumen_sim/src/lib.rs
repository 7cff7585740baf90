// lumen_sim/src/lib.rs

use bevy::prelude::*;

use crate::simulation::app_state::SimulationSet;
use crate::simulation::config::{LoadedScenario, ScenarioError};
use crate::simulation::ground_truth::{GroundTruthPlugin, GroundTruthPose, Trajectory};
use crate::simulation::prng::root_rng;
use crate::simulation::telemetry::{TelemetryPlugin, VisionStats};
use crate::simulation::vision::{build_vision_subsystem, CameraFrameTimer, VisionPlugin};

// This prelude is for convenience for other files WITHIN the lumen_sim crate.
pub mod prelude;

pub mod cli;
pub mod simulation;

/// Brings together ground truth, the camera pipeline and telemetry.
/// Requires the resources inserted by [`insert_scenario`].
pub struct LumenSimulationPlugin;

impl Plugin for LumenSimulationPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            FixedUpdate,
            (
                SimulationSet::GroundTruth,
                SimulationSet::Sensors,
                SimulationSet::Aggregation,
                SimulationSet::Telemetry,
            )
                .chain(),
        )
        .add_plugins((GroundTruthPlugin, VisionPlugin, TelemetryPlugin));
    }
}

/// Builds every simulation resource from a loaded scenario and inserts it into `app`.
pub fn insert_scenario(app: &mut App, scenario: &LoadedScenario) -> Result<(), ScenarioError> {
    let config = &scenario.config;
    let mut rng = root_rng(config.simulation.seed);
    let vision = build_vision_subsystem(scenario, &mut rng)?;
    let trajectory = Trajectory(config.trajectory);

    info!(
        "Scenario ready: {} cameras, {} tags, {:.1} s at {} Hz",
        vision.0.len(),
        scenario.layout.len(),
        config.simulation.duration_seconds,
        config.simulation.tick_hz
    );

    app.insert_resource(Time::<Fixed>::from_hz(config.simulation.tick_hz))
        .insert_resource(GroundTruthPose(trajectory.pose_at(0.0)))
        .insert_resource(trajectory)
        .insert_resource(CameraFrameTimer::from_fps(config.vision.sim_camera.fps))
        .insert_resource(VisionStats::new(vision.0.len()))
        .insert_resource(vision)
        .insert_resource(config.clone());
    Ok(())
}
