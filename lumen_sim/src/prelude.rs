// lumen_sim/src/prelude.rs

pub use bevy::prelude::*;

// Pure vision types: observations, layouts, the aggregator and its models.
pub use lumen_core::prelude::*;

pub use crate::simulation::app_state::SimulationSet;
pub use crate::simulation::config::{
    load_layout, load_scenario, LoadedScenario, ScenarioConfig, ScenarioError,
};
pub use crate::simulation::ground_truth::{GroundTruthPose, Trajectory};
pub use crate::simulation::telemetry::VisionStats;
pub use crate::simulation::vision::{VisionObservationEvent, VisionSubsystem};
pub use crate::{insert_scenario, LumenSimulationPlugin};
